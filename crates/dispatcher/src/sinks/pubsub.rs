//! PubSubSink - publishes records as messages on a topic
//!
//! The sink owns serialization; the `Publisher` owns the transport.

use std::collections::BTreeMap;
use std::net::SocketAddr;

use bytes::Bytes;
use contracts::{ContractError, RecordSink, StatusRecord};
use serde::Serialize;
use tokio::net::UdpSocket;
use tokio::sync::broadcast;
use tracing::{debug, instrument};

/// Max datagram payload (UDP typically 65507 for IPv4)
const MAX_DATAGRAM_SIZE: usize = 65_000;

/// One message on a topic
#[derive(Debug, Clone)]
pub struct PubSubMessage {
    pub topic: String,
    /// JSON-encoded record
    pub payload: Bytes,
    /// Routing attributes (`status`, `itemName`)
    pub attributes: BTreeMap<String, String>,
}

impl PubSubMessage {
    /// Build the message for `record` on `topic`
    pub fn from_record(topic: &str, record: &StatusRecord) -> serde_json::Result<Self> {
        let payload = Bytes::from(record.to_json_vec()?);
        let attributes = BTreeMap::from([
            ("status".to_string(), record.status.to_string()),
            ("itemName".to_string(), record.item_name.clone()),
        ]);

        Ok(Self {
            topic: topic.to_string(),
            payload,
            attributes,
        })
    }
}

/// Pub/sub transport
#[trait_variant::make(Publisher: Send)]
pub trait LocalPublisher {
    /// Transport address, e.g. `udp://127.0.0.1:7400`
    fn endpoint(&self) -> &str;

    /// Publish one message
    async fn publish(&self, message: PubSubMessage) -> Result<(), ContractError>;
}

/// Sink that publishes each record to a topic
pub struct PubSubSink<P> {
    name: String,
    topic: String,
    target: String,
    publisher: P,
}

impl<P: Publisher> PubSubSink<P> {
    /// Create a new PubSubSink
    pub fn new(name: impl Into<String>, topic: impl Into<String>, publisher: P) -> Self {
        let topic = topic.into();
        let target = format!(
            "{}/{}",
            Publisher::endpoint(&publisher).trim_end_matches('/'),
            topic
        );

        Self {
            name: name.into(),
            topic,
            target,
            publisher,
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }
}

impl<P: Publisher + Sync> RecordSink for PubSubSink<P> {
    fn name(&self) -> &str {
        &self.name
    }

    fn target(&self) -> &str {
        &self.target
    }

    #[instrument(
        name = "pubsub_sink_send",
        skip(self, record),
        fields(sink = %self.name, topic = %self.topic, item = %record.item_name)
    )]
    async fn send(&self, record: &StatusRecord) -> Result<(), ContractError> {
        let message = PubSubMessage::from_record(&self.topic, record)
            .map_err(|e| ContractError::sink_write(&self.name, format!("json error: {e}")))?;

        Publisher::publish(&self.publisher, message).await
    }
}

/// Wire envelope for datagram transports
#[derive(Serialize)]
struct Envelope<'a> {
    topic: &'a str,
    attributes: &'a BTreeMap<String, String>,
    message: &'a str,
}

/// Publisher that sends one JSON datagram per message to a topic gateway
pub struct UdpPublisher {
    endpoint: String,
    socket: UdpSocket,
    max_datagram_size: usize,
}

impl UdpPublisher {
    /// Bind an ephemeral socket and connect it to `addr`
    #[instrument(name = "udp_publisher_new")]
    pub async fn new(addr: SocketAddr) -> std::io::Result<Self> {
        let bind_addr = if addr.is_ipv4() { "0.0.0.0:0" } else { "[::]:0" };
        let socket = UdpSocket::bind(bind_addr).await?;
        socket.connect(addr).await?;

        debug!(addr = %addr, "UdpPublisher connected");

        Ok(Self {
            endpoint: format!("udp://{addr}"),
            socket,
            max_datagram_size: MAX_DATAGRAM_SIZE,
        })
    }

    fn encode(&self, message: &PubSubMessage) -> Result<Vec<u8>, ContractError> {
        let text = std::str::from_utf8(&message.payload)
            .map_err(|e| ContractError::sink_write("pubsub", format!("payload not utf-8: {e}")))?;

        let data = serde_json::to_vec(&Envelope {
            topic: &message.topic,
            attributes: &message.attributes,
            message: text,
        })
        .map_err(|e| ContractError::sink_write("pubsub", format!("json error: {e}")))?;

        if data.len() > self.max_datagram_size {
            return Err(ContractError::sink_write(
                "pubsub",
                format!(
                    "message of {} bytes exceeds datagram limit {}",
                    data.len(),
                    self.max_datagram_size
                ),
            ));
        }

        Ok(data)
    }
}

impl Publisher for UdpPublisher {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn publish(&self, message: PubSubMessage) -> Result<(), ContractError> {
        let data = self.encode(&message)?;
        let sent = self
            .socket
            .send(&data)
            .await
            .map_err(|e| ContractError::sink_connection("pubsub", format!("UDP send failed: {e}")))?;

        debug!(endpoint = %self.endpoint, topic = %message.topic, bytes = sent, "Published");
        Ok(())
    }
}

/// In-process publisher backed by a broadcast channel
///
/// Publishing with no live subscriber is not an error.
#[derive(Clone)]
pub struct ChannelPublisher {
    endpoint: String,
    tx: broadcast::Sender<PubSubMessage>,
}

impl ChannelPublisher {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self {
            endpoint: "channel://local".to_string(),
            tx,
        }
    }

    /// Subscribe to every message published from now on
    pub fn subscribe(&self) -> broadcast::Receiver<PubSubMessage> {
        self.tx.subscribe()
    }
}

impl Publisher for ChannelPublisher {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn publish(&self, message: PubSubMessage) -> Result<(), ContractError> {
        let topic = message.topic.clone();
        match self.tx.send(message) {
            Ok(receivers) => debug!(topic = %topic, receivers, "Published"),
            Err(_) => debug!(topic = %topic, "Published with no subscribers"),
        }
        Ok(())
    }
}
