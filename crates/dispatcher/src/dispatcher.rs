//! Dispatcher - sequential fan-out of one record to every sink

use std::net::SocketAddr;

use tracing::{debug, info, instrument, warn};

use contracts::{GathererSettings, PubSubTransport, StatusRecord};

use crate::error::DispatcherError;
use crate::handle::SinkHandle;
use crate::metrics::MetricsSnapshot;
use crate::sinks::{ChannelPublisher, LogSink, PubSubSink, RestSink, UdpPublisher};

/// Sink names used by the builder, in dispatch order
pub const REST_SINK: &str = "rest";
pub const PUBSUB_SINK: &str = "pubsub";
pub const LOG_SINK: &str = "log";

/// Result of one sink attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkOutcome {
    pub sink: String,
    pub target: String,
    /// `None` when delivered
    pub error: Option<String>,
}

impl SinkOutcome {
    pub fn delivered(&self) -> bool {
        self.error.is_none()
    }
}

/// Per-sink outcomes of one dispatch, in attempt order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub outcomes: Vec<SinkOutcome>,
}

impl DispatchReport {
    /// Number of sinks that accepted the record
    pub fn delivered_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.delivered()).count()
    }

    /// Sinks that failed
    pub fn failures(&self) -> impl Iterator<Item = &SinkOutcome> {
        self.outcomes.iter().filter(|o| !o.delivered())
    }

    /// True when every sink accepted the record
    pub fn is_complete(&self) -> bool {
        self.outcomes.iter().all(SinkOutcome::delivered)
    }

    /// Outcome for a sink by name
    pub fn outcome(&self, sink: &str) -> Option<&SinkOutcome> {
        self.outcomes.iter().find(|o| o.sink == sink)
    }
}

/// Builder for creating a Dispatcher from settings
///
/// Sinks are created in the fixed order REST → Pub/Sub → Log.
pub struct DispatcherBuilder {
    settings: GathererSettings,
    channel: Option<ChannelPublisher>,
}

impl DispatcherBuilder {
    /// Create a new DispatcherBuilder
    pub fn new(settings: &GathererSettings) -> Self {
        Self {
            settings: settings.clone(),
            channel: None,
        }
    }

    /// Use `publisher` for the channel transport (so callers can subscribe)
    pub fn channel_publisher(mut self, publisher: ChannelPublisher) -> Self {
        self.channel = Some(publisher);
        self
    }

    /// Build the dispatcher
    #[instrument(name = "dispatcher_builder_build", skip(self))]
    pub async fn build(self) -> Result<Dispatcher, DispatcherError> {
        let timeout = self.settings.delivery.timeout();
        let mut handles = Vec::with_capacity(3);

        if self.settings.project_endpoint.trim().is_empty() {
            warn!("No project_endpoint configured, REST sink disabled");
        } else {
            let sink = RestSink::from_settings(REST_SINK, &self.settings)
                .map_err(|e| DispatcherError::sink_creation(REST_SINK, e.to_string()))?;
            handles.push(SinkHandle::new(sink, timeout));
        }

        handles.push(self.create_pubsub_handle().await?);
        handles.push(SinkHandle::new(LogSink::new(LOG_SINK), timeout));

        info!(
            sinks = handles.len(),
            timeout_ms = timeout.as_millis() as u64,
            "Dispatcher built"
        );

        Ok(Dispatcher { handles })
    }

    async fn create_pubsub_handle(&self) -> Result<SinkHandle, DispatcherError> {
        let pubsub = &self.settings.pubsub;
        let timeout = self.settings.delivery.timeout();

        match pubsub.transport {
            PubSubTransport::Udp => {
                let raw = pubsub.addr.as_deref().ok_or_else(|| {
                    DispatcherError::sink_creation(PUBSUB_SINK, "udp transport requires addr")
                })?;
                let addr: SocketAddr = raw.parse().map_err(|e| {
                    DispatcherError::sink_creation(
                        PUBSUB_SINK,
                        format!("invalid address '{raw}': {e}"),
                    )
                })?;
                let publisher = UdpPublisher::new(addr)
                    .await
                    .map_err(|e| DispatcherError::sink_creation(PUBSUB_SINK, e.to_string()))?;
                let sink = PubSubSink::new(PUBSUB_SINK, pubsub.topic.clone(), publisher);
                Ok(SinkHandle::new(sink, timeout))
            }
            PubSubTransport::Channel => {
                let publisher = self
                    .channel
                    .clone()
                    .unwrap_or_else(|| ChannelPublisher::new(pubsub.channel_capacity));
                let sink = PubSubSink::new(PUBSUB_SINK, pubsub.topic.clone(), publisher);
                Ok(SinkHandle::new(sink, timeout))
            }
        }
    }
}

/// Fans each record out to a fixed, ordered set of sinks
///
/// Every sink is attempted; a failing sink is logged and never stops the
/// ones after it. No retries, no queueing.
#[derive(Debug)]
pub struct Dispatcher {
    handles: Vec<SinkHandle>,
}

impl Dispatcher {
    /// Create a dispatcher with custom sink handles (for testing)
    pub fn with_handles(handles: Vec<SinkHandle>) -> Self {
        Self { handles }
    }

    /// Sink handles in dispatch order
    pub fn handles(&self) -> &[SinkHandle] {
        &self.handles
    }

    /// Get metrics for all sinks
    pub fn metrics(&self) -> Vec<(String, MetricsSnapshot)> {
        self.handles
            .iter()
            .map(|h| (h.name().to_string(), h.metrics().snapshot()))
            .collect()
    }

    /// Deliver `record` to every sink in order
    #[instrument(
        name = "dispatcher_dispatch",
        skip(self, record),
        fields(item = %record.item_name, status = %record.status)
    )]
    pub async fn dispatch(&self, record: &StatusRecord) -> DispatchReport {
        let mut outcomes = Vec::with_capacity(self.handles.len());

        for handle in &self.handles {
            let error = match handle.deliver(record).await {
                Ok(()) => None,
                Err(e) => {
                    debug!(
                        sink = %handle.name(),
                        endpoint = %handle.target(),
                        item = %record.item_name,
                        error = %e,
                        "Sink delivery failed"
                    );
                    Some(e.to_string())
                }
            };

            outcomes.push(SinkOutcome {
                sink: handle.name().to_string(),
                target: handle.target().to_string(),
                error,
            });
        }

        let report = DispatchReport { outcomes };
        debug!(
            delivered = report.delivered_count(),
            sinks = self.handles.len(),
            "Dispatch finished"
        );
        report
    }
}

/// Convenience function to create a dispatcher from settings
pub async fn create_dispatcher(settings: &GathererSettings) -> Result<Dispatcher, DispatcherError> {
    DispatcherBuilder::new(settings).build().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::tests::{record, MockSink};
    use std::sync::atomic::Ordering;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_dispatcher_fanout() {
        let sink1 = MockSink::new("sink1");
        let sink2 = MockSink::new("sink2");
        let counts = [Arc::clone(&sink1.write_count), Arc::clone(&sink2.write_count)];

        let dispatcher = Dispatcher::with_handles(vec![
            SinkHandle::new(sink1, Duration::from_secs(1)),
            SinkHandle::new(sink2, Duration::from_secs(1)),
        ]);

        for i in 0..5 {
            let report = dispatcher.dispatch(&record(&format!("job-{i}"))).await;
            assert!(report.is_complete());
        }

        for count in counts {
            assert_eq!(count.load(Ordering::Relaxed), 5);
        }
    }

    #[tokio::test]
    async fn test_failing_sink_does_not_block_others() {
        let first = MockSink::new("first");
        let mut second = MockSink::new("second");
        second.should_fail = true;
        let third = MockSink::new("third");
        let first_count = Arc::clone(&first.write_count);
        let third_count = Arc::clone(&third.write_count);

        let dispatcher = Dispatcher::with_handles(vec![
            SinkHandle::new(first, Duration::from_secs(1)),
            SinkHandle::new(second, Duration::from_secs(1)),
            SinkHandle::new(third, Duration::from_secs(1)),
        ]);

        let report = dispatcher.dispatch(&record("job")).await;

        assert_eq!(first_count.load(Ordering::Relaxed), 1);
        assert_eq!(third_count.load(Ordering::Relaxed), 1);
        assert_eq!(report.delivered_count(), 2);
        let failed: Vec<_> = report.failures().map(|o| o.sink.as_str()).collect();
        assert_eq!(failed, vec!["second"]);
    }

    #[tokio::test]
    async fn test_sink_failure_not_logged_at_warn() {
        use std::sync::atomic::AtomicUsize;
        use tracing_subscriber::layer::{Context, SubscriberExt};
        use tracing_subscriber::Layer;

        struct WarnCounter(Arc<AtomicUsize>);

        impl<S: tracing::Subscriber> Layer<S> for WarnCounter {
            fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
                if *event.metadata().level() == tracing::Level::WARN {
                    self.0.fetch_add(1, Ordering::Relaxed);
                }
            }
        }

        let warnings = Arc::new(AtomicUsize::new(0));
        let subscriber =
            tracing_subscriber::registry().with(WarnCounter(Arc::clone(&warnings)));
        let _guard = tracing::subscriber::set_default(subscriber);

        let mut failing = MockSink::new("failing");
        failing.should_fail = true;
        let dispatcher =
            Dispatcher::with_handles(vec![SinkHandle::new(failing, Duration::from_secs(1))]);

        let report = dispatcher.dispatch(&record("job")).await;

        assert_eq!(report.failures().count(), 1);
        assert_eq!(warnings.load(Ordering::Relaxed), 0);
    }

    #[tokio::test]
    async fn test_slow_sink_is_bounded() {
        let mut slow = MockSink::new("slow");
        slow.delay_ms = 500;
        let after = MockSink::new("after");
        let after_count = Arc::clone(&after.write_count);

        let dispatcher = Dispatcher::with_handles(vec![
            SinkHandle::new(slow, Duration::from_millis(20)),
            SinkHandle::new(after, Duration::from_secs(1)),
        ]);

        let started = std::time::Instant::now();
        let report = dispatcher.dispatch(&record("job")).await;

        assert!(started.elapsed() < Duration::from_millis(400));
        assert_eq!(after_count.load(Ordering::Relaxed), 1);
        let slow_outcome = report.outcome("slow").unwrap();
        assert!(slow_outcome.error.as_deref().unwrap().contains("timed out"));
    }

    #[tokio::test]
    async fn test_builder_fixed_order() {
        let settings = GathererSettings {
            project_info: true,
            project_endpoint: "http://127.0.0.1:9/api/projects".to_string(),
            ..Default::default()
        };

        let dispatcher = create_dispatcher(&settings).await.unwrap();
        let names: Vec<_> = dispatcher.handles().iter().map(|h| h.name()).collect();
        assert_eq!(names, vec![REST_SINK, PUBSUB_SINK, LOG_SINK]);
        assert_eq!(dispatcher.handles()[0].target(), "http://127.0.0.1:9/api/projects");
    }

    #[tokio::test]
    async fn test_builder_without_endpoint_skips_rest() {
        let dispatcher = create_dispatcher(&GathererSettings::default())
            .await
            .unwrap();
        let names: Vec<_> = dispatcher.handles().iter().map(|h| h.name()).collect();
        assert_eq!(names, vec![PUBSUB_SINK, LOG_SINK]);
    }

    #[tokio::test]
    async fn test_builder_channel_publisher() {
        let publisher = ChannelPublisher::new(4);
        let mut rx = publisher.subscribe();

        let dispatcher = DispatcherBuilder::new(&GathererSettings::default())
            .channel_publisher(publisher)
            .build()
            .await
            .unwrap();

        let report = dispatcher.dispatch(&record("job")).await;
        assert!(report.is_complete());

        let message = rx.recv().await.unwrap();
        assert_eq!(message.topic, "item-status");
        assert_eq!(message.attributes["itemName"], "job");
    }

    #[tokio::test]
    async fn test_builder_rejects_bad_udp_addr() {
        let mut settings = GathererSettings::default();
        settings.pubsub.transport = PubSubTransport::Udp;
        settings.pubsub.addr = Some("nowhere".to_string());

        let err = create_dispatcher(&settings).await.unwrap_err();
        assert!(matches!(err, DispatcherError::SinkCreation { .. }));
    }
}
