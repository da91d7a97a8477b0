//! GathererSettings - Config Loader output
//!
//! Describes the feature flag, endpoints, pub/sub topic, delivery bounds and
//! the optional static user directory.

use serde::{Deserialize, Serialize};

use crate::FeatureFlags;

/// Complete gatherer configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GathererSettings {
    /// "project info enabled" feature flag
    #[serde(default)]
    pub project_info: bool,

    /// REST endpoint receiving project records
    #[serde(default)]
    pub project_endpoint: String,

    /// Host identity settings
    #[serde(default)]
    pub host: HostConfig,

    /// Pub/sub sink settings
    #[serde(default)]
    pub pubsub: PubSubConfig,

    /// Per-sink delivery settings
    #[serde(default)]
    pub delivery: DeliveryConfig,

    /// Static user directory
    #[serde(default)]
    pub users: Vec<UserConfig>,
}

impl FeatureFlags for GathererSettings {
    fn project_info_enabled(&self) -> bool {
        self.project_info
    }

    fn project_endpoint(&self) -> &str {
        &self.project_endpoint
    }
}

/// Host identity settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostConfig {
    /// Root URL of the host instance
    #[serde(default = "default_root_url")]
    pub root_url: String,

    /// Principal used when none is given on the command line
    #[serde(default)]
    pub principal: Option<String>,
}

fn default_root_url() -> String {
    "http://localhost:8080/".to_string()
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            root_url: default_root_url(),
            principal: None,
        }
    }
}

/// Pub/sub transport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PubSubTransport {
    /// In-process broadcast channel
    #[default]
    Channel,
    /// UDP datagrams to a topic gateway
    Udp,
}

/// Pub/sub sink settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PubSubConfig {
    /// Topic name
    #[serde(default = "default_topic")]
    pub topic: String,

    /// Transport
    #[serde(default)]
    pub transport: PubSubTransport,

    /// Gateway address (udp only), e.g. "127.0.0.1:7400"
    #[serde(default)]
    pub addr: Option<String>,

    /// Broadcast capacity (channel only)
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

fn default_topic() -> String {
    "item-status".to_string()
}

fn default_channel_capacity() -> usize {
    64
}

impl Default for PubSubConfig {
    fn default() -> Self {
        Self {
            topic: default_topic(),
            transport: PubSubTransport::default(),
            addr: None,
            channel_capacity: default_channel_capacity(),
        }
    }
}

/// Per-sink delivery settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryConfig {
    /// Upper bound for one sink call
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// User agent for the REST sink
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_timeout_ms() -> u64 {
    2000
}

fn default_user_agent() -> String {
    concat!("item-stats/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            user_agent: default_user_agent(),
        }
    }
}

impl DeliveryConfig {
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_ms)
    }
}

/// Static user directory entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserConfig {
    pub id: String,
    #[serde(default)]
    pub full_name: Option<String>,
}
