//! # Dispatcher
//!
//! 记录分发模块。
//!
//! 负责：
//! - 接收 `StatusRecord`
//! - Fan-out 到固定顺序的 sinks (REST → Pub/Sub → Log)
//! - 隔离失败 sink，不影响其他 sink 与宿主调用

pub mod dispatcher;
pub mod error;
pub mod handle;
pub mod metrics;
pub mod sinks;

pub use contracts::{RecordSink, StatusRecord};
pub use dispatcher::{
    create_dispatcher, DispatchReport, Dispatcher, DispatcherBuilder, SinkOutcome, LOG_SINK,
    PUBSUB_SINK, REST_SINK,
};
pub use error::DispatcherError;
pub use handle::SinkHandle;
pub use metrics::{MetricsSnapshot, SinkMetrics};
pub use sinks::{
    ChannelPublisher, LogSink, PubSubMessage, PubSubSink, Publisher, RestSink, UdpPublisher,
    LOG_TARGET,
};
