//! Sink implementations
//!
//! Contains RestSink, PubSubSink (with its publishers), and LogSink.

mod log;
mod pubsub;
mod rest;

pub use self::log::{LogSink, LOG_TARGET};
pub use self::pubsub::{
    ChannelPublisher, LocalPublisher, PubSubMessage, PubSubSink, Publisher, UdpPublisher,
};
pub use self::rest::RestSink;
