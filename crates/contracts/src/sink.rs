//! RecordSink trait - Dispatcher output interface
//!
//! Defines the abstract interface for Sinks.

use crate::{ContractError, StatusRecord};

/// Record output trait
///
/// All sink implementations must implement this trait. Sinks only borrow
/// the record; every sink observes the same snapshot.
#[trait_variant::make(RecordSink: Send)]
pub trait LocalRecordSink {
    /// Sink name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Target address (endpoint URL, topic, log target)
    fn target(&self) -> &str;

    /// Deliver one record
    ///
    /// # Errors
    /// Returns delivery error (should include context)
    async fn send(&self, record: &StatusRecord) -> Result<(), ContractError>;
}
