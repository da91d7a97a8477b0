//! Dispatcher error types

use thiserror::Error;

/// Dispatcher-specific errors
#[derive(Debug, Error)]
pub enum DispatcherError {
    /// Sink creation error
    #[error("failed to create sink '{name}': {message}")]
    SinkCreation { name: String, message: String },

    /// Sink call exceeded its bound
    #[error("sink '{sink_name}' timed out after {timeout_ms}ms")]
    Timeout { sink_name: String, timeout_ms: u64 },

    /// Sink write error (from contract)
    #[error("sink error: {0}")]
    Contract(#[from] contracts::ContractError),
}

impl DispatcherError {
    /// Create a sink creation error
    pub fn sink_creation(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkCreation {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a timeout error
    pub fn timeout(sink_name: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Timeout {
            sink_name: sink_name.into(),
            timeout_ms,
        }
    }
}
