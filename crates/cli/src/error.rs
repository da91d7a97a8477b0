//! Error types for CLI operations.

use std::path::PathBuf;

use contracts::ContractError;
use dispatcher::DispatcherError;
use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Configuration could not be loaded
    #[error("Failed to load configuration: {0}")]
    Config(#[from] ContractError),

    /// Sinks could not be created
    #[error("Failed to build dispatcher: {0}")]
    Dispatcher(#[from] DispatcherError),

    /// Item directory could not be opened
    #[error("Failed to open item {}: {source}", path.display())]
    ItemOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Generic error wrapper
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl CliError {
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    pub fn item_open(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ItemOpen {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
