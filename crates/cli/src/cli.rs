//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use contracts::ItemEvent;
use std::path::PathBuf;

/// Item Stats - publish item lifecycle status records
#[derive(Parser, Debug)]
#[command(
    name = "item-stats",
    author,
    version,
    about = "Publish item lifecycle status records",
    long_about = "Builds a status record for each item directory and fans it out to the \n\
                  configured sinks (REST endpoint, pub/sub topic, structured log).\n\n\
                  A directory holding config.xml is a job; any other directory is a \n\
                  folder and is skipped."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "ITEM_STATS_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "ITEM_STATS_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Emit one lifecycle event per item directory
    Emit(EmitArgs),

    /// Validate configuration file without emitting
    Validate(ValidateArgs),

    /// Display effective configuration and sink order
    Info(InfoArgs),
}

/// Arguments for the `emit` command
#[derive(Parser, Debug, Clone)]
pub struct EmitArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(
        short,
        long,
        default_value = "item-stats.toml",
        env = "ITEM_STATS_CONFIG"
    )]
    pub config: PathBuf,

    /// Lifecycle event to emit
    #[arg(short, long, value_enum)]
    pub event: EventArg,

    /// Acting principal (overrides host.principal)
    #[arg(short, long, env = "ITEM_STATS_PRINCIPAL")]
    pub principal: Option<String>,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "ITEM_STATS_METRICS_PORT")]
    pub metrics_port: u16,

    /// Item directories
    #[arg(required = true, value_name = "ITEM_DIR")]
    pub items: Vec<PathBuf>,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "item-stats.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "item-stats.toml")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Lifecycle event
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventArg {
    Created,
    Updated,
    Deleted,
}

impl From<EventArg> for ItemEvent {
    fn from(event: EventArg) -> Self {
        match event {
            EventArg::Created => ItemEvent::Created,
            EventArg::Updated => ItemEvent::Updated,
            EventArg::Deleted => ItemEvent::Deleted,
        }
    }
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}
