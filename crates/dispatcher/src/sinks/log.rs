//! LogSink - emits each record as a structured tracing event

use contracts::{ContractError, RecordSink, StatusRecord};
use tracing::{info, instrument, warn};

/// Tracing target of record events
pub const LOG_TARGET: &str = "item_stats";

/// Sink that writes records as structured log lines
pub struct LogSink {
    name: String,
    target: String,
}

impl LogSink {
    /// Create a new LogSink with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target: format!("tracing://{LOG_TARGET}"),
        }
    }

    fn log_record(&self, record: &StatusRecord) {
        let payload = record.to_json().unwrap_or_else(|e| {
            warn!(sink = %self.name, error = %e, "Record JSON encoding failed");
            String::new()
        });

        info!(
            target: LOG_TARGET,
            sink = %self.name,
            item_name = %record.item_name,
            item_url = %record.item_url,
            ci_url = %record.ci_url,
            user_id = record.user_id.as_deref(),
            user_name = record.user_name.as_deref(),
            status = %record.status,
            created_at = ?record.created_at,
            updated_at = ?record.updated_at,
            config_bytes = record.config_content.as_ref().map(|c| c.len()),
            payload = %payload,
            "Item status record"
        );
    }
}

impl RecordSink for LogSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn target(&self) -> &str {
        &self.target
    }

    #[instrument(
        name = "log_sink_send",
        skip(self, record),
        fields(sink = %self.name, item = %record.item_name)
    )]
    async fn send(&self, record: &StatusRecord) -> Result<(), ContractError> {
        self.log_record(record);
        Ok(())
    }
}
