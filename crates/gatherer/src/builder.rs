//! RecordBuilder - assembles a StatusRecord from item and host state

use chrono::{DateTime, Utc};
use contracts::{ConfigurableItem, HostContext, ItemStatus, StatusRecord};
use tracing::{debug, warn};

/// Builds records for one item as seen from one host context
pub struct RecordBuilder<'a> {
    item: &'a dyn ConfigurableItem,
    host: &'a dyn HostContext,
}

impl<'a> RecordBuilder<'a> {
    pub fn new(item: &'a dyn ConfigurableItem, host: &'a dyn HostContext) -> Self {
        Self { item, host }
    }

    /// Identity-only record: item, host and acting user
    ///
    /// Status starts as `ACTIVE`; no timestamps and no config.
    pub fn build(&self) -> StatusRecord {
        let mut record = StatusRecord {
            item_name: self.item.name().to_string(),
            item_url: self.item.url().to_string(),
            ci_url: self.host.root_url().to_string(),
            user_id: None,
            user_name: None,
            config_content: None,
            created_at: None,
            updated_at: None,
            status: ItemStatus::Active,
        };

        match self.host.current_principal() {
            Some(principal) => match self.host.find_user(&principal) {
                Some(user) => {
                    record.user_id = Some(user.id);
                    record.user_name = Some(user.full_name);
                }
                None => debug!(principal = %principal, "No user record for principal"),
            },
            None => debug!("No authenticated principal"),
        }

        record
    }

    /// Read the raw configuration; a read failure is logged and yields `None`
    pub fn read_config(&self) -> Option<String> {
        match self.item.config_as_string() {
            Ok(config) => {
                observability::record_config_size(config.len());
                Some(config)
            }
            Err(e) => {
                warn!(
                    item = %self.item.display_name(),
                    error = %e,
                    "Failed to read item configuration"
                );
                observability::record_config_read_failure();
                None
            }
        }
    }

    /// Fill `configContent` from a fresh read
    pub fn attach_config(&self, record: &mut StatusRecord) {
        record.config_content = self.read_config();
    }

    /// Record for a creation at `now`
    pub fn created(&self, now: DateTime<Utc>) -> StatusRecord {
        let mut record = self.build();
        record.created_at = Some(now);
        record.status = ItemStatus::Active;
        self.attach_config(&mut record);
        record
    }

    /// Record for an update at `now` with an already read config
    pub fn updated(
        &self,
        now: DateTime<Utc>,
        status: ItemStatus,
        config: Option<String>,
    ) -> StatusRecord {
        let mut record = self.build();
        record.updated_at = Some(now);
        record.status = status;
        record.config_content = config;
        record
    }

    /// Record for a deletion at `now`; config is never attached
    pub fn deleted(&self, now: DateTime<Utc>) -> StatusRecord {
        let mut record = self.build();
        record.updated_at = Some(now);
        record.status = ItemStatus::Deleted;
        record
    }
}
