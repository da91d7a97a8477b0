//! ItemStatsListener - host entry points
//!
//! Gates on the feature flag and the item variant, builds one record per
//! event and hands it to the dispatcher. Nothing escapes the entry points.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use contracts::{
    require_configurable, ConfigurableItem, FeatureFlags, HostContext, Item, ItemEvent,
    ItemListener, ItemStatus, StatusRecord,
};
use dispatcher::{DispatchReport, Dispatcher};
use observability::EventOutcome;
use tracing::{debug, instrument, warn};

use crate::builder::RecordBuilder;
use crate::inspector;

/// Publishes item status records on every lifecycle event
pub struct ItemStatsListener<F> {
    dispatcher: Arc<Dispatcher>,
    flags: F,
}

impl<F: FeatureFlags> ItemStatsListener<F> {
    pub fn new(dispatcher: Arc<Dispatcher>, flags: F) -> Self {
        Self { dispatcher, flags }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn flags(&self) -> &F {
        &self.flags
    }

    /// Process one event
    ///
    /// Returns `None` when the event was skipped (flag off or item not
    /// configurable). Sink failures are reported, never raised.
    #[instrument(
        name = "item_stats_handle",
        skip(self, item, host),
        fields(event = %event, item = %item.display_name())
    )]
    pub async fn handle(
        &self,
        event: ItemEvent,
        item: &dyn Item,
        host: &dyn HostContext,
    ) -> Option<DispatchReport> {
        if !self.flags.project_info_enabled() {
            debug!("Project info disabled, skipping");
            observability::record_item_event(event, EventOutcome::SkippedDisabled);
            return None;
        }

        let item = match require_configurable(item) {
            Ok(item) => item,
            Err(e) => {
                debug!(error = %e, "Skipping item");
                observability::record_item_event(event, EventOutcome::SkippedNotConfigurable);
                return None;
            }
        };

        let started = Instant::now();
        let record = self.build_record(event, item, host);
        let report = self.dispatcher.dispatch(&record).await;
        observability::record_dispatch_latency_ms(started.elapsed().as_secs_f64() * 1000.0);

        for outcome in &report.outcomes {
            observability::record_sink_delivery(&outcome.sink, outcome.delivered());
        }

        if report.is_complete() {
            observability::record_item_event(event, EventOutcome::Delivered);
        } else {
            for failure in report.failures() {
                warn!(
                    item = %item.display_name(),
                    endpoint = %failure.target,
                    sink = %failure.sink,
                    error = failure.error.as_deref().unwrap_or_default(),
                    "Failed to call API {} for job {}",
                    failure.target,
                    item.display_name()
                );
            }
            observability::record_item_event(event, EventOutcome::Partial);
        }

        Some(report)
    }

    fn build_record(
        &self,
        event: ItemEvent,
        item: &dyn ConfigurableItem,
        host: &dyn HostContext,
    ) -> StatusRecord {
        let builder = RecordBuilder::new(item, host);
        let now = Utc::now();

        match event {
            ItemEvent::Created => builder.created(now),
            ItemEvent::Updated => {
                let config = builder.read_config();
                let status = config
                    .as_deref()
                    .map(|raw| self.status_from_config(item, raw))
                    .unwrap_or(ItemStatus::Active);
                builder.updated(now, status, config)
            }
            ItemEvent::Deleted => builder.deleted(now),
        }
    }

    fn status_from_config(&self, item: &dyn ConfigurableItem, raw: &str) -> ItemStatus {
        let disabled = inspector::inspect(raw).unwrap_or_else(|e| {
            warn!(
                item = %item.display_name(),
                endpoint = %self.flags.project_endpoint(),
                error = %e,
                "Failed to inspect disabled flag, treating item as active"
            );
            false
        });
        ItemStatus::from_disabled(disabled)
    }
}

impl<F: FeatureFlags> ItemListener for ItemStatsListener<F> {
    async fn on_created(&self, item: &dyn Item, host: &dyn HostContext) {
        self.handle(ItemEvent::Created, item, host).await;
    }

    async fn on_updated(&self, item: &dyn Item, host: &dyn HostContext) {
        self.handle(ItemEvent::Updated, item, host).await;
    }

    async fn on_deleted(&self, item: &dyn Item, host: &dyn HostContext) {
        self.handle(ItemEvent::Deleted, item, host).await;
    }
}
