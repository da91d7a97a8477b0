//! `emit` command implementation.

use std::sync::Arc;
use std::time::Instant;

use contracts::{FeatureFlags, ItemEvent};
use dispatcher::{create_dispatcher, DispatchReport};
use gatherer::ItemStatsListener;
use host::{FsItem, StaticHostContext};
use observability::{EventOutcome, EventStatsAggregator};
use tracing::{info, warn};

use crate::cli::EmitArgs;
use crate::commands::load_settings;
use crate::error::{CliError, Result};

/// Execute the `emit` command
///
/// Sink failures are reported in the summary; they never fail the command.
pub async fn run_emit(args: &EmitArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration");
    let settings = load_settings(&args.config)?;

    if args.metrics_port != 0 {
        observability::init_metrics_only(args.metrics_port)?;
    }

    let event = ItemEvent::from(args.event);
    let dispatcher = Arc::new(create_dispatcher(&settings).await?);
    let host = StaticHostContext::from_settings(&settings, args.principal.clone());
    let listener = ItemStatsListener::new(dispatcher, settings);

    info!(
        event = %event,
        items = args.items.len(),
        enabled = listener.flags().project_info_enabled(),
        "Emitting events"
    );

    let mut stats = EventStatsAggregator::new();
    for path in &args.items {
        let item = match FsItem::open(path) {
            Ok(item) => item,
            Err(e) => {
                let err = CliError::item_open(path, e);
                warn!(error = %err, "Skipping item");
                continue;
            }
        };

        let started = Instant::now();
        let report = listener.handle(event, &item, &host).await;
        let latency_ms = started.elapsed().as_secs_f64() * 1000.0;

        let outcome = classify(report.as_ref(), listener.flags().project_info_enabled());
        let failed: Vec<&str> = report
            .iter()
            .flat_map(|r| r.failures())
            .map(|o| o.sink.as_str())
            .collect();

        println!(
            "{:<8} {:<24} {:<9} {}",
            event.as_str(),
            path.display(),
            item.kind(),
            describe(outcome, &failed)
        );
        stats.update(event, outcome, latency_ms, failed);
    }

    println!("\n{}", stats.summary());
    println!("Sink totals:");
    for (sink, snapshot) in listener.dispatcher().metrics() {
        println!(
            "  {}: delivered={} failed={} timed_out={}",
            sink, snapshot.delivered_count, snapshot.failure_count, snapshot.timeout_count
        );
    }
    Ok(())
}

fn classify(report: Option<&DispatchReport>, enabled: bool) -> EventOutcome {
    match report {
        None if !enabled => EventOutcome::SkippedDisabled,
        None => EventOutcome::SkippedNotConfigurable,
        Some(r) if r.is_complete() => EventOutcome::Delivered,
        Some(_) => EventOutcome::Partial,
    }
}

fn describe(outcome: EventOutcome, failed: &[&str]) -> String {
    match outcome {
        EventOutcome::Partial => format!("partial (failed: {})", failed.join(", ")),
        other => other.as_str().to_string(),
    }
}
