//! `info` command implementation.

use anyhow::{Context, Result};
use contracts::GathererSettings;
use dispatcher::{create_dispatcher, Dispatcher};
use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;
use crate::commands::load_settings;

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo<'a> {
    settings: &'a GathererSettings,
    sinks: Vec<SinkInfo>,
}

#[derive(Serialize)]
struct SinkInfo {
    name: String,
    target: String,
    timeout_ms: u64,
}

/// Execute the `info` command
pub async fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration info");

    let settings = load_settings(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;
    let dispatcher = create_dispatcher(&settings)
        .await
        .context("Failed to build sinks")?;

    if args.json {
        let info = ConfigInfo {
            settings: &settings,
            sinks: sink_infos(&dispatcher),
        };
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&settings, &dispatcher);
    }

    Ok(())
}

fn sink_infos(dispatcher: &Dispatcher) -> Vec<SinkInfo> {
    dispatcher
        .handles()
        .iter()
        .map(|h| SinkInfo {
            name: h.name().to_string(),
            target: h.target().to_string(),
            timeout_ms: h.timeout().as_millis() as u64,
        })
        .collect()
}

fn print_config_info(settings: &GathererSettings, dispatcher: &Dispatcher) {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                 Item Stats Configuration                     ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("⚙️  Gatherer");
    println!("   ├─ Project info: {}", settings.project_info);
    println!("   ├─ Host: {}", settings.host.root_url);
    match &settings.host.principal {
        Some(principal) => println!("   ├─ Principal: {}", principal),
        None => println!("   ├─ Principal: (anonymous)"),
    }
    println!("   └─ Users: {}", settings.users.len());

    let handles = dispatcher.handles();
    println!("\n📤 Sinks ({}, in dispatch order)", handles.len());
    for (i, handle) in handles.iter().enumerate() {
        let prefix = if i == handles.len() - 1 { "└─" } else { "├─" };
        println!(
            "   {} {} → {} ({} ms)",
            prefix,
            handle.name(),
            handle.target(),
            handle.timeout().as_millis()
        );
    }

    println!();
}
