//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::{GathererSettings, PubSubTransport};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;
use crate::commands::load_settings;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    project_info: bool,
    project_endpoint: String,
    topic: String,
    timeout_ms: u64,
    user_count: usize,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    match load_settings(&args.config) {
        Ok(settings) => {
            let warnings = collect_warnings(&settings);

            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ConfigSummary {
                    project_info: settings.project_info,
                    project_endpoint: settings.project_endpoint.clone(),
                    topic: settings.pubsub.topic.clone(),
                    timeout_ms: settings.delivery.timeout_ms,
                    user_count: settings.users.len(),
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(settings: &GathererSettings) -> Vec<String> {
    let mut warnings = Vec::new();

    if !settings.project_info {
        warnings.push("project_info is off - every event is a no-op".to_string());
    }

    if settings.project_endpoint.trim().is_empty() {
        warnings.push("No project_endpoint configured - REST sink disabled".to_string());
    }

    if settings.pubsub.transport == PubSubTransport::Channel {
        warnings.push(
            "pubsub.transport is 'channel' - messages stay in process".to_string(),
        );
    }

    if settings.users.is_empty() {
        warnings.push("No users configured - userId/userName will be unset".to_string());
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Project info: {}", summary.project_info);
            println!("  Endpoint: {}", summary.project_endpoint);
            println!("  Topic: {}", summary.topic);
            println!("  Timeout: {} ms", summary.timeout_ms);
            println!("  Users: {}", summary.user_count);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
