//! # Observability
//!
//! 可观测性模块：Tracing + Prometheus 指标。
//!
//! ## 功能
//!
//! - Tracing 初始化 (JSON/Pretty/Compact 格式)
//! - 记录日志 target 始终保留在 info 级别（quiet 模式下仍输出状态记录）
//! - Prometheus 指标导出
//! - 生命周期事件与 sink 投递指标
//!
//! ## 使用示例
//!
//! ```ignore
//! use observability::{init_with_config, ObservabilityConfig};
//!
//! init_with_config(ObservabilityConfig::default().with_record_target("item_stats"))?;
//! observability::record_item_event(ItemEvent::Created, EventOutcome::Delivered);
//! ```

pub mod metrics;

use anyhow::{Context, Result};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

// Re-exports
pub use crate::metrics::{
    record_config_read_failure, record_config_size, record_dispatch_latency_ms,
    record_item_event, record_sink_delivery, EventOutcome, EventStatsAggregator, MetricsSummary,
    RunningStats, StatsSummary,
};

/// 可观测性配置
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// 日志格式
    pub log_format: LogFormat,
    /// 默认日志级别
    pub default_log_level: String,
    /// 状态记录的 tracing target，总是以 info 级别输出
    pub record_target: Option<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Json,
            default_log_level: "info".to_string(),
            record_target: None,
        }
    }
}

impl ObservabilityConfig {
    pub fn with_record_target(mut self, target: impl Into<String>) -> Self {
        self.record_target = Some(target.into());
        self
    }

    /// Filter directives: `RUST_LOG` wins, else the default level plus the record target
    fn filter_directives(&self, env: Option<String>) -> String {
        if let Some(directives) = env.filter(|d| !d.trim().is_empty()) {
            return directives;
        }
        match &self.record_target {
            Some(target) => format!("{},{}=info", self.default_log_level, target),
            None => self.default_log_level.clone(),
        }
    }
}

/// 日志格式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// JSON 结构化日志
    #[default]
    Json,
    /// 人类可读格式
    Pretty,
    /// 紧凑单行格式
    Compact,
}

fn fmt_layer(format: LogFormat) -> Box<dyn Layer<Registry> + Send + Sync> {
    match format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(false)
            .boxed(),
        LogFormat::Pretty => fmt::layer().pretty().boxed(),
        LogFormat::Compact => fmt::layer().compact().boxed(),
    }
}

/// 使用自定义配置初始化 Tracing
pub fn init_with_config(config: ObservabilityConfig) -> Result<()> {
    let directives = config.filter_directives(std::env::var(EnvFilter::DEFAULT_ENV).ok());
    let filter = EnvFilter::try_new(&directives)
        .with_context(|| format!("Invalid log filter '{directives}'"))?;

    tracing_subscriber::registry()
        .with(fmt_layer(config.log_format))
        .with(filter)
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    tracing::debug!(
        log_format = ?config.log_format,
        filter = %directives,
        "Observability initialized"
    );

    Ok(())
}

/// 仅初始化 Prometheus 指标（不初始化 Tracing）
pub fn init_metrics_only(port: u16) -> Result<()> {
    PrometheusBuilder::new()
        .with_http_listener(([0, 0, 0, 0], port))
        .install()
        .context("Failed to install Prometheus recorder")?;

    tracing::info!(port = port, "Prometheus metrics endpoint initialized");
    Ok(())
}
