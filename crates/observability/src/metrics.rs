//! 事件指标收集模块
//!
//! 记录监听器处理的每个生命周期事件，以及每个 sink 的投递结果。

use std::collections::HashMap;

use contracts::ItemEvent;
use metrics::{counter, gauge, histogram};

/// 事件处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventOutcome {
    /// 所有 sink 投递成功
    Delivered,
    /// 至少一个 sink 失败
    Partial,
    /// 功能开关关闭
    SkippedDisabled,
    /// 不是可配置条目
    SkippedNotConfigurable,
}

impl EventOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Delivered => "delivered",
            Self::Partial => "partial",
            Self::SkippedDisabled => "skipped_disabled",
            Self::SkippedNotConfigurable => "skipped_not_configurable",
        }
    }
}

/// 记录一个生命周期事件
///
/// # Example
///
/// ```ignore
/// use observability::metrics::{record_item_event, EventOutcome};
///
/// record_item_event(ItemEvent::Created, EventOutcome::Delivered);
/// ```
pub fn record_item_event(event: ItemEvent, outcome: EventOutcome) {
    counter!(
        "item_stats_events_total",
        "event" => event.as_str(),
        "outcome" => outcome.as_str()
    )
    .increment(1);
}

/// 记录单个 sink 的投递结果
pub fn record_sink_delivery(sink_name: &str, success: bool) {
    let status = if success { "success" } else { "failure" };
    counter!(
        "item_stats_sink_deliveries_total",
        "sink" => sink_name.to_string(),
        "status" => status
    )
    .increment(1);
}

/// 记录一次事件从构建到分发完成的耗时
pub fn record_dispatch_latency_ms(latency_ms: f64) {
    histogram!("item_stats_dispatch_latency_ms").record(latency_ms);
}

/// 配置读取失败
pub fn record_config_read_failure() {
    counter!("item_stats_config_read_failures_total").increment(1);
}

/// 配置内容大小
pub fn record_config_size(bytes: usize) {
    gauge!("item_stats_last_config_bytes").set(bytes as f64);
    histogram!("item_stats_config_bytes").record(bytes as f64);
}

/// 事件统计聚合器
///
/// 在内存中聚合，供 CLI 输出摘要。
#[derive(Debug, Clone, Default)]
pub struct EventStatsAggregator {
    /// 处理的事件总数
    pub total_events: u64,

    /// 有 sink 失败的事件数
    pub partial_events: u64,

    /// 被跳过的事件数
    pub skipped_events: u64,

    /// 分发耗时 (毫秒)
    pub latency_stats: RunningStats,

    /// 各 sink 失败次数
    pub sink_failures: HashMap<String, u64>,

    /// 各事件类型计数
    pub event_counts: HashMap<&'static str, u64>,
}

impl EventStatsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 更新聚合统计
    pub fn update<'a>(
        &mut self,
        event: ItemEvent,
        outcome: EventOutcome,
        latency_ms: f64,
        failed_sinks: impl IntoIterator<Item = &'a str>,
    ) {
        self.total_events += 1;
        *self.event_counts.entry(event.as_str()).or_insert(0) += 1;

        match outcome {
            EventOutcome::Delivered => {}
            EventOutcome::Partial => self.partial_events += 1,
            EventOutcome::SkippedDisabled | EventOutcome::SkippedNotConfigurable => {
                self.skipped_events += 1;
                return;
            }
        }

        self.latency_stats.push(latency_ms);
        for sink in failed_sinks {
            *self.sink_failures.entry(sink.to_string()).or_insert(0) += 1;
        }
    }

    /// 生成摘要报告
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            total_events: self.total_events,
            partial_events: self.partial_events,
            skipped_events: self.skipped_events,
            failure_rate: if self.total_events > 0 {
                self.partial_events as f64 / self.total_events as f64 * 100.0
            } else {
                0.0
            },
            dispatch_latency_ms: StatsSummary::from(&self.latency_stats),
            sink_failures: self.sink_failures.clone(),
        }
    }
}

/// 指标摘要
#[derive(Debug, Clone, Default)]
pub struct MetricsSummary {
    pub total_events: u64,
    pub partial_events: u64,
    pub skipped_events: u64,
    pub failure_rate: f64,
    pub dispatch_latency_ms: StatsSummary,
    pub sink_failures: HashMap<String, u64>,
}

impl std::fmt::Display for MetricsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Item Stats Summary ===")?;
        writeln!(f, "Total events: {}", self.total_events)?;
        writeln!(
            f,
            "Events with sink failures: {} ({:.2}%)",
            self.partial_events, self.failure_rate
        )?;
        writeln!(f, "Skipped events: {}", self.skipped_events)?;
        writeln!(f, "Dispatch latency (ms): {}", self.dispatch_latency_ms)?;

        if !self.sink_failures.is_empty() {
            writeln!(f, "Sink failures:")?;
            let mut sinks: Vec<_> = self.sink_failures.iter().collect();
            sinks.sort();
            for (sink, count) in sinks {
                writeln!(f, "  {}: {}", sink, count)?;
            }
        }

        Ok(())
    }
}

/// 统计摘要
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// 在线统计计算器 (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// 添加新值
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// 样本方差
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}
