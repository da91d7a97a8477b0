//! SinkHandle - wraps one sink with its own timeout and metrics

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, instrument};

use contracts::{ContractError, RecordSink, StatusRecord};

use crate::error::DispatcherError;
use crate::metrics::SinkMetrics;

type SendFuture<'a> = Pin<Box<dyn Future<Output = Result<(), ContractError>> + Send + 'a>>;

/// Object-safe view of a `RecordSink`
trait ErasedSink: Send + Sync {
    fn sink_name(&self) -> &str;
    fn sink_target(&self) -> &str;
    fn send_boxed<'a>(&'a self, record: &'a StatusRecord) -> SendFuture<'a>;
}

impl<S: RecordSink + Sync + 'static> ErasedSink for S {
    fn sink_name(&self) -> &str {
        RecordSink::name(self)
    }

    fn sink_target(&self) -> &str {
        RecordSink::target(self)
    }

    fn send_boxed<'a>(&'a self, record: &'a StatusRecord) -> SendFuture<'a> {
        Box::pin(RecordSink::send(self, record))
    }
}

/// Handle to one configured sink
pub struct SinkHandle {
    /// Sink name
    name: String,
    /// Endpoint / topic / log target
    target: String,
    /// Type-erased sink
    sink: Arc<dyn ErasedSink>,
    /// Upper bound for one delivery
    timeout: Duration,
    /// Shared metrics
    metrics: Arc<SinkMetrics>,
}

impl SinkHandle {
    /// Wrap a sink; every delivery is bounded by `timeout`
    pub fn new<S: RecordSink + Sync + 'static>(sink: S, timeout: Duration) -> Self {
        let name = sink.sink_name().to_string();
        let target = sink.sink_target().to_string();

        Self {
            name,
            target,
            sink: Arc::new(sink),
            timeout,
            metrics: Arc::new(SinkMetrics::new()),
        }
    }

    /// Get sink name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get sink target address
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Get the per-delivery bound
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Get current metrics
    pub fn metrics(&self) -> &Arc<SinkMetrics> {
        &self.metrics
    }

    /// Deliver one record, bounded by the handle timeout
    #[instrument(
        name = "sink_handle_deliver",
        skip(self, record),
        fields(sink = %self.name, item = %record.item_name)
    )]
    pub async fn deliver(&self, record: &StatusRecord) -> Result<(), DispatcherError> {
        let started = Instant::now();
        let result = tokio::time::timeout(self.timeout, self.sink.send_boxed(record)).await;
        self.metrics
            .set_last_latency_us(started.elapsed().as_micros() as u64);

        match result {
            Ok(Ok(())) => {
                self.metrics.inc_delivered_count();
                debug!(sink = %self.name, endpoint = %self.target, "Delivered");
                Ok(())
            }
            Ok(Err(e)) => {
                self.metrics.inc_failure_count();
                Err(e.into())
            }
            Err(_) => {
                self.metrics.inc_timeout_count();
                Err(DispatcherError::timeout(
                    &self.name,
                    self.timeout.as_millis() as u64,
                ))
            }
        }
    }
}

impl std::fmt::Debug for SinkHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SinkHandle")
            .field("name", &self.name)
            .field("target", &self.target)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use contracts::ItemStatus;
    use std::sync::atomic::{AtomicU64, Ordering};
    use tokio::time::sleep;

    /// Mock sink for testing
    pub(crate) struct MockSink {
        pub name: String,
        pub write_count: Arc<AtomicU64>,
        pub should_fail: bool,
        pub delay_ms: u64,
    }

    impl MockSink {
        pub fn new(name: &str) -> Self {
            Self {
                name: name.to_string(),
                write_count: Arc::new(AtomicU64::new(0)),
                should_fail: false,
                delay_ms: 0,
            }
        }
    }

    impl RecordSink for MockSink {
        fn name(&self) -> &str {
            &self.name
        }

        fn target(&self) -> &str {
            "mock://"
        }

        async fn send(&self, _record: &StatusRecord) -> Result<(), ContractError> {
            if self.delay_ms > 0 {
                sleep(Duration::from_millis(self.delay_ms)).await;
            }
            if self.should_fail {
                return Err(ContractError::sink_write(&self.name, "mock failure"));
            }
            self.write_count.fetch_add(1, Ordering::Relaxed);
            Ok(())
        }
    }

    pub(crate) fn record(name: &str) -> StatusRecord {
        StatusRecord {
            item_name: name.to_string(),
            item_url: format!("job/{name}/"),
            ci_url: "http://ci.example/".to_string(),
            user_id: None,
            user_name: None,
            config_content: None,
            created_at: None,
            updated_at: Some(chrono::Utc::now()),
            status: ItemStatus::Active,
        }
    }

    #[tokio::test]
    async fn test_sink_handle_basic() {
        let sink = MockSink::new("test");
        let write_count = Arc::clone(&sink.write_count);
        let handle = SinkHandle::new(sink, Duration::from_secs(1));

        for i in 0..5 {
            handle.deliver(&record(&format!("job-{i}"))).await.unwrap();
        }

        assert_eq!(write_count.load(Ordering::Relaxed), 5);
        assert_eq!(handle.metrics().delivered_count(), 5);
        assert_eq!(handle.target(), "mock://");
    }

    #[tokio::test]
    async fn test_sink_handle_timeout() {
        let mut sink = MockSink::new("slow");
        sink.delay_ms = 200;
        let handle = SinkHandle::new(sink, Duration::from_millis(20));

        let err = handle.deliver(&record("job")).await.unwrap_err();
        assert!(matches!(err, DispatcherError::Timeout { timeout_ms: 20, .. }));
        assert_eq!(handle.metrics().timeout_count(), 1);
        assert_eq!(handle.metrics().failure_count(), 1);
    }

    #[tokio::test]
    async fn test_sink_handle_failure() {
        let mut sink = MockSink::new("failing");
        sink.should_fail = true;
        let handle = SinkHandle::new(sink, Duration::from_secs(1));

        let err = handle.deliver(&record("job")).await.unwrap_err();
        assert!(matches!(err, DispatcherError::Contract(_)));
        assert_eq!(handle.metrics().failure_count(), 1);
        assert_eq!(handle.metrics().delivered_count(), 0);
    }
}
