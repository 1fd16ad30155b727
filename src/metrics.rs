//! Latency events around network and disk phases
//!
//! Event names are consumed by dashboards and must stay stable.

use std::sync::Arc;
use std::time::{Duration, Instant};

/// Download authenticated with a managed-identity bearer token
pub const ZIP_DOWNLOAD_USING_MANAGED_IDENTITY: &str =
    "linux.container.specialization.zip.download.mi.token";
/// Download issued by a warm-up request
pub const ZIP_DOWNLOAD_WARMUP: &str = "linux.container.specialization.zip.download.warmup";
/// Standard unauthenticated download
pub const ZIP_DOWNLOAD: &str = "linux.container.specialization.zip.download";
/// Writing a warm-up download to disk
pub const ZIP_WRITE_WARMUP: &str = "linux.container.specialization.zip.write.warmup";
/// Writing a standard download to disk
pub const ZIP_WRITE: &str = "linux.container.specialization.zip.write";

/// Receiver of latency measurements
pub trait MetricsSink: Send + Sync {
    /// Record that `event` took `elapsed`
    fn record_latency(&self, event: &'static str, elapsed: Duration);
}

/// Scoped latency event; records when dropped, including on error paths
#[must_use = "the event is recorded when the guard is dropped"]
pub struct LatencyEvent {
    sink: Arc<dyn MetricsSink>,
    event: &'static str,
    started: Instant,
}

impl LatencyEvent {
    /// Begin timing `event`
    pub fn start(sink: Arc<dyn MetricsSink>, event: &'static str) -> Self {
        Self {
            sink,
            event,
            started: Instant::now(),
        }
    }
}

impl Drop for LatencyEvent {
    fn drop(&mut self) {
        self.sink.record_latency(self.event, self.started.elapsed());
    }
}

/// Sink that emits each measurement as a debug-level tracing event
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingMetrics;

impl MetricsSink for TracingMetrics {
    fn record_latency(&self, event: &'static str, elapsed: Duration) {
        tracing::debug!(
            event = event,
            latency_ms = elapsed.as_millis(),
            "latency event"
        );
    }
}

/// Sink that discards measurements
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpMetrics;

impl MetricsSink for NoOpMetrics {
    fn record_latency(&self, _event: &'static str, _elapsed: Duration) {}
}

/// Name of the download event for a request
pub(crate) fn download_event(has_token: bool, warm_up: bool) -> &'static str {
    if has_token {
        ZIP_DOWNLOAD_USING_MANAGED_IDENTITY
    } else if warm_up {
        ZIP_DOWNLOAD_WARMUP
    } else {
        ZIP_DOWNLOAD
    }
}

/// Name of the disk-write event for a request
pub(crate) fn write_event(warm_up: bool) -> &'static str {
    if warm_up { ZIP_WRITE_WARMUP } else { ZIP_WRITE }
}
