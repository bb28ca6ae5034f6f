//! Prometheus metrics for relay-service.
//!
//! HTTP request metrics come from `service_core::middleware::metrics`; this
//! module adds upstream call metrics and owns the exporter handle.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::Duration;

static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder. Safe to call more than once; later calls
/// return the handle from the first.
pub fn init_metrics() -> PrometheusHandle {
    HANDLE
        .get_or_init(|| {
            let recorder = PrometheusBuilder::new().build_recorder();
            let handle = recorder.handle();
            if let Err(e) = metrics::set_global_recorder(recorder) {
                tracing::warn!(error = %e, "Metrics recorder already installed");
            }
            handle
        })
        .clone()
}

/// Prometheus text exposition, or `None` before [`init_metrics`].
pub fn render() -> Option<String> {
    HANDLE.get().map(PrometheusHandle::render)
}

/// `outcome` is `success` or a [`ProviderError::kind`](super::ProviderError::kind).
pub fn record_upstream_call(outcome: &'static str, elapsed: Duration) {
    counter!("relay_upstream_requests_total", "outcome" => outcome).increment(1);
    histogram!("relay_upstream_duration_seconds", "outcome" => outcome)
        .record(elapsed.as_secs_f64());
}
