//! Metrics collection and exposition.
//!
//! # Metrics
//! - `songs_api_requests_total` (counter): song API calls by method, endpoint
//! - `catalog_http_requests_total` (counter): all requests by method, endpoint, status
//! - `catalog_http_request_duration_seconds` (histogram): latency distribution
//! - `catalog_songs` (gauge): number of songs in the collection
//! - `catalog_injected_failures_total` (counter): failures produced by fault injection
//!
//! # Design Decisions
//! - One Prometheus recorder per process; every server shares its handle
//! - Rendered on the service's own `/metrics` route (pull model)

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::Instant;

static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder (once) and return its render handle.
pub fn init_metrics() -> PrometheusHandle {
    HANDLE
        .get_or_init(|| {
            let recorder = PrometheusBuilder::new().build_recorder();
            let handle = recorder.handle();
            if metrics::set_global_recorder(recorder).is_err() {
                tracing::warn!("A metrics recorder was already installed; /metrics may be empty");
            } else {
                tracing::info!("Prometheus metrics recorder installed");
            }
            handle
        })
        .clone()
}

/// Count a call to a song API operation.
pub fn record_song_request(method: &'static str, endpoint: &'static str) {
    counter!("songs_api_requests_total", "method" => method, "endpoint" => endpoint).increment(1);
}

/// Record a completed HTTP request.
pub fn record_request(method: &str, status: u16, endpoint: &str, start: Instant) {
    let method = method.to_string();
    let endpoint = endpoint.to_string();

    counter!(
        "catalog_http_requests_total",
        "method" => method.clone(),
        "endpoint" => endpoint.clone(),
        "status" => status.to_string()
    )
    .increment(1);

    histogram!(
        "catalog_http_request_duration_seconds",
        "method" => method,
        "endpoint" => endpoint
    )
    .record(start.elapsed().as_secs_f64());
}

/// Publish the current collection size.
pub fn record_catalog_size(size: usize) {
    gauge!("catalog_songs").set(size as f64);
}

pub fn record_injected_failure(endpoint: &str) {
    counter!("catalog_injected_failures_total", "endpoint" => endpoint.to_string()).increment(1);
}
