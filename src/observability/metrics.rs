//! Metrics collection and exposition.
//!
//! # Metrics
//! - `mock_requests_total` (counter): requests by outcome and status
//! - `mock_request_duration_seconds` (histogram): time to first byte, delays included
//! - `mock_reloads_total` (counter): reload attempts by result
//! - `mock_behaviors_exhausted_total` (counter): behaviors retired by their repeat budget
//! - `mock_active_behaviors` (gauge): behaviors still eligible to match
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape endpoint. Must run inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(method: &str, status: u16, matched: bool, start: Instant) {
    let outcome = if matched { "matched" } else { "fallback" };
    metrics::counter!(
        "mock_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "outcome" => outcome
    )
    .increment(1);
    metrics::histogram!("mock_request_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_reload(success: bool) {
    let result = if success { "success" } else { "failure" };
    metrics::counter!("mock_reloads_total", "result" => result).increment(1);
}

pub fn record_exhausted() {
    metrics::counter!("mock_behaviors_exhausted_total").increment(1);
}

pub fn record_active_behaviors(count: usize) {
    metrics::gauge!("mock_active_behaviors").set(count as f64);
}
