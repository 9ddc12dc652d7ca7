//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): completed calls by outcome category
//! - `gateway_request_duration_seconds` (histogram): latency of the HTTP exchange
//! - `gateway_identity_resolutions_total` (counter): resolutions by source
//! - `gateway_identity_attempts` (histogram): attempts spent per resolution
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - Labels are closed sets (categories, sources) to keep cardinality fixed

use std::net::SocketAddr;
use std::time::Duration;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one finished gateway call. `outcome` is `"ok"` or an error category.
pub fn record_request(outcome: &'static str, elapsed: Duration) {
    metrics::counter!("gateway_requests_total", "outcome" => outcome).increment(1);
    metrics::histogram!("gateway_request_duration_seconds").record(elapsed.as_secs_f64());
}

/// Record how identity was resolved and how many attempts it took.
pub fn record_identity_resolution(source: &'static str, attempts: u32) {
    metrics::counter!("gateway_identity_resolutions_total", "source" => source).increment(1);
    metrics::histogram!("gateway_identity_attempts").record(f64::from(attempts));
}
