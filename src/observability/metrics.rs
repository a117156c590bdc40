//! Metrics collection and exposition.
//!
//! # Metrics
//! - `connector_operations_total` (counter): operations by resource, operation, outcome
//! - `connector_operation_duration_seconds` (histogram): operation latency
//! - `connector_webhook_events_total` (counter): webhook deliveries by decision
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed, so library callers
//!   and tests pay nothing when the exporter is disabled

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => {
            tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter")
        }
    }
}

pub fn record_operation(resource: &str, operation: &str, outcome: &'static str, start: Instant) {
    metrics::counter!(
        "connector_operations_total",
        "resource" => resource.to_string(),
        "operation" => operation.to_string(),
        "outcome" => outcome
    )
    .increment(1);
    metrics::histogram!(
        "connector_operation_duration_seconds",
        "resource" => resource.to_string(),
        "operation" => operation.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

/// `decision` is `forward` or `drop`.
pub fn record_webhook_event(decision: &'static str) {
    metrics::counter!("connector_webhook_events_total", "decision" => decision).increment(1);
}
