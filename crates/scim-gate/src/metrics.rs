//! Prometheus metrics for scim-gate.
//!
//! Tracks rule decisions, upstream forwarding and overall request outcomes.
use lazy_static::lazy_static;
use prometheus::{
    register_counter, register_counter_vec, register_histogram_vec, Counter, CounterVec, Encoder,
    HistogramVec, TextEncoder,
};

lazy_static! {
    /// Total number of requests processed
    pub static ref REQUESTS_TOTAL: CounterVec = register_counter_vec!(
        "scim_gate_requests_total",
        "Total number of requests processed by the gateway",
        &["method", "status"]
    )
    .unwrap();

    /// How each request was disposed of
    pub static ref DECISIONS_TOTAL: CounterVec = register_counter_vec!(
        "scim_gate_decisions_total",
        "Requests by decision taken",
        &["action"]  // action: reject|silent|empty|forward
    )
    .unwrap();

    /// Upstream transport failures answered with 502
    pub static ref UPSTREAM_ERRORS_TOTAL: Counter = register_counter!(
        "scim_gate_upstream_errors_total",
        "Total number of upstream transport failures"
    )
    .unwrap();

    /// Upstream request duration
    pub static ref UPSTREAM_REQUEST_DURATION_MS: HistogramVec = register_histogram_vec!(
        "scim_gate_upstream_request_duration_ms",
        "Duration of upstream requests until the response head arrived",
        &["method", "status"],
        vec![1.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 500.0, 1000.0, 2500.0, 5000.0]
    )
    .unwrap();
}

/// Collect and return all metrics in Prometheus text format
pub fn collect_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::warn!("Failed to encode metrics: {}", e);
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

/// Label for an HTTP method. Extension methods are caller-chosen tokens, so
/// they all share `OTHER` to keep the series count bounded.
fn method_label(method: &str) -> &'static str {
    match method.to_ascii_uppercase().as_str() {
        "GET" => "GET",
        "POST" => "POST",
        "PUT" => "PUT",
        "PATCH" => "PATCH",
        "DELETE" => "DELETE",
        _ => "OTHER",
    }
}

/// Helper to record request processing
pub fn record_request(method: &str, status: u16) {
    REQUESTS_TOTAL
        .with_label_values(&[method_label(method), &status.to_string()])
        .inc();
}

/// Helper to record a decision (`forward` or a rule action)
pub fn record_decision(action: &str) {
    DECISIONS_TOTAL.with_label_values(&[action]).inc();
}

pub fn record_upstream_error() {
    UPSTREAM_ERRORS_TOTAL.inc();
}

pub fn record_upstream_duration(method: &str, status: u16, duration_ms: f64) {
    UPSTREAM_REQUEST_DURATION_MS
        .with_label_values(&[method_label(method), &status.to_string()])
        .observe(duration_ms);
}
