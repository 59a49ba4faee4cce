// Prometheus metrics registry and collectors
// Author: kelexine (https://github.com/kelexine)

use lazy_static::lazy_static;
use prometheus::{
    CounterVec, HistogramVec, Opts, Registry, TextEncoder, Encoder,
    register_counter_vec_with_registry, register_histogram_vec_with_registry,
};
use tracing::error;

lazy_static! {
    /// Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    // ============================================================================
    // CREDENTIAL METRICS
    // ============================================================================

    /// Login exchanges performed against the token endpoint
    pub static ref LOGIN_EXCHANGES: CounterVec = register_counter_vec_with_registry!(
        Opts::new("vadu_login_exchanges_total", "Total login exchanges"),
        &["status"], // status: success, failure
        REGISTRY
    ).expect("login exchange counter registers once");

    /// Credential cache lookups
    pub static ref CREDENTIAL_LOOKUPS: CounterVec = register_counter_vec_with_registry!(
        Opts::new("vadu_credential_lookups_total", "Total credential cache lookups"),
        &["result"], // result: hit, miss
        REGISTRY
    ).expect("credential lookup counter registers once");

    /// Cached credentials dropped after the API rejected them
    pub static ref CREDENTIAL_INVALIDATIONS: CounterVec = register_counter_vec_with_registry!(
        Opts::new("vadu_credential_invalidations_total", "Total credential invalidations"),
        &["reason"], // reason: explicit, rejected
        REGISTRY
    ).expect("credential invalidation counter registers once");

    // ============================================================================
    // REQUEST METRICS
    // ============================================================================

    /// Individual attempts issued by the executor
    pub static ref REQUEST_ATTEMPTS: CounterVec = register_counter_vec_with_registry!(
        Opts::new("vadu_request_attempts_total", "Total request attempts"),
        &["operation", "outcome"], // outcome: success, retryable, terminal
        REGISTRY
    ).expect("request attempt counter registers once");

    /// Wall time of whole logical operations, retries included
    pub static ref OPERATION_DURATION: HistogramVec = register_histogram_vec_with_registry!(
        prometheus::HistogramOpts::new("vadu_operation_duration_seconds", "Operation duration in seconds")
            .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]),
        &["operation", "result"], // result: ok, error
        REGISTRY
    ).expect("operation duration histogram registers once");
}

/// Gather all metrics and return as Prometheus text format
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        error!("Failed to encode metrics: {}", e);
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
