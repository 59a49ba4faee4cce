// Metrics module for Prometheus observability
// Author: kelexine (https://github.com/kelexine)

mod registry;

pub use registry::{
    gather_metrics,
    REGISTRY,
    LOGIN_EXCHANGES,
    CREDENTIAL_LOOKUPS,
    CREDENTIAL_INVALIDATIONS,
    REQUEST_ATTEMPTS,
    OPERATION_DURATION,
};

/// Helper to record login exchange outcomes
pub fn record_login(success: bool) {
    let status = if success { "success" } else { "failure" };
    LOGIN_EXCHANGES.with_label_values(&[status]).inc();
}

/// Helper to record credential cache lookups
pub fn record_credential_hit() {
    CREDENTIAL_LOOKUPS.with_label_values(&["hit"]).inc();
}

pub fn record_credential_miss() {
    CREDENTIAL_LOOKUPS.with_label_values(&["miss"]).inc();
}

pub fn record_invalidation(reason: &str) {
    CREDENTIAL_INVALIDATIONS.with_label_values(&[reason]).inc();
}

/// Helper to record a single executor attempt
pub fn record_attempt(operation: &str, outcome: &str) {
    REQUEST_ATTEMPTS.with_label_values(&[operation, outcome]).inc();
}

/// Helper to record a finished logical operation
pub fn record_operation(operation: &str, success: bool, duration_secs: f64) {
    let result = if success { "ok" } else { "error" };
    OPERATION_DURATION
        .with_label_values(&[operation, result])
        .observe(duration_secs);
}
