//! Prometheus metrics for taxitrack.

use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_histogram_vec, CounterVec, HistogramVec, TextEncoder,
};

/// Remote action counter by action and outcome.
pub static REMOTE_CALLS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "taxitrack_remote_calls_total",
        "Total number of remote spreadsheet calls",
        &["action", "outcome"] // ok, not_configured, network, api, empty, decode
    )
    .expect("Failed to register remote_calls_total")
});

/// Remote action duration histogram.
pub static REMOTE_CALL_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "taxitrack_remote_call_duration_seconds",
        "Remote spreadsheet call duration in seconds",
        &["action"],
        vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]
    )
    .expect("Failed to register remote_call_duration")
});

/// Operations that fell back to local-only state after a remote failure.
pub static LOCAL_FALLBACKS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "taxitrack_local_fallbacks_total",
        "Total number of operations applied locally without remote confirmation",
        &["operation"]
    )
    .expect("Failed to register local_fallbacks_total")
});

/// Snapshot writes by outcome.
pub static SNAPSHOT_WRITES_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "taxitrack_snapshot_writes_total",
        "Total number of local snapshot writes",
        &["outcome"]
    )
    .expect("Failed to register snapshot_writes_total")
});

/// Initialize all metrics (forces lazy initialization).
pub fn init_metrics() {
    Lazy::force(&REMOTE_CALLS_TOTAL);
    Lazy::force(&REMOTE_CALL_DURATION);
    Lazy::force(&LOCAL_FALLBACKS_TOTAL);
    Lazy::force(&SNAPSHOT_WRITES_TOTAL);
}

/// Get metrics in Prometheus text format.
pub fn get_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    encoder
        .encode_to_string(&metric_families)
        .unwrap_or_default()
}
