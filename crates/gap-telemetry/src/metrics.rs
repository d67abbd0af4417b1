//! Prometheus metrics for the GAP write/reconcile core.
//!
//! All metrics follow the naming convention: `gap_<area>_<metric>_<unit>`
//!
//! ## Metric Types
//!
//! - **Counter**: Monotonically increasing value (e.g., reconcile outcomes)
//! - **Histogram**: Distribution of values (e.g., poll attempts per run)

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, CounterVec, Encoder, Histogram, HistogramOpts, Opts, Registry,
    TextEncoder,
};
use std::sync::Arc;

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // RECONCILIATION METRICS (gap-02)
    // =========================================================================

    /// Terminal verdicts of write-then-reconcile runs
    pub static ref RECONCILE_OUTCOMES: CounterVec = CounterVec::new(
        Opts::new("gap_reconcile_outcomes_total", "Write-then-reconcile runs by verdict"),
        &["operation", "verdict"]  // verdict: indexed/timed_out/cancelled/submit_failed
    ).expect("metric creation failed");

    /// Indexer polls needed before a run terminated
    pub static ref RECONCILE_ATTEMPTS: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "gap_reconcile_poll_attempts",
            "Indexer fetches performed per reconcile run"
        ).buckets(exponential_buckets(1.0, 2.0, 11).expect("bucket creation failed"))
    ).expect("metric creation failed");

    // =========================================================================
    // REVOKE METRICS (gap-03)
    // =========================================================================

    /// Revocations by the path that completed them
    pub static ref REVOKE_PATHS: CounterVec = CounterVec::new(
        Opts::new("gap_revoke_total", "Revocations by completing path"),
        &["kind", "path"]  // path: onchain/offchain/failed
    ).expect("metric creation failed");

    // =========================================================================
    // APPLICATION REVIEW METRICS (gap-01)
    // =========================================================================

    /// Application status transitions applied
    pub static ref STATUS_TRANSITIONS: CounterVec = CounterVec::new(
        Opts::new("gap_application_status_transitions_total", "Applied review transitions"),
        &["from", "to"]
    ).expect("metric creation failed");

    // =========================================================================
    // GASLESS METRICS (gap-04)
    // =========================================================================

    /// Sponsored client creation attempts
    pub static ref GASLESS_CLIENTS: CounterVec = CounterVec::new(
        Opts::new("gap_gasless_clients_total", "Gasless client creations by provider"),
        &["provider", "outcome"]  // outcome: created/disabled/failed
    ).expect("metric creation failed");

    // =========================================================================
    // ERROR METRICS
    // =========================================================================

    /// Errors forwarded to the error reporter
    pub static ref SUBSYSTEM_ERRORS: CounterVec = CounterVec::new(
        Opts::new("gap_errors_total", "Reported errors by context"),
        &["context"]
    ).expect("metric creation failed");
}

/// Handle for the metrics registry
pub struct MetricsHandle {
    _registry: Arc<Registry>,
}

/// Register all metrics with the global registry.
///
/// Registering twice is not an error; the second call returns a new handle.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // Reconciliation
        Box::new(RECONCILE_OUTCOMES.clone()),
        Box::new(RECONCILE_ATTEMPTS.clone()),
        // Revoke
        Box::new(REVOKE_PATHS.clone()),
        // Applications
        Box::new(STATUS_TRANSITIONS.clone()),
        // Gasless
        Box::new(GASLESS_CLIENTS.clone()),
        // Errors
        Box::new(SUBSYSTEM_ERRORS.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(MetricsHandle {
        _registry: Arc::new(REGISTRY.clone()),
    })
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}
