//! # GAP Telemetry
//!
//! Logging and metrics for the write/reconcile core.
//!
//! ## Components
//!
//! - **Logging**: `tracing-subscriber` registry with an `EnvFilter` and a
//!   pretty (development) or JSON (containers) formatter.
//! - **Metrics**: Prometheus counters and histograms in a process-global
//!   registry, rendered with [`encode_metrics`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use gap_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let _guard = init_telemetry(TelemetryConfig::from_env())?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `GAP_SERVICE_NAME` | `gap-core` | Service name attached to log lines |
//! | `GAP_LOG_LEVEL` / `RUST_LOG` | `info` | Log filter directive |
//! | `GAP_JSON_LOGS` | `false` (`true` in containers) | JSON formatter |
//! | `GAP_CONSOLE_OUTPUT` | `true` | Emit to stdout at all |

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::{init_logging, LoggingGuard};
pub use metrics::{
    encode_metrics, register_metrics, MetricsHandle, GASLESS_CLIENTS, RECONCILE_ATTEMPTS,
    RECONCILE_OUTCOMES, REVOKE_PATHS, STATUS_TRANSITIONS, SUBSYSTEM_ERRORS,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging and metrics.
///
/// Returns a guard that must be held for the lifetime of the application.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    let metrics = register_metrics()?;
    let logging = init_logging(&config)?;

    tracing::info!(
        service = %config.service_name,
        json = config.json_logs,
        "Telemetry initialized"
    );

    Ok(TelemetryGuard {
        _logging: logging,
        _metrics: metrics,
    })
}

/// Guard that keeps telemetry active.
pub struct TelemetryGuard {
    _logging: LoggingGuard,
    _metrics: MetricsHandle,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!("Shutting down telemetry...");
    }
}
