//! # Guardian Telemetry
//!
//! Logging and metrics for the deposit guardian.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use guardian_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let _guard = init_telemetry(TelemetryConfig::from_env())?;
//! // ... run the guardian
//! println!("{}", guardian_telemetry::render_metrics()?);
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `GUARDIAN_SERVICE_NAME` | `deposit-guardian` | Service name in logs |
//! | `GUARDIAN_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `GUARDIAN_JSON_LOGS` | `false` (`true` in containers) | JSON log lines |
//! | `GUARDIAN_CONSOLE_OUTPUT` | `true` | Write logs to stdout |

#![warn(missing_docs)]

mod config;
mod metrics;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use metrics::{register_metrics, render_metrics, BUILD_INFO};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// The tracing subscriber could not be installed
    #[error("Failed to initialize tracing: {0}")]
    TracingInit(String),

    /// Metric registration or encoding failed
    #[error("Failed to initialize Prometheus metrics: {0}")]
    Metrics(String),
}

/// Install the log subscriber and register process metrics.
///
/// Hold the returned guard for the lifetime of the process.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    tracing_setup::init_tracing(&config)?;
    register_metrics(&config)?;

    Ok(TelemetryGuard {
        service_name: config.service_name,
    })
}

/// Keeps telemetry active; logs on drop.
pub struct TelemetryGuard {
    service_name: String,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!(service = %self.service_name, "[runtime] Shutting down telemetry");
    }
}
