//! Log subscriber setup.
//!
//! A `tracing-subscriber` registry with an `EnvFilter` and either a human
//! readable or a JSON fmt layer.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{TelemetryConfig, TelemetryError};

/// Install the global subscriber.
///
/// `RUST_LOG` directives take precedence over `config.log_level`.
pub fn init_tracing(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| TelemetryError::TracingInit(e.to_string()))?;

    if !config.console_output {
        tracing_subscriber::registry()
            .with(env_filter)
            .try_init()
            .map_err(|e| TelemetryError::TracingInit(e.to_string()))?;
        return Ok(());
    }

    if config.json_logs {
        // JSON output for containers/production
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_file(true)
            .with_line_number(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(json_layer)
            .try_init()
            .map_err(|e| TelemetryError::TracingInit(e.to_string()))?;
    } else {
        // Pretty output for development
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .map_err(|e| TelemetryError::TracingInit(e.to_string()))?;
    }

    tracing::info!(
        service = %config.service_name,
        json_logs = config.json_logs,
        "[runtime] Logging initialized"
    );
    Ok(())
}
