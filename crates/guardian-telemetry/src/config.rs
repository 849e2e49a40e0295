//! Telemetry configuration from environment variables.

use std::env;

/// Configuration for logging and metrics.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name attached to logs and the build info metric
    pub service_name: String,

    /// Log level filter (trace, debug, info, warn, error or a directive list)
    pub log_level: String,

    /// Whether to write logs to stdout
    pub console_output: bool,

    /// Whether to emit JSON formatted logs
    pub json_logs: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "deposit-guardian".to_string(),
            log_level: "info".to_string(),
            console_output: true,
            json_logs: false,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `GUARDIAN_SERVICE_NAME`: Service name (default: deposit-guardian)
    /// - `GUARDIAN_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    /// - `GUARDIAN_CONSOLE_OUTPUT`: Enable console output (default: true)
    /// - `GUARDIAN_JSON_LOGS`: Enable JSON logs (default: false, true in containers)
    pub fn from_env() -> Self {
        let is_container =
            env::var("KUBERNETES_SERVICE_HOST").is_ok() || env::var("DOCKER_CONTAINER").is_ok();

        Self {
            service_name: env::var("GUARDIAN_SERVICE_NAME")
                .unwrap_or_else(|_| "deposit-guardian".to_string()),

            log_level: env::var("GUARDIAN_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string()),

            console_output: env::var("GUARDIAN_CONSOLE_OUTPUT")
                .map(|v| parse_flag(&v, true))
                .unwrap_or(true),

            json_logs: env::var("GUARDIAN_JSON_LOGS")
                .map(|v| parse_flag(&v, false))
                .unwrap_or(is_container),
        }
    }
}

/// `true`/`1` and `false`/`0`, case-insensitive; anything else is `default`.
fn parse_flag(value: &str, default: bool) -> bool {
    match value.to_lowercase().as_str() {
        "true" | "1" => true,
        "false" | "0" => false,
        _ => default,
    }
}
