//! Prometheus metrics rendering.
//!
//! Subsystem crates register their metrics in the default registry (see
//! the `metrics` feature of `dg-02-deposit-monitor`); this module adds the
//! process build info and renders everything in text exposition format.

use lazy_static::lazy_static;
use prometheus::{register_int_gauge_vec, Encoder, IntGaugeVec, TextEncoder};

use crate::{TelemetryConfig, TelemetryError};

lazy_static! {
    /// Build information, always 1
    pub static ref BUILD_INFO: IntGaugeVec = register_int_gauge_vec!(
        "guardian_build_info",
        "Deposit guardian build information",
        &["service", "version"]
    )
    .expect("Failed to create BUILD_INFO metric");
}

/// Record the build info gauge for this process.
pub fn register_metrics(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    BUILD_INFO
        .get_metric_with_label_values(&[config.service_name.as_str(), env!("CARGO_PKG_VERSION")])
        .map_err(|e| TelemetryError::Metrics(e.to_string()))?
        .set(1);
    Ok(())
}

/// Encode every registered metric as Prometheus text.
pub fn render_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::Metrics(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::Metrics(e.to_string()))
}
