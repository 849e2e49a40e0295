//! # Deposit Guardian Runtime
//!
//! Entry point for the guardian node.
//!
//! ## Startup Sequence
//!
//! 1. Initialize telemetry (logging + metrics)
//! 2. Load configuration from `GUARDIAN_*` environment variables
//! 3. Assemble the runtime and bootstrap contract bindings
//! 4. Watch blocks until Ctrl+C, then shut down gracefully

use anyhow::{Context, Result};
use guardian_runtime::{GuardianConfig, GuardianRuntime};
use guardian_telemetry::{init_telemetry, TelemetryConfig};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let _telemetry =
        init_telemetry(TelemetryConfig::from_env()).context("Failed to initialize telemetry")?;

    let config = GuardianConfig::from_env().context("Invalid guardian configuration")?;
    info!(?config, "[runtime] Configuration loaded");

    let runtime = GuardianRuntime::new(config);
    runtime.start().await.context("Failed to start guardian")?;

    info!("[runtime] Guardian is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl+C")?;

    runtime.shutdown().await;
    Ok(())
}
