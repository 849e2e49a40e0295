//! # Bindings Configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default delay between initialization attempts.
pub const DEFAULT_RECOVERY_DELAY_MS: u64 = 10_000;

/// Contract bindings configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BindingsConfig {
    /// Fixed delay between recovery attempts, in milliseconds.
    pub recovery_delay_ms: u64,
}

impl Default for BindingsConfig {
    fn default() -> Self {
        Self {
            recovery_delay_ms: DEFAULT_RECOVERY_DELAY_MS,
        }
    }
}

impl BindingsConfig {
    /// Create a config for testing (short delay).
    pub fn for_testing() -> Self {
        Self {
            recovery_delay_ms: 10,
        }
    }

    /// Recovery delay as a `Duration`.
    pub fn recovery_delay(&self) -> Duration {
        Duration::from_millis(self.recovery_delay_ms)
    }
}
