//! # Deposit Monitor Configuration

use serde::{Deserialize, Serialize};

use crate::domain::ChainPrefixes;

/// Default static topic suffix.
pub const DEFAULT_MESSAGE_TOPIC: &str = "defender";

/// Default resigning window, in blocks.
pub const DEFAULT_RESIGNING_WINDOW_BLOCKS: u64 = 10;

/// Deposit monitor configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Static topic suffix appended to the chain prefix.
    pub message_topic: String,
    /// Number of blocks per re-attestation period. Must be non-zero.
    pub resigning_window_blocks: u64,
    /// Chain id to topic prefix table.
    pub chain_prefixes: ChainPrefixes,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            message_topic: DEFAULT_MESSAGE_TOPIC.to_string(),
            resigning_window_blocks: DEFAULT_RESIGNING_WINDOW_BLOCKS,
            chain_prefixes: ChainPrefixes::default(),
        }
    }
}

impl MonitorConfig {
    /// Create a config for testing (window of 100 blocks).
    pub fn for_testing() -> Self {
        Self {
            resigning_window_blocks: 100,
            ..Self::default()
        }
    }
}
