//! # Guardian Configuration
//!
//! Defaults with environment overrides. Every subsystem config is derived
//! from this one struct.

use dg_01_contract_bindings::BindingsConfig;
use dg_02_deposit_monitor::{ChainPrefixes, MonitorConfig};
use shared_types::{Address, ChainId};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Complete guardian configuration.
#[derive(Debug, Clone)]
pub struct GuardianConfig {
    /// Static topic suffix.
    pub message_topic: String,
    /// Blocks per re-attestation period.
    pub resigning_window_blocks: u64,
    /// Fixed delay between bootstrap attempts, in milliseconds.
    pub recovery_delay_ms: u64,
    /// Chain id served by the devnet provider.
    pub chain_id: ChainId,
    /// Devnet block interval in milliseconds; 0 disables the block producer.
    pub block_time_ms: u64,
    /// Largest message the in-memory bus accepts.
    pub max_payload_bytes: usize,
    /// Address this guardian signs as.
    pub guardian_address: Address,
    /// Position in the guardian list, if a member.
    pub guardian_index: Option<u32>,
    /// Chain id to topic prefix table.
    pub chain_prefixes: ChainPrefixes,
}

impl Default for GuardianConfig {
    fn default() -> Self {
        Self {
            message_topic: "defender".to_string(),
            resigning_window_blocks: 10,
            recovery_delay_ms: 10_000,
            chain_id: 17000,
            block_time_ms: 12_000,
            max_payload_bytes: shared_bus::DEFAULT_MAX_PAYLOAD_BYTES,
            guardian_address: [0x47; 20],
            guardian_index: Some(0),
            chain_prefixes: ChainPrefixes::default(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable could not be parsed.
    #[error("Invalid value {value:?} for {var}")]
    InvalidValue {
        /// Variable name
        var: &'static str,
        /// Raw value
        value: String,
    },

    /// The resigning window must be at least one block.
    #[error("Resigning window must be greater than zero")]
    ZeroResigningWindow,

    /// The bus payload limit must be non-zero.
    #[error("Max payload size must be greater than zero")]
    ZeroPayloadLimit,

    /// A zero delay would retry bootstrap in a tight loop.
    #[error("Recovery delay must be greater than zero")]
    ZeroRecoveryDelay,
}

impl GuardianConfig {
    /// Defaults overridden by `GUARDIAN_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Defaults overridden by `lookup`, validated.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(topic) = lookup("GUARDIAN_MESSAGE_TOPIC") {
            config.message_topic = topic;
        }
        override_parsed(&lookup, "GUARDIAN_RESIGNING_BLOCKS", &mut config.resigning_window_blocks)?;
        override_parsed(&lookup, "GUARDIAN_RECOVERY_DELAY_MS", &mut config.recovery_delay_ms)?;
        override_parsed(&lookup, "GUARDIAN_CHAIN_ID", &mut config.chain_id)?;
        override_parsed(&lookup, "GUARDIAN_BLOCK_TIME_MS", &mut config.block_time_ms)?;
        override_parsed(&lookup, "GUARDIAN_MAX_PAYLOAD_BYTES", &mut config.max_payload_bytes)?;

        if let Some(raw) = lookup("GUARDIAN_INDEX") {
            config.guardian_index = match raw.as_str() {
                "" | "none" => None,
                _ => Some(raw.parse().map_err(|_| ConfigError::InvalidValue {
                    var: "GUARDIAN_INDEX",
                    value: raw.clone(),
                })?),
            };
        }

        if let Some(raw) = lookup("GUARDIAN_ADDRESS") {
            let invalid = || ConfigError::InvalidValue {
                var: "GUARDIAN_ADDRESS",
                value: raw.clone(),
            };
            let bytes = hex::decode(raw.trim_start_matches("0x")).map_err(|_| invalid())?;
            config.guardian_address = bytes.try_into().map_err(|_| invalid())?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check invariants the subsystems rely on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.resigning_window_blocks == 0 {
            return Err(ConfigError::ZeroResigningWindow);
        }
        if self.max_payload_bytes == 0 {
            return Err(ConfigError::ZeroPayloadLimit);
        }
        if self.recovery_delay_ms == 0 {
            return Err(ConfigError::ZeroRecoveryDelay);
        }
        Ok(())
    }

    /// Configuration for the deposit monitor.
    pub fn monitor_config(&self) -> MonitorConfig {
        MonitorConfig {
            message_topic: self.message_topic.clone(),
            resigning_window_blocks: self.resigning_window_blocks,
            chain_prefixes: self.chain_prefixes.clone(),
        }
    }

    /// Configuration for the contract bindings.
    pub fn bindings_config(&self) -> BindingsConfig {
        BindingsConfig {
            recovery_delay_ms: self.recovery_delay_ms,
        }
    }

    /// Devnet block interval, `None` when block production is manual.
    pub fn block_time(&self) -> Option<Duration> {
        (self.block_time_ms > 0).then(|| Duration::from_millis(self.block_time_ms))
    }

    /// Configuration for tests: manual blocks, short retry delay, window of 100.
    pub fn for_testing() -> Self {
        Self {
            resigning_window_blocks: 100,
            recovery_delay_ms: 10,
            block_time_ms: 0,
            ..Self::default()
        }
    }
}

fn override_parsed<F, T>(lookup: &F, var: &'static str, target: &mut T) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    if let Some(raw) = lookup(var) {
        *target = raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { var, value: raw })?;
    }
    Ok(())
}
