//! # Topic Derivation
//!
//! `"{chain-prefix}-{static-topic}"`, with the prefix looked up by chain id.

use serde::{Deserialize, Serialize};
use shared_types::ChainId;
use std::collections::HashMap;

use crate::error::{MonitorError, MonitorResult};

/// Chain id to topic prefix table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainPrefixes {
    prefixes: HashMap<ChainId, String>,
}

impl Default for ChainPrefixes {
    fn default() -> Self {
        Self {
            prefixes: HashMap::from([
                (1, "mainnet".to_string()),
                (5, "goerli".to_string()),
                (17000, "holesky".to_string()),
                (11155111, "sepolia".to_string()),
            ]),
        }
    }
}

impl ChainPrefixes {
    /// Table without any entries.
    pub fn empty() -> Self {
        Self {
            prefixes: HashMap::new(),
        }
    }

    /// Add or replace an entry.
    #[must_use]
    pub fn with(mut self, chain_id: ChainId, prefix: impl Into<String>) -> Self {
        self.prefixes.insert(chain_id, prefix.into());
        self
    }

    /// Prefix for `chain_id`.
    pub fn prefix(&self, chain_id: ChainId) -> MonitorResult<&str> {
        self.prefixes
            .get(&chain_id)
            .map(String::as_str)
            .ok_or(MonitorError::UnsupportedChain { chain_id })
    }
}

/// Topic the guardian publishes to on `chain_id`.
pub fn message_topic(
    prefixes: &ChainPrefixes,
    chain_id: ChainId,
    static_topic: &str,
) -> MonitorResult<String> {
    Ok(format!("{}-{}", prefixes.prefix(chain_id)?, static_topic))
}
