//! # Logical Keys

use serde::{Deserialize, Serialize};
use std::fmt;

/// Logical role of a bound contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractKey {
    /// Staking pool contract.
    Pool,
    /// Deposit security module (DSM).
    SecurityModule,
    /// Staking router contract.
    StakingRouter,
    /// Beacon deposit contract. Fixed for the lifetime of a chain.
    Deposit,
}

impl ContractKey {
    /// All keys in initialization order.
    pub const ALL: [ContractKey; 4] = [
        ContractKey::Pool,
        ContractKey::SecurityModule,
        ContractKey::Deposit,
        ContractKey::StakingRouter,
    ];

    /// Whether the address, once bound, never changes.
    #[must_use]
    pub fn is_permanent(&self) -> bool {
        matches!(self, ContractKey::Deposit)
    }

    /// Stable lowercase name used in logs.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ContractKey::Pool => "pool",
            ContractKey::SecurityModule => "security-module",
            ContractKey::StakingRouter => "staking-router",
            ContractKey::Deposit => "deposit",
        }
    }
}

impl fmt::Display for ContractKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Domain-separation prefixes published by the security module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrefixKind {
    /// Prefix for deposit attestations.
    Attest,
    /// Prefix for pause messages.
    Pause,
}

impl fmt::Display for PrefixKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrefixKind::Attest => f.write_str("attest"),
            PrefixKind::Pause => f.write_str("pause"),
        }
    }
}
