//! # Outbound Ports
//!
//! Business semantics (signing, on-chain pause execution) live behind these
//! traits; the monitor only sequences the calls.

use async_trait::async_trait;
use shared_bus::{DepositMessage, PauseMessage};
use shared_types::{Hash, PubKey};
use std::collections::HashSet;

use crate::error::MonitorResult;

/// Node operator keys registry.
#[async_trait]
pub trait KeysRegistry: Send + Sync {
    /// Keys queued to be deposited next, in queue order.
    async fn next_signing_keys(&self) -> MonitorResult<Vec<PubKey>>;

    /// Current keys operation index.
    async fn keys_op_index(&self) -> MonitorResult<u64>;
}

/// Beacon deposit contract and its event index.
#[async_trait]
pub trait DepositRegistry: Send + Sync {
    /// Every public key ever deposited.
    async fn all_deposited_pub_keys(&self) -> MonitorResult<HashSet<PubKey>>;

    /// Current deposit root.
    async fn deposit_root(&self) -> MonitorResult<Hash>;
}

/// Deposit security module operations performed as this guardian.
#[async_trait]
pub trait SecurityGateway: Send + Sync {
    /// Signed pause evidence for the current block.
    async fn pause_deposit_data(&self) -> MonitorResult<PauseMessage>;

    /// Whether deposits are already paused on-chain.
    async fn is_deposits_paused(&self) -> MonitorResult<bool>;

    /// Submit the pause transaction.
    async fn pause_deposits(&self, block_number: u64, signature: Vec<u8>) -> MonitorResult<()>;

    /// Signed attestation of `deposit_root` at `keys_op_index`.
    async fn deposit_data(
        &self,
        deposit_root: Hash,
        keys_op_index: u64,
    ) -> MonitorResult<DepositMessage>;
}
