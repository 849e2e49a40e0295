//! # Outbound Ports
//!
//! Traits for the address registry and the contract handles the cache
//! stores. Contract reads take a [`BlockRef`] so callers can pin a block
//! hash or use a tag.

use async_trait::async_trait;
use shared_types::{Address, BlockRef, ChainResult, Hash};
use std::sync::Arc;

use crate::domain::ContractKey;

/// Address registry - outbound port.
///
/// Resolves the current address of a mutable contract role.
#[async_trait]
pub trait AddressResolver: Send + Sync {
    /// Address of `key` as of block `at`.
    async fn resolve_address(&self, key: ContractKey, at: &BlockRef) -> ChainResult<Address>;
}

/// A callable contract handle.
pub trait ContractHandle: Send + Sync {
    /// Address this handle calls.
    fn address(&self) -> Address;
}

/// Deposit security module handle.
#[async_trait]
pub trait SecurityModuleContract: ContractHandle {
    /// `ATTEST_MESSAGE_PREFIX` at the latest block.
    async fn attest_message_prefix(&self) -> ChainResult<Hash>;

    /// `PAUSE_MESSAGE_PREFIX` at the latest block.
    async fn pause_message_prefix(&self) -> ChainResult<Hash>;

    /// `DEPOSIT_CONTRACT` as of block `at`.
    async fn deposit_contract(&self, at: &BlockRef) -> ChainResult<Address>;
}

/// Beacon deposit contract handle.
#[async_trait]
pub trait DepositContract: ContractHandle {
    /// `get_deposit_root` as of block `at`.
    async fn deposit_root(&self, at: &BlockRef) -> ChainResult<Hash>;
}

/// Builds contract handles for resolved addresses.
///
/// Construction is local (ABI + provider), so it is synchronous; a failure
/// means the address cannot be bound at all.
pub trait ContractConnector: Send + Sync {
    /// Handle for the staking pool.
    fn connect_pool(&self, address: Address) -> ChainResult<Arc<dyn ContractHandle>>;

    /// Handle for the deposit security module.
    fn connect_security_module(
        &self,
        address: Address,
    ) -> ChainResult<Arc<dyn SecurityModuleContract>>;

    /// Handle for the deposit contract.
    fn connect_deposit(&self, address: Address) -> ChainResult<Arc<dyn DepositContract>>;

    /// Handle for the staking router.
    fn connect_staking_router(&self, address: Address) -> ChainResult<Arc<dyn ContractHandle>>;
}
