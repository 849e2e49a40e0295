//! # Devnet Contract Handles
//!
//! Handles the binding cache stores for the devnet chain, plus the deposit
//! registry that reads its root through the bound deposit contract.

use async_trait::async_trait;
use dg_01_contract_bindings::{
    ContractBindings, ContractConnector, ContractHandle, DepositContract, SecurityModuleContract,
};
use dg_02_deposit_monitor::{DepositRegistry, MonitorError, MonitorResult};
use shared_types::{Address, BlockRef, ChainError, ChainResult, Hash, PubKey};
use std::collections::HashSet;
use std::sync::Arc;

use super::devnet::DevnetChain;

/// Handle without contract reads (pool, staking router).
struct PlainHandle {
    address: Address,
}

impl ContractHandle for PlainHandle {
    fn address(&self) -> Address {
        self.address
    }
}

struct DevnetSecurityModule {
    chain: Arc<DevnetChain>,
    address: Address,
}

impl ContractHandle for DevnetSecurityModule {
    fn address(&self) -> Address {
        self.address
    }
}

#[async_trait]
impl SecurityModuleContract for DevnetSecurityModule {
    async fn attest_message_prefix(&self) -> ChainResult<Hash> {
        Ok(self.chain.prefixes().0)
    }

    async fn pause_message_prefix(&self) -> ChainResult<Hash> {
        Ok(self.chain.prefixes().1)
    }

    async fn deposit_contract(&self, _at: &BlockRef) -> ChainResult<Address> {
        Ok(self.chain.deposit_contract())
    }
}

struct DevnetDepositContract {
    chain: Arc<DevnetChain>,
    address: Address,
}

impl ContractHandle for DevnetDepositContract {
    fn address(&self) -> Address {
        self.address
    }
}

#[async_trait]
impl DepositContract for DevnetDepositContract {
    async fn deposit_root(&self, _at: &BlockRef) -> ChainResult<Hash> {
        Ok(self.chain.deposit_root())
    }
}

/// Builds devnet handles for resolved addresses.
pub struct DevnetConnector {
    chain: Arc<DevnetChain>,
}

impl DevnetConnector {
    /// Connector over `chain`.
    pub fn new(chain: Arc<DevnetChain>) -> Self {
        Self { chain }
    }
}

impl ContractConnector for DevnetConnector {
    fn connect_pool(&self, address: Address) -> ChainResult<Arc<dyn ContractHandle>> {
        Ok(Arc::new(PlainHandle { address }))
    }

    fn connect_security_module(
        &self,
        address: Address,
    ) -> ChainResult<Arc<dyn SecurityModuleContract>> {
        Ok(Arc::new(DevnetSecurityModule {
            chain: Arc::clone(&self.chain),
            address,
        }))
    }

    fn connect_deposit(&self, address: Address) -> ChainResult<Arc<dyn DepositContract>> {
        if address != self.chain.deposit_contract() {
            return Err(ChainError::ContractCall {
                method: "connect".to_string(),
                reason: "no deposit contract at address".to_string(),
            });
        }
        Ok(Arc::new(DevnetDepositContract {
            chain: Arc::clone(&self.chain),
            address,
        }))
    }

    fn connect_staking_router(&self, address: Address) -> ChainResult<Arc<dyn ContractHandle>> {
        Ok(Arc::new(PlainHandle { address }))
    }
}

/// Deposit registry reading the root through the bound deposit contract.
pub struct BoundDepositRegistry {
    chain: Arc<DevnetChain>,
    bindings: Arc<ContractBindings>,
}

impl BoundDepositRegistry {
    /// Registry over `chain`, reading contracts through `bindings`.
    pub fn new(chain: Arc<DevnetChain>, bindings: Arc<ContractBindings>) -> Self {
        Self { chain, bindings }
    }
}

#[async_trait]
impl DepositRegistry for BoundDepositRegistry {
    async fn all_deposited_pub_keys(&self) -> MonitorResult<HashSet<PubKey>> {
        Ok(self.chain.deposited_keys())
    }

    async fn deposit_root(&self) -> MonitorResult<Hash> {
        let deposit = self
            .bindings
            .get_deposit()
            .map_err(|e| MonitorError::collaborator("deposit_root", e))?;
        Ok(deposit.handle.deposit_root(&BlockRef::LATEST).await?)
    }
}
