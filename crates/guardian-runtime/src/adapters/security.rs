//! # Devnet Security Gateway
//!
//! Builds pause and deposit messages from the bound security module's
//! prefixes. The "signature" is the keccak digest of the prefixed message;
//! a real deployment signs that digest with the guardian key.

use async_trait::async_trait;
use dg_01_contract_bindings::ContractBindings;
use dg_02_deposit_monitor::{MonitorError, MonitorResult, SecurityGateway};
use shared_bus::{DepositMessage, PauseMessage};
use shared_types::{Address, BlockRef, ChainProvider, Hash};
use std::sync::Arc;

use super::devnet::DevnetChain;
use super::keccak;

/// Security gateway acting as one guardian on the devnet.
pub struct DevnetSecurityGateway {
    chain: Arc<DevnetChain>,
    bindings: Arc<ContractBindings>,
    guardian_address: Address,
    guardian_index: Option<u32>,
}

impl DevnetSecurityGateway {
    /// Gateway for the guardian at `guardian_address`.
    pub fn new(
        chain: Arc<DevnetChain>,
        bindings: Arc<ContractBindings>,
        guardian_address: Address,
        guardian_index: Option<u32>,
    ) -> Self {
        Self {
            chain,
            bindings,
            guardian_address,
            guardian_index,
        }
    }

    async fn current_root(&self) -> MonitorResult<Hash> {
        let deposit = self
            .bindings
            .get_deposit()
            .map_err(|e| MonitorError::collaborator("get_deposit", e))?;
        Ok(deposit.handle.deposit_root(&BlockRef::LATEST).await?)
    }
}

/// Digest of a pause message over the DSM pause prefix.
pub fn pause_digest(prefix: &Hash, block_number: u64, block_hash: &Hash) -> Hash {
    keccak(&[prefix.as_slice(), &block_number.to_be_bytes(), block_hash])
}

/// Digest of a deposit attestation over the DSM attest prefix.
pub fn attest_digest(
    prefix: &Hash,
    deposit_root: &Hash,
    keys_op_index: u64,
    block_number: u64,
    block_hash: &Hash,
) -> Hash {
    keccak(&[
        prefix.as_slice(),
        deposit_root,
        &keys_op_index.to_be_bytes(),
        &block_number.to_be_bytes(),
        block_hash,
    ])
}

#[async_trait]
impl SecurityGateway for DevnetSecurityGateway {
    async fn pause_deposit_data(&self) -> MonitorResult<PauseMessage> {
        let prefix = self
            .bindings
            .get_pause_prefix()
            .await
            .map_err(|e| MonitorError::collaborator("get_pause_prefix", e))?;
        let block = self.chain.get_block().await?;
        let deposit_root = self.current_root().await?;

        Ok(PauseMessage {
            deposit_root,
            keys_op_index: self.chain.op_index(),
            block_number: block.number,
            block_hash: block.hash,
            guardian_address: self.guardian_address,
            guardian_index: self.guardian_index,
            signature: pause_digest(&prefix, block.number, &block.hash).to_vec(),
        })
    }

    async fn is_deposits_paused(&self) -> MonitorResult<bool> {
        Ok(self.chain.paused_at().is_some())
    }

    async fn pause_deposits(&self, block_number: u64, signature: Vec<u8>) -> MonitorResult<()> {
        if signature.is_empty() {
            return Err(MonitorError::collaborator("pause_deposits", "empty signature"));
        }
        self.chain.pause(block_number)?;
        Ok(())
    }

    async fn deposit_data(
        &self,
        deposit_root: Hash,
        keys_op_index: u64,
    ) -> MonitorResult<DepositMessage> {
        let prefix = self
            .bindings
            .get_attest_prefix()
            .await
            .map_err(|e| MonitorError::collaborator("get_attest_prefix", e))?;
        let block = self.chain.get_block().await?;

        Ok(DepositMessage {
            deposit_root,
            keys_op_index,
            block_number: block.number,
            block_hash: block.hash,
            guardian_address: self.guardian_address,
            guardian_index: self.guardian_index,
            signature: attest_digest(&prefix, &deposit_root, keys_op_index, block.number, &block.hash)
                .to_vec(),
        })
    }
}
