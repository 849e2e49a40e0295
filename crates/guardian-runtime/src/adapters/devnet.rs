//! # Devnet Chain
//!
//! In-process chain standing in for an RPC endpoint. Holds the contract
//! registry, the staking key queue and the deposit set, and announces new
//! blocks to subscribers.

use async_trait::async_trait;
use dg_01_contract_bindings::{AddressResolver, ContractKey};
use dg_02_deposit_monitor::{KeysRegistry, MonitorResult};
use parking_lot::RwLock;
use shared_types::{
    Address, BlockHeader, BlockRef, BlockSubscription, ChainError, ChainId, ChainProvider,
    ChainResult, Hash, PubKey,
};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::keccak;

const BLOCK_CHANNEL_CAPACITY: usize = 64;

/// Mutable devnet state.
struct DevnetState {
    head: BlockHeader,
    addresses: HashMap<ContractKey, Address>,
    deposit_contract: Address,
    attest_prefix: Hash,
    pause_prefix: Hash,
    queued_keys: Vec<PubKey>,
    deposited_keys: BTreeSet<PubKey>,
    deposit_root: Hash,
    keys_op_index: u64,
    paused_at: Option<u64>,
    /// Remaining registry lookups that fail, for outage simulation.
    registry_failures: u32,
}

/// In-process chain implementing the chain, registry and keys ports.
pub struct DevnetChain {
    chain_id: ChainId,
    state: RwLock<DevnetState>,
    blocks: broadcast::Sender<BlockHeader>,
}

impl DevnetChain {
    /// Fresh chain at block 0 with well-known contract addresses.
    pub fn new(chain_id: ChainId) -> Self {
        let (blocks, _) = broadcast::channel(BLOCK_CHANNEL_CAPACITY);
        let genesis = BlockHeader {
            hash: keccak(&[b"genesis".as_slice(), &chain_id.to_be_bytes()]),
            number: 0,
        };

        Self {
            chain_id,
            state: RwLock::new(DevnetState {
                head: genesis,
                addresses: HashMap::from([
                    (ContractKey::Pool, [0x10; 20]),
                    (ContractKey::SecurityModule, [0x20; 20]),
                    (ContractKey::StakingRouter, [0x30; 20]),
                ]),
                deposit_contract: [0x40; 20],
                attest_prefix: keccak(&[b"attest-message-prefix".as_slice(), &chain_id.to_be_bytes()]),
                pause_prefix: keccak(&[b"pause-message-prefix".as_slice(), &chain_id.to_be_bytes()]),
                queued_keys: Vec::new(),
                deposited_keys: BTreeSet::new(),
                deposit_root: [0u8; 32],
                keys_op_index: 0,
                paused_at: None,
                registry_failures: 0,
            }),
            blocks,
        }
    }

    // =========================================================================
    // BLOCK PRODUCTION
    // =========================================================================

    /// Append a block and announce it.
    pub fn mine_block(&self) -> BlockHeader {
        let header = {
            let mut state = self.state.write();
            let number = state.head.number + 1;
            let hash = keccak(&[state.head.hash.as_slice(), &number.to_be_bytes()]);
            state.head = BlockHeader { hash, number };
            state.head
        };

        // no subscribers is fine before the watcher starts
        let _ = self.blocks.send(header);
        debug!(block_number = header.number, "[runtime] Devnet block mined");
        header
    }

    /// Mine a block every `interval` until shutdown is signalled.
    pub fn spawn_producer(
        self: Arc<Self>,
        interval: Duration,
        mut shutdown: watch::Receiver<bool>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        self.mine_block();
                    }
                    _ = shutdown.changed() => {
                        info!("[runtime] Block producer shutdown signal received");
                        break;
                    }
                }
            }
        })
    }

    /// Latest block.
    pub fn head(&self) -> BlockHeader {
        self.state.read().head
    }

    // =========================================================================
    // STAKING STATE
    // =========================================================================

    /// Add a key to the signing queue.
    pub fn queue_key(&self, key: PubKey) {
        let mut state = self.state.write();
        state.queued_keys.push(key);
        state.keys_op_index += 1;
    }

    /// Deposit `key` directly, as anyone can on the deposit contract.
    pub fn deposit_key(&self, key: PubKey) {
        let mut guard = self.state.write();
        let state = &mut *guard;
        if state.deposited_keys.insert(key) {
            state.deposit_root = deposit_root_of(&state.deposited_keys);
        }
    }

    /// Deposit the queued keys through the pool, emptying the queue.
    pub fn deposit_queued(&self) -> usize {
        let mut guard = self.state.write();
        let state = &mut *guard;
        let queued = std::mem::take(&mut state.queued_keys);
        let count = queued.len();
        state.deposited_keys.extend(queued);
        state.deposit_root = deposit_root_of(&state.deposited_keys);
        state.keys_op_index += 1;
        count
    }

    /// Point a mutable contract role at a new address.
    pub fn set_address(&self, key: ContractKey, address: Address) {
        self.state.write().addresses.insert(key, address);
    }

    /// Make the next `count` registry lookups fail.
    pub fn fail_registry_lookups(&self, count: u32) {
        self.state.write().registry_failures = count;
    }

    /// Block at which deposits were paused.
    pub fn paused_at(&self) -> Option<u64> {
        self.state.read().paused_at
    }

    pub(crate) fn pause(&self, block_number: u64) -> ChainResult<()> {
        let mut state = self.state.write();
        if state.paused_at.is_some() {
            return Err(ChainError::ContractCall {
                method: "pauseDeposits".to_string(),
                reason: "deposits already paused".to_string(),
            });
        }
        state.paused_at = Some(block_number);
        warn!(block_number, "[runtime] Devnet deposits paused");
        Ok(())
    }

    pub(crate) fn deposit_contract(&self) -> Address {
        self.state.read().deposit_contract
    }

    pub(crate) fn prefixes(&self) -> (Hash, Hash) {
        let state = self.state.read();
        (state.attest_prefix, state.pause_prefix)
    }

    pub(crate) fn deposit_root(&self) -> Hash {
        self.state.read().deposit_root
    }

    pub(crate) fn deposited_keys(&self) -> HashSet<PubKey> {
        self.state.read().deposited_keys.iter().copied().collect()
    }

    pub(crate) fn op_index(&self) -> u64 {
        self.state.read().keys_op_index
    }
}

/// Order-independent root over the deposited set.
fn deposit_root_of(keys: &BTreeSet<PubKey>) -> Hash {
    let parts: Vec<&[u8]> = keys.iter().map(|k| k.as_bytes().as_slice()).collect();
    keccak(&parts)
}

#[async_trait]
impl ChainProvider for DevnetChain {
    async fn get_block(&self) -> ChainResult<BlockHeader> {
        Ok(self.head())
    }

    async fn get_block_number(&self) -> ChainResult<u64> {
        Ok(self.head().number)
    }

    async fn get_chain_id(&self) -> ChainResult<ChainId> {
        Ok(self.chain_id)
    }

    fn subscribe_blocks(&self) -> BlockSubscription {
        BlockSubscription::new(self.blocks.subscribe())
    }
}

#[async_trait]
impl AddressResolver for DevnetChain {
    async fn resolve_address(&self, key: ContractKey, at: &BlockRef) -> ChainResult<Address> {
        let mut state = self.state.write();
        if state.registry_failures > 0 {
            state.registry_failures -= 1;
            return Err(ChainError::Rpc("connection refused".to_string()));
        }
        if let BlockRef::Hash(hash) = at {
            if *hash != state.head.hash {
                debug!(key = %key, "[runtime] Resolving at a non-head block, using head state");
            }
        }
        state
            .addresses
            .get(&key)
            .copied()
            .ok_or_else(|| ChainError::ContractCall {
                method: "getAddress".to_string(),
                reason: format!("no address registered for {key}"),
            })
    }
}

#[async_trait]
impl KeysRegistry for DevnetChain {
    async fn next_signing_keys(&self) -> MonitorResult<Vec<PubKey>> {
        Ok(self.state.read().queued_keys.clone())
    }

    async fn keys_op_index(&self) -> MonitorResult<u64> {
        Ok(self.op_index())
    }
}
