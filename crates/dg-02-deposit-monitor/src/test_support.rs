//! Mock collaborators shared by the unit tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use shared_bus::{DepositMessage, GuardianMessage, MessageBus, PauseMessage, PublishError};
use shared_types::{
    BlockHeader, BlockSubscription, ChainId, ChainProvider, ChainResult, Hash, PubKey,
};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, Notify};

use crate::config::MonitorConfig;
use crate::error::{MonitorError, MonitorResult};
use crate::ports::{DepositRegistry, KeysRegistry, SecurityGateway};
use crate::service::DepositMonitor;

pub fn key(byte: u8) -> PubKey {
    PubKey([byte; 48])
}

async fn wait_until(counter: &AtomicUsize, expected: usize) {
    while counter.load(Ordering::SeqCst) < expected {
        tokio::task::yield_now().await;
    }
}

// =============================================================================
// CHAIN
// =============================================================================

pub struct MockChain {
    block_number: AtomicU64,
    chain_id: AtomicU64,
    blocks: broadcast::Sender<BlockHeader>,
}

impl MockChain {
    fn new() -> Self {
        let (blocks, _) = broadcast::channel(16);
        Self {
            block_number: AtomicU64::new(150),
            chain_id: AtomicU64::new(17000),
            blocks,
        }
    }

    pub fn set_block_number(&self, number: u64) {
        self.block_number.store(number, Ordering::SeqCst);
    }

    pub fn set_chain_id(&self, chain_id: ChainId) {
        self.chain_id.store(chain_id, Ordering::SeqCst);
    }

    /// Announce a block to subscribers.
    pub fn emit(&self, number: u64) {
        self.set_block_number(number);
        let _ = self.blocks.send(BlockHeader {
            hash: [number as u8; 32],
            number,
        });
    }
}

#[async_trait]
impl ChainProvider for MockChain {
    async fn get_block(&self) -> ChainResult<BlockHeader> {
        let number = self.block_number.load(Ordering::SeqCst);
        Ok(BlockHeader {
            hash: [number as u8; 32],
            number,
        })
    }

    async fn get_block_number(&self) -> ChainResult<u64> {
        Ok(self.block_number.load(Ordering::SeqCst))
    }

    async fn get_chain_id(&self) -> ChainResult<ChainId> {
        Ok(self.chain_id.load(Ordering::SeqCst))
    }

    fn subscribe_blocks(&self) -> BlockSubscription {
        BlockSubscription::new(self.blocks.subscribe())
    }
}

// =============================================================================
// KEYS REGISTRY
// =============================================================================

pub struct MockKeys {
    next: Mutex<Vec<PubKey>>,
    op_index: AtomicU64,
    next_calls: AtomicUsize,
    op_index_calls: AtomicUsize,
    held: AtomicBool,
    release: Notify,
}

impl MockKeys {
    pub fn set_next(&self, keys: Vec<PubKey>) {
        *self.next.lock() = keys;
    }

    pub fn set_op_index(&self, index: u64) {
        self.op_index.store(index, Ordering::SeqCst);
    }

    /// Make `next_signing_keys` block until `release`.
    pub fn hold_next_signing_keys(&self) {
        self.held.store(true, Ordering::SeqCst);
    }

    pub fn release(&self) {
        self.held.store(false, Ordering::SeqCst);
        self.release.notify_one();
    }

    pub fn next_calls(&self) -> usize {
        self.next_calls.load(Ordering::SeqCst)
    }

    pub fn op_index_calls(&self) -> usize {
        self.op_index_calls.load(Ordering::SeqCst)
    }

    pub async fn wait_for_next_calls(&self, expected: usize) {
        wait_until(&self.next_calls, expected).await;
    }
}

#[async_trait]
impl KeysRegistry for MockKeys {
    async fn next_signing_keys(&self) -> MonitorResult<Vec<PubKey>> {
        self.next_calls.fetch_add(1, Ordering::SeqCst);
        if self.held.load(Ordering::SeqCst) {
            self.release.notified().await;
        }
        Ok(self.next.lock().clone())
    }

    async fn keys_op_index(&self) -> MonitorResult<u64> {
        self.op_index_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.op_index.load(Ordering::SeqCst))
    }
}

// =============================================================================
// DEPOSIT REGISTRY
// =============================================================================

pub struct MockDeposits {
    deposited: Mutex<HashSet<PubKey>>,
    root: Hash,
    deposited_calls: AtomicUsize,
    fail_root: AtomicBool,
}

impl MockDeposits {
    pub fn set_deposited(&self, keys: &[PubKey]) {
        *self.deposited.lock() = keys.iter().copied().collect();
    }

    pub fn fail_root(&self, fail: bool) {
        self.fail_root.store(fail, Ordering::SeqCst);
    }

    pub fn deposited_calls(&self) -> usize {
        self.deposited_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DepositRegistry for MockDeposits {
    async fn all_deposited_pub_keys(&self) -> MonitorResult<HashSet<PubKey>> {
        self.deposited_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.deposited.lock().clone())
    }

    async fn deposit_root(&self) -> MonitorResult<Hash> {
        if self.fail_root.load(Ordering::SeqCst) {
            return Err(MonitorError::collaborator("deposit_root", "execution reverted"));
        }
        Ok(self.root)
    }
}

// =============================================================================
// SECURITY GATEWAY
// =============================================================================

pub struct MockSecurity {
    paused: AtomicBool,
    guardian_index: Mutex<Option<u32>>,
    fail_pause: AtomicBool,
    pause_calls: AtomicUsize,
    deposit_data_calls: AtomicUsize,
}

impl MockSecurity {
    pub fn set_paused(&self, paused: bool) {
        self.paused.store(paused, Ordering::SeqCst);
    }

    pub fn set_guardian_index(&self, index: Option<u32>) {
        *self.guardian_index.lock() = index;
    }

    pub fn fail_pause_calls(&self) {
        self.fail_pause.store(true, Ordering::SeqCst);
    }

    pub fn pause_calls(&self) -> usize {
        self.pause_calls.load(Ordering::SeqCst)
    }

    pub fn deposit_data_calls(&self) -> usize {
        self.deposit_data_calls.load(Ordering::SeqCst)
    }

    pub async fn wait_for_pause_calls(&self, expected: usize) {
        wait_until(&self.pause_calls, expected).await;
    }
}

#[async_trait]
impl SecurityGateway for MockSecurity {
    async fn pause_deposit_data(&self) -> MonitorResult<PauseMessage> {
        Ok(PauseMessage {
            deposit_root: [0xab; 32],
            keys_op_index: 5,
            block_number: 10,
            block_hash: [0x0a; 32],
            guardian_address: [0x99; 20],
            guardian_index: *self.guardian_index.lock(),
            signature: vec![0x5a; 65],
        })
    }

    async fn is_deposits_paused(&self) -> MonitorResult<bool> {
        Ok(self.paused.load(Ordering::SeqCst))
    }

    async fn pause_deposits(&self, _block_number: u64, _signature: Vec<u8>) -> MonitorResult<()> {
        self.pause_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_pause.load(Ordering::SeqCst) {
            return Err(MonitorError::collaborator("pause_deposits", "transaction reverted"));
        }
        Ok(())
    }

    async fn deposit_data(
        &self,
        deposit_root: Hash,
        keys_op_index: u64,
    ) -> MonitorResult<DepositMessage> {
        self.deposit_data_calls.fetch_add(1, Ordering::SeqCst);
        Ok(DepositMessage {
            deposit_root,
            keys_op_index,
            block_number: 150,
            block_hash: [0x96; 32],
            guardian_address: [0x99; 20],
            guardian_index: *self.guardian_index.lock(),
            signature: vec![0xa5; 65],
        })
    }
}

// =============================================================================
// MESSAGE BUS
// =============================================================================

pub struct MockBus {
    published: Mutex<Vec<(String, GuardianMessage)>>,
    closed: AtomicBool,
}

impl MockBus {
    pub fn published(&self) -> Vec<(String, GuardianMessage)> {
        self.published.lock().clone()
    }

    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    pub async fn wait_for_published(&self, expected: usize) {
        while self.published.lock().len() < expected {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait]
impl MessageBus for MockBus {
    async fn publish(&self, topic: &str, message: GuardianMessage) -> Result<usize, PublishError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(PublishError::Closed);
        }
        self.published.lock().push((topic.to_string(), message));
        Ok(1)
    }

    fn messages_published(&self) -> u64 {
        self.published.lock().len() as u64
    }
}

// =============================================================================
// FIXTURE
// =============================================================================

/// Clean chain state on holesky with guardian index 3.
pub struct Fixture {
    pub chain: Arc<MockChain>,
    pub keys: Arc<MockKeys>,
    pub deposits: Arc<MockDeposits>,
    pub security: Arc<MockSecurity>,
    pub bus: Arc<MockBus>,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            chain: Arc::new(MockChain::new()),
            keys: Arc::new(MockKeys {
                next: Mutex::new(Vec::new()),
                op_index: AtomicU64::new(5),
                next_calls: AtomicUsize::new(0),
                op_index_calls: AtomicUsize::new(0),
                held: AtomicBool::new(false),
                release: Notify::new(),
            }),
            deposits: Arc::new(MockDeposits {
                deposited: Mutex::new(HashSet::new()),
                root: [0xab; 32],
                deposited_calls: AtomicUsize::new(0),
                fail_root: AtomicBool::new(false),
            }),
            security: Arc::new(MockSecurity {
                paused: AtomicBool::new(false),
                guardian_index: Mutex::new(Some(3)),
                fail_pause: AtomicBool::new(false),
                pause_calls: AtomicUsize::new(0),
                deposit_data_calls: AtomicUsize::new(0),
            }),
            bus: Arc::new(MockBus {
                published: Mutex::new(Vec::new()),
                closed: AtomicBool::new(false),
            }),
        }
    }

    pub fn monitor(&self) -> DepositMonitor {
        DepositMonitor::new(
            MonitorConfig::for_testing(),
            self.chain.clone(),
            self.keys.clone(),
            self.deposits.clone(),
            self.security.clone(),
            self.bus.clone(),
        )
    }
}
