//! Mock adapters shared by the unit tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use shared_types::{
    Address, BlockHeader, BlockRef, BlockSubscription, ChainError, ChainId, ChainProvider,
    ChainResult, Hash,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, Notify};

use crate::domain::ContractKey;
use crate::ports::{
    AddressResolver, ContractConnector, ContractHandle, DepositContract, SecurityModuleContract,
};
use crate::service::ContractBindings;

pub const POOL: u8 = 0x01;
pub const SECURITY_MODULE: u8 = 0x02;
pub const ROUTER: u8 = 0x03;
pub const DEPOSIT: u8 = 0x04;

pub fn addr(byte: u8) -> Address {
    [byte; 20]
}

type CallLog = Arc<Mutex<Vec<String>>>;

// =============================================================================
// RESOLVER
// =============================================================================

pub struct MockResolver {
    addresses: Mutex<HashMap<ContractKey, Address>>,
    failures: Mutex<HashMap<ContractKey, u32>>,
    refs: Mutex<Vec<BlockRef>>,
    log: CallLog,
}

#[async_trait]
impl AddressResolver for MockResolver {
    async fn resolve_address(&self, key: ContractKey, at: &BlockRef) -> ChainResult<Address> {
        self.log.lock().push(format!("resolve:{key}"));
        self.refs.lock().push(*at);

        {
            let mut failures = self.failures.lock();
            if let Some(remaining) = failures.get_mut(&key) {
                if *remaining > 0 {
                    *remaining -= 1;
                    return Err(ChainError::Rpc(format!("{key} lookup failed")));
                }
            }
        }

        self.addresses
            .lock()
            .get(&key)
            .copied()
            .ok_or_else(|| ChainError::Rpc(format!("no address for {key}")))
    }
}

// =============================================================================
// CONTRACT HANDLES
// =============================================================================

pub struct MockHandle {
    address: Address,
}

impl ContractHandle for MockHandle {
    fn address(&self) -> Address {
        self.address
    }
}

pub struct MockSecurityModule {
    address: Address,
    attest_prefix: Hash,
    pause_prefix: Hash,
    deposit_address: Address,
    prefix_fetches: AtomicUsize,
    deposit_lookups: AtomicUsize,
    last_deposit_ref: Mutex<Option<BlockRef>>,
    /// Set once a connector has handed this module out.
    connected: AtomicBool,
    hold_prefixes: AtomicBool,
    release: Notify,
    log: CallLog,
}

impl MockSecurityModule {
    fn new(address: Address, attest_prefix: Hash, pause_prefix: Hash, log: CallLog) -> Self {
        Self {
            address,
            attest_prefix,
            pause_prefix,
            deposit_address: addr(DEPOSIT),
            prefix_fetches: AtomicUsize::new(0),
            deposit_lookups: AtomicUsize::new(0),
            last_deposit_ref: Mutex::new(None),
            connected: AtomicBool::new(false),
            hold_prefixes: AtomicBool::new(false),
            release: Notify::new(),
            log,
        }
    }

    pub fn prefix_fetches(&self) -> usize {
        self.prefix_fetches.load(Ordering::SeqCst)
    }

    /// Park every later prefix fetch until `release_prefix_fetches`.
    pub fn hold_prefix_fetches(&self) {
        self.hold_prefixes.store(true, Ordering::SeqCst);
    }

    pub fn release_prefix_fetches(&self) {
        self.hold_prefixes.store(false, Ordering::SeqCst);
        self.release.notify_waiters();
    }

    /// Yield until `count` prefix fetches have started.
    pub async fn wait_for_prefix_fetches(&self, count: usize) {
        while self.prefix_fetches() < count {
            tokio::task::yield_now().await;
        }
    }

    async fn prefix(&self, prefix: Hash) -> ChainResult<Hash> {
        self.prefix_fetches.fetch_add(1, Ordering::SeqCst);
        if self.hold_prefixes.load(Ordering::SeqCst) {
            self.release.notified().await;
        }
        Ok(prefix)
    }
}

impl ContractHandle for MockSecurityModule {
    fn address(&self) -> Address {
        self.address
    }
}

#[async_trait]
impl SecurityModuleContract for MockSecurityModule {
    async fn attest_message_prefix(&self) -> ChainResult<Hash> {
        self.prefix(self.attest_prefix).await
    }

    async fn pause_message_prefix(&self) -> ChainResult<Hash> {
        self.prefix(self.pause_prefix).await
    }

    async fn deposit_contract(&self, at: &BlockRef) -> ChainResult<Address> {
        self.log.lock().push("sm:deposit_contract".to_string());
        if !self.connected.load(Ordering::SeqCst) {
            return Err(ChainError::Rpc(
                "deposit lookup on an unbound security module".to_string(),
            ));
        }
        self.deposit_lookups.fetch_add(1, Ordering::SeqCst);
        *self.last_deposit_ref.lock() = Some(*at);
        Ok(self.deposit_address)
    }
}

pub struct MockDeposit {
    address: Address,
}

impl ContractHandle for MockDeposit {
    fn address(&self) -> Address {
        self.address
    }
}

#[async_trait]
impl DepositContract for MockDeposit {
    async fn deposit_root(&self, _at: &BlockRef) -> ChainResult<Hash> {
        Ok([0xaa; 32])
    }
}

// =============================================================================
// CONNECTOR
// =============================================================================

pub struct MockConnector {
    security_module: Arc<MockSecurityModule>,
    deposit_connects: AtomicUsize,
    log: CallLog,
}

impl ContractConnector for MockConnector {
    fn connect_pool(&self, address: Address) -> ChainResult<Arc<dyn ContractHandle>> {
        self.log.lock().push("connect:pool".to_string());
        Ok(Arc::new(MockHandle { address }))
    }

    fn connect_security_module(
        &self,
        _address: Address,
    ) -> ChainResult<Arc<dyn SecurityModuleContract>> {
        self.log.lock().push("connect:security-module".to_string());
        self.security_module.connected.store(true, Ordering::SeqCst);
        Ok(self.security_module.clone())
    }

    fn connect_deposit(&self, address: Address) -> ChainResult<Arc<dyn DepositContract>> {
        self.log.lock().push("connect:deposit".to_string());
        self.deposit_connects.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(MockDeposit { address }))
    }

    fn connect_staking_router(&self, address: Address) -> ChainResult<Arc<dyn ContractHandle>> {
        self.log.lock().push("connect:staking-router".to_string());
        Ok(Arc::new(MockHandle { address }))
    }
}

// =============================================================================
// HARNESS
// =============================================================================

/// Shared mocks; every `bindings()` call builds a cache over the same mocks.
pub struct Harness {
    resolver: Arc<MockResolver>,
    connector: Arc<MockConnector>,
    log: CallLog,
}

impl Harness {
    pub fn new() -> Self {
        let log: CallLog = Arc::new(Mutex::new(Vec::new()));
        let addresses = HashMap::from([
            (ContractKey::Pool, addr(POOL)),
            (ContractKey::SecurityModule, addr(SECURITY_MODULE)),
            (ContractKey::StakingRouter, addr(ROUTER)),
        ]);
        let resolver = Arc::new(MockResolver {
            addresses: Mutex::new(addresses),
            failures: Mutex::new(HashMap::new()),
            refs: Mutex::new(Vec::new()),
            log: log.clone(),
        });
        let security_module = Arc::new(MockSecurityModule::new(
            addr(SECURITY_MODULE),
            [0x11; 32],
            [0x22; 32],
            log.clone(),
        ));
        let connector = Arc::new(MockConnector {
            security_module,
            deposit_connects: AtomicUsize::new(0),
            log: log.clone(),
        });
        Self {
            resolver,
            connector,
            log,
        }
    }

    pub fn bindings(&self) -> ContractBindings {
        ContractBindings::new(self.resolver.clone(), self.connector.clone())
    }

    pub fn fail_resolution(&self, key: ContractKey, times: u32) {
        self.resolver.failures.lock().insert(key, times);
    }

    pub fn set_address(&self, key: ContractKey, address: Address) {
        self.resolver.addresses.lock().insert(key, address);
    }

    pub fn call_log(&self) -> Vec<String> {
        self.log.lock().clone()
    }

    pub fn resolved_refs(&self) -> Vec<BlockRef> {
        self.resolver.refs.lock().clone()
    }

    pub fn deposit_lookups(&self) -> usize {
        self.connector
            .security_module
            .deposit_lookups
            .load(Ordering::SeqCst)
    }

    pub fn last_deposit_lookup_ref(&self) -> Option<BlockRef> {
        *self.connector.security_module.last_deposit_ref.lock()
    }

    pub fn deposit_connects(&self) -> usize {
        self.connector.deposit_connects.load(Ordering::SeqCst)
    }

    pub fn deposit_address(&self) -> Address {
        addr(DEPOSIT)
    }

    pub fn attest_prefix(&self) -> Hash {
        self.connector.security_module.attest_prefix
    }

    pub fn pause_prefix(&self) -> Hash {
        self.connector.security_module.pause_prefix
    }

    pub fn prefix_fetches(&self) -> usize {
        self.connector.security_module.prefix_fetches()
    }

    /// The module the connector hands out for every security module address.
    pub fn security_module(&self) -> Arc<MockSecurityModule> {
        self.connector.security_module.clone()
    }

    /// A module bound by hand, already counted as connected.
    pub fn security_module_at(
        &self,
        address: Address,
        attest_prefix: Hash,
        pause_prefix: Hash,
    ) -> Arc<MockSecurityModule> {
        let module = MockSecurityModule::new(address, attest_prefix, pause_prefix, self.log.clone());
        module.connected.store(true, Ordering::SeqCst);
        Arc::new(module)
    }

    pub fn deposit_handle_at(&self, address: Address) -> Arc<MockDeposit> {
        Arc::new(MockDeposit { address })
    }
}

// =============================================================================
// CHAIN
// =============================================================================

/// Chain that always reports the same latest block.
pub struct StaticChain {
    header: BlockHeader,
    block_calls: AtomicUsize,
    failures: AtomicU32,
    blocks: broadcast::Sender<BlockHeader>,
}

impl StaticChain {
    pub fn at(number: u64, hash: Hash) -> Self {
        let (blocks, _) = broadcast::channel(16);
        Self {
            header: BlockHeader { hash, number },
            block_calls: AtomicUsize::new(0),
            failures: AtomicU32::new(0),
            blocks,
        }
    }

    pub fn fail_next(&self, times: u32) {
        self.failures.store(times, Ordering::SeqCst);
    }

    pub fn block_calls(&self) -> usize {
        self.block_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChainProvider for StaticChain {
    async fn get_block(&self) -> ChainResult<BlockHeader> {
        self.block_calls.fetch_add(1, Ordering::SeqCst);
        let pending = self.failures.load(Ordering::SeqCst);
        if pending > 0 {
            self.failures.store(pending - 1, Ordering::SeqCst);
            return Err(ChainError::Rpc("node unavailable".to_string()));
        }
        Ok(self.header)
    }

    async fn get_block_number(&self) -> ChainResult<u64> {
        Ok(self.header.number)
    }

    async fn get_chain_id(&self) -> ChainResult<ChainId> {
        Ok(17000)
    }

    fn subscribe_blocks(&self) -> BlockSubscription {
        BlockSubscription::new(self.blocks.subscribe())
    }
}
