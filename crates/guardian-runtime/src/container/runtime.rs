//! # Guardian Runtime
//!
//! Builds the object graph once and drives its lifecycle.
//!
//! ## Startup Sequence
//!
//! 1. Bootstrap contract bindings (retries until the chain answers)
//! 2. Subscribe the deposit monitor to new blocks
//! 3. Start the devnet block producer (unless blocks are mined manually)
//!
//! ## Object Graph
//!
//! ```text
//! DevnetChain ──→ ContractBindings ──→ RecoveryBootstrapper
//!      │                 │
//!      │                 ├──→ BoundDepositRegistry ──┐
//!      │                 └──→ DevnetSecurityGateway ─┤
//!      └──(keys, blocks)─────────────────────────────┴──→ DepositMonitor ──→ InMemoryMessageBus
//! ```

use anyhow::Result;
use dg_01_contract_bindings::{ContractBindings, RecoveryBootstrapper};
use dg_02_deposit_monitor::{BlockWatcher, DepositMonitor, WatchHandle};
use parking_lot::Mutex;
use shared_bus::{InMemoryMessageBus, DEFAULT_CHANNEL_CAPACITY};
use shared_types::{to_hex, BlockHeader};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

use super::config::GuardianConfig;
use crate::adapters::{BoundDepositRegistry, DevnetChain, DevnetConnector, DevnetSecurityGateway};

/// The assembled guardian.
pub struct GuardianRuntime {
    config: GuardianConfig,
    chain: Arc<DevnetChain>,
    bindings: Arc<ContractBindings>,
    bootstrapper: RecoveryBootstrapper,
    monitor: Arc<DepositMonitor>,
    bus: Arc<InMemoryMessageBus>,
    watcher: Mutex<Option<WatchHandle>>,
    producer: Mutex<Option<JoinHandle<()>>>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
}

impl GuardianRuntime {
    /// Wire every component over a fresh devnet chain.
    pub fn new(config: GuardianConfig) -> Self {
        let chain = Arc::new(DevnetChain::new(config.chain_id));
        Self::with_chain(config, chain)
    }

    /// Wire every component over `chain`.
    pub fn with_chain(config: GuardianConfig, chain: Arc<DevnetChain>) -> Self {
        info!(chain_id = config.chain_id, "[runtime] Assembling guardian runtime");

        let bindings = Arc::new(ContractBindings::new(
            chain.clone(),
            Arc::new(DevnetConnector::new(chain.clone())),
        ));
        let bootstrapper = RecoveryBootstrapper::from_config(
            Arc::clone(&bindings),
            chain.clone(),
            &config.bindings_config(),
        );

        let bus = Arc::new(InMemoryMessageBus::with_limits(
            DEFAULT_CHANNEL_CAPACITY,
            config.max_payload_bytes,
        ));

        let monitor = Arc::new(DepositMonitor::new(
            config.monitor_config(),
            chain.clone(),
            chain.clone(),
            Arc::new(BoundDepositRegistry::new(chain.clone(), Arc::clone(&bindings))),
            Arc::new(DevnetSecurityGateway::new(
                chain.clone(),
                Arc::clone(&bindings),
                config.guardian_address,
                config.guardian_index,
            )),
            bus.clone(),
        ));

        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        Self {
            config,
            chain,
            bindings,
            bootstrapper,
            monitor,
            bus,
            watcher: Mutex::new(None),
            producer: Mutex::new(None),
            shutdown_tx,
            shutdown_rx,
        }
    }

    /// Bootstrap bindings and start reacting to blocks.
    ///
    /// Returns the block the bindings were resolved at.
    pub async fn start(&self) -> Result<BlockHeader> {
        info!("===========================================");
        info!("  Deposit Guardian Runtime v{}", env!("CARGO_PKG_VERSION"));
        info!("===========================================");

        let block = self.bootstrapper.initialize_with_recovery().await;

        let handle = BlockWatcher::start(Arc::clone(&self.monitor), self.chain.clone());
        *self.watcher.lock() = Some(handle);

        if let Some(interval) = self.config.block_time() {
            let producer = self
                .chain
                .clone()
                .spawn_producer(interval, self.shutdown_rx.clone());
            *self.producer.lock() = Some(producer);
            info!(interval_ms = self.config.block_time_ms, "[runtime] Block producer started");
        }

        info!(
            block_number = block.number,
            block_hash = %to_hex(&block.hash),
            topic_suffix = %self.config.message_topic,
            "[runtime] Guardian running"
        );
        Ok(block)
    }

    /// Stop the watcher and the block producer, then log a metrics snapshot.
    pub async fn shutdown(&self) {
        info!("[runtime] Initiating graceful shutdown...");

        if let Err(e) = self.shutdown_tx.send(true) {
            error!("[runtime] Failed to send shutdown signal: {}", e);
        }

        if let Some(watcher) = self.watcher.lock().take() {
            watcher.stop();
        }

        let producer = self.producer.lock().take();
        if let Some(producer) = producer {
            if let Err(e) = producer.await {
                error!("[runtime] Block producer ended abnormally: {}", e);
            }
        }

        match guardian_telemetry::render_metrics() {
            Ok(snapshot) => info!(metrics = %snapshot, "[runtime] Final metrics snapshot"),
            Err(e) => error!(error = %e, "[runtime] Failed to render metrics"),
        }

        info!(
            messages_published = shared_bus::MessageBus::messages_published(self.bus.as_ref()),
            "[runtime] Shutdown complete"
        );
    }

    /// Configuration in use.
    pub fn config(&self) -> &GuardianConfig {
        &self.config
    }

    /// The devnet chain.
    pub fn chain(&self) -> Arc<DevnetChain> {
        Arc::clone(&self.chain)
    }

    /// The contract binding cache.
    pub fn bindings(&self) -> Arc<ContractBindings> {
        Arc::clone(&self.bindings)
    }

    /// The deposit monitor.
    pub fn monitor(&self) -> Arc<DepositMonitor> {
        Arc::clone(&self.monitor)
    }

    /// The message bus guardian messages are published to.
    pub fn bus(&self) -> Arc<InMemoryMessageBus> {
        Arc::clone(&self.bus)
    }
}
