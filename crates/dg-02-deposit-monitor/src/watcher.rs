//! # Block Watcher
//!
//! Feeds block notifications into [`DepositMonitor::on_new_block`]. Each
//! block gets its own task so the monitor's entry guard, not the
//! subscription channel, decides which ticks are dropped.

use shared_types::ChainProvider;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::service::DepositMonitor;

/// Subscribes a monitor to new blocks.
pub struct BlockWatcher;

impl BlockWatcher {
    /// Start watching. Dropping the returned handle stops the watcher.
    pub fn start(monitor: Arc<DepositMonitor>, provider: Arc<dyn ChainProvider>) -> WatchHandle {
        let mut subscription = provider.subscribe_blocks();

        let task = tokio::spawn(async move {
            info!("[dg-02] Block watcher started");
            while let Some(block) = subscription.recv().await {
                debug!(block_number = block.number, "[dg-02] New block");
                let monitor = Arc::clone(&monitor);
                tokio::spawn(async move {
                    monitor.on_new_block(block).await;
                });
            }
            info!("[dg-02] Block stream closed, watcher stopped");
        });

        WatchHandle { task }
    }
}

/// Cancellation handle for a running [`BlockWatcher`].
///
/// Cycles already started run to completion.
pub struct WatchHandle {
    task: JoinHandle<()>,
}

impl WatchHandle {
    /// Stop receiving blocks.
    pub fn stop(&self) {
        self.task.abort();
    }

    /// Whether the watcher task has ended.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
