//! # Chain Provider Port
//!
//! The only way guardian subsystems reach the chain. Implementations wrap an
//! RPC client (out of scope here) or an in-process devnet.
//!
//! Block notifications are delivered through [`BlockSubscription`]; dropping
//! the subscription unsubscribes.

use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::debug;

use crate::entities::{BlockHeader, ChainId};
use crate::errors::ChainResult;

/// Outbound port to the chain node.
#[async_trait]
pub trait ChainProvider: Send + Sync {
    /// Header of the latest block.
    async fn get_block(&self) -> ChainResult<BlockHeader>;

    /// Number of the latest block.
    async fn get_block_number(&self) -> ChainResult<u64>;

    /// Chain identifier of the connected network.
    async fn get_chain_id(&self) -> ChainResult<ChainId>;

    /// Subscribe to new-block notifications.
    fn subscribe_blocks(&self) -> BlockSubscription;
}

/// A live subscription to new-block notifications.
pub struct BlockSubscription {
    receiver: broadcast::Receiver<BlockHeader>,
}

impl BlockSubscription {
    /// Wrap a broadcast receiver fed by the provider.
    #[must_use]
    pub fn new(receiver: broadcast::Receiver<BlockHeader>) -> Self {
        Self { receiver }
    }

    /// Receive the next block header.
    ///
    /// Returns `None` once the provider closes the stream. A lagging
    /// subscriber skips the overwritten notifications instead of failing.
    pub async fn recv(&mut self) -> Option<BlockHeader> {
        loop {
            match self.receiver.recv().await {
                Ok(header) => return Some(header),
                Err(broadcast::error::RecvError::Closed) => return None,
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    debug!(lagged = count, "Block subscriber lagged, notifications skipped");
                }
            }
        }
    }
}
