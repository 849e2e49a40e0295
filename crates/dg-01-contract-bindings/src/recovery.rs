//! # Recovery Bootstrapper
//!
//! Retries contract initialization until it succeeds. Each attempt pins the
//! latest block hash so every address is read from the same block.

use shared_types::{to_hex, BlockHeader, ChainProvider};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

use crate::config::BindingsConfig;
use crate::error::BindingResult;
use crate::service::ContractBindings;

/// Drives [`ContractBindings::initialize_all`] with retry.
pub struct RecoveryBootstrapper {
    bindings: Arc<ContractBindings>,
    provider: Arc<dyn ChainProvider>,
    retry_delay: Duration,
}

impl RecoveryBootstrapper {
    /// Create a bootstrapper with an explicit retry delay.
    pub fn new(
        bindings: Arc<ContractBindings>,
        provider: Arc<dyn ChainProvider>,
        retry_delay: Duration,
    ) -> Self {
        Self {
            bindings,
            provider,
            retry_delay,
        }
    }

    /// Create a bootstrapper from configuration.
    pub fn from_config(
        bindings: Arc<ContractBindings>,
        provider: Arc<dyn ChainProvider>,
        config: &BindingsConfig,
    ) -> Self {
        Self::new(bindings, provider, config.recovery_delay())
    }

    /// Delay between attempts.
    pub fn retry_delay(&self) -> Duration {
        self.retry_delay
    }

    /// Initialize every binding, retrying forever with a fixed delay.
    ///
    /// Returns the block the successful attempt was pinned to.
    pub async fn initialize_with_recovery(&self) -> BlockHeader {
        let mut attempts: u32 = 0;
        loop {
            attempts += 1;
            match self.try_initialize().await {
                Ok(block) => {
                    info!(
                        attempts,
                        block_number = block.number,
                        block_hash = %to_hex(&block.hash),
                        "[dg-01] Contract bindings initialized"
                    );
                    return block;
                }
                Err(e) => {
                    error!(
                        attempts,
                        error = %e,
                        retry_in_ms = self.retry_delay.as_millis() as u64,
                        "[dg-01] Contract initialization failed, retrying"
                    );
                    tokio::time::sleep(self.retry_delay).await;
                }
            }
        }
    }

    /// One initialization attempt pinned to the latest block.
    pub async fn try_initialize(&self) -> BindingResult<BlockHeader> {
        let block = self.provider.get_block().await?;
        self.bindings.initialize_all(&block.block_ref()).await?;
        Ok(block)
    }
}
