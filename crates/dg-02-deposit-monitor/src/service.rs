//! Deposit Monitor Service - the detection cycle
//!
//! One cycle per accepted block:
//! 1. Fetch queued and deposited keys in parallel, intersect.
//! 2. Intersection → pause path: publish pause evidence, spawn the pause call.
//! 3. Otherwise → attest path: snapshot state, publish unless it repeats.
//!
//! Errors end the cycle and are only logged. The entry guard is released
//! when the cycle future completes, whichever way it completes.

use parking_lot::Mutex;
use shared_bus::{GuardianMessage, MessageBus};
use shared_types::{to_hex, BlockHeader, ChainProvider, PubKey};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info, info_span, warn, Instrument, Span};
use uuid::Uuid;

use crate::config::MonitorConfig;
use crate::domain::{find_intersections, message_topic, ContractsState};
use crate::error::{MonitorError, MonitorResult};
use crate::metrics;
use crate::ports::{DepositRegistry, KeysRegistry, SecurityGateway};

/// How a block tick ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Another cycle was running; the tick was dropped.
    Skipped,
    /// Intersection found, pause evidence published.
    Paused,
    /// Intersection found but deposits were already paused.
    AlreadyPaused,
    /// Clean state attested.
    Attested,
    /// Clean state repeats the previous one; nothing published.
    Unchanged,
    /// The cycle failed; see logs.
    Failed,
}

impl CycleOutcome {
    /// Stable lowercase label for logs and metrics.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            CycleOutcome::Skipped => "skipped",
            CycleOutcome::Paused => "paused",
            CycleOutcome::AlreadyPaused => "already_paused",
            CycleOutcome::Attested => "attested",
            CycleOutcome::Unchanged => "unchanged",
            CycleOutcome::Failed => "failed",
        }
    }
}

/// Releases the entry guard on drop.
struct CycleGuard<'a> {
    running: &'a AtomicBool,
}

impl Drop for CycleGuard<'_> {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Release);
    }
}

/// Detection and escalation engine.
pub struct DepositMonitor {
    config: MonitorConfig,
    provider: Arc<dyn ChainProvider>,
    keys: Arc<dyn KeysRegistry>,
    deposits: Arc<dyn DepositRegistry>,
    security: Arc<dyn SecurityGateway>,
    bus: Arc<dyn MessageBus>,
    /// Single-flight flag, true while a cycle runs.
    running: AtomicBool,
    last_state: Mutex<Option<ContractsState>>,
}

impl DepositMonitor {
    /// Create a monitor over its collaborators.
    pub fn new(
        config: MonitorConfig,
        provider: Arc<dyn ChainProvider>,
        keys: Arc<dyn KeysRegistry>,
        deposits: Arc<dyn DepositRegistry>,
        security: Arc<dyn SecurityGateway>,
        bus: Arc<dyn MessageBus>,
    ) -> Self {
        Self {
            config,
            provider,
            keys,
            deposits,
            security,
            bus,
            running: AtomicBool::new(false),
            last_state: Mutex::new(None),
        }
    }

    /// Configuration in use.
    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Whether a cycle is currently running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Snapshot stored by the last attest path.
    pub fn last_state(&self) -> Option<ContractsState> {
        *self.last_state.lock()
    }

    fn try_enter(&self) -> Option<CycleGuard<'_>> {
        self.running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| CycleGuard {
                running: &self.running,
            })
    }

    // =========================================================================
    // CYCLE ENTRY
    // =========================================================================

    /// Handle a new block notification.
    ///
    /// Never fails: errors are logged and reported as [`CycleOutcome::Failed`].
    pub async fn on_new_block(&self, block: BlockHeader) -> CycleOutcome {
        let Some(_guard) = self.try_enter() else {
            debug!(
                block_number = block.number,
                "[dg-02] Cycle already running, dropping block"
            );
            metrics::record_tick_dropped();
            return CycleOutcome::Skipped;
        };

        let span = info_span!(
            "deposit_cycle",
            cycle_id = %Uuid::new_v4(),
            block_number = block.number
        );

        let outcome = match self.run_cycle().instrument(span.clone()).await {
            Ok(outcome) => outcome,
            Err(e) => {
                span.in_scope(|| error!(error = %e, "[dg-02] Detection cycle failed"));
                CycleOutcome::Failed
            }
        };

        metrics::record_cycle(outcome.as_str());
        outcome
    }

    async fn run_cycle(&self) -> MonitorResult<CycleOutcome> {
        let intersections = self.get_keys_intersections().await?;

        if !intersections.is_empty() {
            return self.handle_keys_intersections(&intersections).await;
        }

        self.handle_correct_keys().await
    }

    /// Queued keys that are already deposited.
    pub async fn get_keys_intersections(&self) -> MonitorResult<Vec<PubKey>> {
        let (next_signing_keys, deposited) = tokio::try_join!(
            self.keys.next_signing_keys(),
            self.deposits.all_deposited_pub_keys()
        )?;

        let intersections = find_intersections(&next_signing_keys, &deposited);
        metrics::set_key_intersections(intersections.len());
        Ok(intersections)
    }

    // =========================================================================
    // PAUSE PATH
    // =========================================================================

    async fn handle_keys_intersections(
        &self,
        intersections: &[PubKey],
    ) -> MonitorResult<CycleOutcome> {
        let keys: Vec<String> = intersections.iter().map(ToString::to_string).collect();
        warn!(count = intersections.len(), ?keys, "[dg-02] Already deposited keys found in the queue");

        let (pause_message, is_paused) = tokio::try_join!(
            self.security.pause_deposit_data(),
            self.security.is_deposits_paused()
        )?;

        if is_paused {
            warn!("[dg-02] Deposits are already paused");
            return Ok(CycleOutcome::AlreadyPaused);
        }

        self.spawn_pause(pause_message.block_number, pause_message.signature.clone());
        self.send_message_from_guardian(pause_message.into()).await?;
        Ok(CycleOutcome::Paused)
    }

    /// Submit the pause transaction without waiting for it.
    fn spawn_pause(&self, block_number: u64, signature: Vec<u8>) {
        let security = Arc::clone(&self.security);
        tokio::spawn(
            async move {
                match security.pause_deposits(block_number, signature).await {
                    Ok(()) => info!(block_number, "[dg-02] Pause transaction submitted"),
                    Err(e) => {
                        error!(block_number, error = %e, "[dg-02] Pause transaction failed");
                        metrics::record_pause_call_failed();
                    }
                }
            }
            .instrument(Span::current()),
        );
    }

    // =========================================================================
    // ATTEST PATH
    // =========================================================================

    async fn handle_correct_keys(&self) -> MonitorResult<CycleOutcome> {
        let block_number = async {
            self.provider
                .get_block_number()
                .await
                .map_err(MonitorError::from)
        };
        let (keys_op_index, deposit_root, block_number) = tokio::try_join!(
            self.keys.keys_op_index(),
            self.deposits.deposit_root(),
            block_number
        )?;

        let current = ContractsState {
            keys_op_index,
            deposit_root,
            block_number,
        };

        // the new snapshot replaces the stored one even when it repeats it
        let is_same = {
            let mut last = self.last_state.lock();
            let is_same = current.is_same_state(last.as_ref(), self.config.resigning_window_blocks);
            *last = Some(current);
            is_same
        };

        if is_same {
            debug!(
                keys_op_index,
                block_number, "[dg-02] Contracts state unchanged, skipping attestation"
            );
            return Ok(CycleOutcome::Unchanged);
        }

        let deposit_message = self
            .security
            .deposit_data(deposit_root, keys_op_index)
            .await?;
        self.send_message_from_guardian(deposit_message.into())
            .await?;
        Ok(CycleOutcome::Attested)
    }

    // =========================================================================
    // PUBLISH
    // =========================================================================

    /// Publish a message to this chain's guardian topic.
    pub async fn send_message_from_guardian(&self, message: GuardianMessage) -> MonitorResult<()> {
        if message.guardian_index().is_none() {
            warn!(
                message_type = message.message_type().as_str(),
                "[dg-02] Guardian address is not in the guardian list"
            );
        }

        let chain_id = self.provider.get_chain_id().await?;
        let topic = message_topic(
            &self.config.chain_prefixes,
            chain_id,
            &self.config.message_topic,
        )?;

        let message_type = message.message_type();
        let block_number = message.block_number();
        let delivered = self.bus.publish(&topic, message).await?;

        info!(
            topic = %topic,
            message_type = message_type.as_str(),
            block_number,
            delivered,
            "[dg-02] Guardian message published"
        );
        metrics::record_message_published(message_type.as_str());
        Ok(())
    }
}

impl std::fmt::Debug for DepositMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DepositMonitor")
            .field("config", &self.config)
            .field("running", &self.is_running())
            .field("last_state", &self.last_state().map(|s| (s.block_number, to_hex(&s.deposit_root))))
            .finish_non_exhaustive()
    }
}
