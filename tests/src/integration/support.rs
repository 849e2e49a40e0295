//! Runtime harness shared by the integration flows.

use guardian_runtime::adapters::DevnetChain;
use guardian_runtime::{GuardianConfig, GuardianRuntime};
use shared_bus::{GuardianMessage, Subscription, TopicFilter};
use shared_types::{BlockHeader, PubKey};
use std::sync::Arc;
use std::time::Duration;

/// Topic a holesky guardian publishes to with the default suffix.
pub const HOLESKY_TOPIC: &str = "holesky-defender";

pub fn key(byte: u8) -> PubKey {
    PubKey([byte; 48])
}

/// Let spawned cycle and pause tasks run to completion.
pub async fn settle() {
    for _ in 0..50 {
        tokio::task::yield_now().await;
    }
}

/// A started runtime on a manually mined devnet, subscribed to its topic.
pub struct Harness {
    pub runtime: GuardianRuntime,
    pub chain: Arc<DevnetChain>,
    pub messages: Subscription,
    pub start_block: BlockHeader,
}

impl Harness {
    pub async fn start() -> Self {
        Self::start_with(GuardianConfig::for_testing(), |_| {}).await
    }

    /// Start with `config`, letting `prepare` touch the chain before bootstrap.
    pub async fn start_with(config: GuardianConfig, prepare: impl FnOnce(&DevnetChain)) -> Self {
        let runtime = GuardianRuntime::new(config);
        let chain = runtime.chain();
        prepare(chain.as_ref());
        let messages = runtime.bus().subscribe(TopicFilter::topic(HOLESKY_TOPIC));
        let start_block = runtime.start().await.unwrap();

        Self {
            runtime,
            chain,
            messages,
            start_block,
        }
    }

    /// Mine a block and let the monitor finish the cycle it triggers.
    pub async fn mine(&self) -> BlockHeader {
        let block = self.chain.mine_block();
        settle().await;
        assert!(!self.runtime.monitor().is_running());
        block
    }

    /// Next published message, failing the test if none arrives.
    pub async fn next_message(&mut self) -> GuardianMessage {
        tokio::time::timeout(Duration::from_secs(5), self.messages.recv())
            .await
            .expect("no guardian message published")
            .expect("bus closed")
            .message
    }

    /// Published messages not yet consumed.
    pub fn drain(&mut self) -> Vec<GuardianMessage> {
        let mut drained = Vec::new();
        while let Some(envelope) = self.messages.try_recv().unwrap() {
            drained.push(envelope.message);
        }
        drained
    }

    pub async fn stop(self) {
        self.runtime.shutdown().await;
    }
}
