//! # Attestation Flows
//!
//! Bootstrap a runtime on the devnet, mine blocks and observe what the
//! guardian publishes when the signing queue is clean.

#[cfg(test)]
mod tests {
    use super::super::support::{key, Harness};
    use guardian_runtime::GuardianConfig;
    use shared_bus::{GuardianMessage, MessageType};

    fn deposit(message: GuardianMessage) -> shared_bus::DepositMessage {
        match message {
            GuardianMessage::Deposit(deposit) => deposit,
            other => panic!("expected a deposit message, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_clean_block_publishes_attestation() {
        let mut harness = Harness::start().await;

        let block = harness.mine().await;

        let message = deposit(harness.next_message().await);
        assert_eq!(message.block_number, block.number);
        assert_eq!(message.block_hash, block.hash);
        assert_eq!(message.keys_op_index, 0);
        assert_eq!(message.guardian_index, Some(0));
        assert_eq!(message.signature.len(), 32);
        harness.stop().await;
    }

    #[tokio::test]
    async fn test_repeated_state_attested_once_per_window() {
        let mut harness = Harness::start().await;

        harness.mine().await;
        harness.mine().await;
        harness.mine().await;

        let published = harness.drain();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].block_number(), 1);
        // the snapshot still follows the head
        assert_eq!(harness.runtime.monitor().last_state().unwrap().block_number, 3);
        harness.stop().await;
    }

    #[tokio::test]
    async fn test_keys_op_index_change_attests_again() {
        let mut harness = Harness::start().await;
        harness.mine().await;
        harness.next_message().await;

        harness.chain.queue_key(key(1));
        let block = harness.mine().await;

        let message = deposit(harness.next_message().await);
        assert_eq!(message.block_number, block.number);
        assert_eq!(message.keys_op_index, 1);
    }

    #[tokio::test]
    async fn test_deposit_root_change_attests_again() {
        let mut harness = Harness::start().await;
        harness.mine().await;
        let first = deposit(harness.next_message().await);

        harness.chain.queue_key(key(1));
        harness.chain.queue_key(key(2));
        assert_eq!(harness.chain.deposit_queued(), 2);
        harness.mine().await;

        let second = deposit(harness.next_message().await);
        assert_ne!(second.deposit_root, first.deposit_root);
        assert_eq!(second.keys_op_index, 3);
    }

    #[tokio::test]
    async fn test_window_rollover_reattests_unchanged_state() {
        let config = GuardianConfig {
            resigning_window_blocks: 2,
            ..GuardianConfig::for_testing()
        };
        let mut harness = Harness::start_with(config, |_| {}).await;

        // blocks 1, 2 and 3 fall into windows 0, 1 and 1
        harness.mine().await;
        harness.mine().await;
        harness.mine().await;

        let blocks: Vec<u64> = harness.drain().iter().map(|m| m.block_number()).collect();
        assert_eq!(blocks, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_messages_are_attestations_only_when_clean() {
        let mut harness = Harness::start().await;
        harness.chain.deposit_key(key(5));

        harness.mine().await;

        let message = harness.next_message().await;
        assert_eq!(message.message_type(), MessageType::Deposit);
        assert!(harness.chain.paused_at().is_none());
    }
}
