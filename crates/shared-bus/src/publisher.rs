//! # Message Publisher
//!
//! Defines the publishing side of the guardian message bus.

use crate::messages::{BusEnvelope, GuardianMessage};
use crate::subscriber::{Subscription, TopicFilter};
use crate::{DEFAULT_CHANNEL_CAPACITY, DEFAULT_MAX_PAYLOAD_BYTES};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Errors from publishing a message.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The encoded message exceeds the transport limit.
    #[error("Payload too large: {size} bytes exceeds limit of {limit}")]
    PayloadTooLarge { size: usize, limit: usize },

    /// The message could not be encoded.
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The transport was shut down.
    #[error("Message bus closed")]
    Closed,
}

/// Trait for publishing guardian messages.
///
/// This is the interface the guardian uses to reach its peers. A publish
/// either succeeds or fails; acknowledgement semantics stay with the
/// transport.
#[async_trait]
pub trait MessageBus: Send + Sync {
    /// Publish a message to a topic.
    ///
    /// # Returns
    ///
    /// The number of local subscribers that received the message.
    async fn publish(&self, topic: &str, message: GuardianMessage) -> Result<usize, PublishError>;

    /// Get the total number of messages accepted for publishing.
    fn messages_published(&self) -> u64;
}

/// In-memory implementation of the message bus.
///
/// Uses `tokio::sync::broadcast` for multi-producer, multi-consumer semantics.
/// Suitable for a single process; a networked deployment plugs in a
/// different `MessageBus` implementation.
pub struct InMemoryMessageBus {
    /// Broadcast sender for envelopes.
    sender: broadcast::Sender<BusEnvelope>,

    /// Total messages published.
    messages_published: AtomicU64,

    /// Set once `close` is called.
    closed: AtomicBool,

    /// Upper bound on the encoded message size.
    max_payload_bytes: usize,

    /// Channel capacity.
    capacity: usize,
}

impl InMemoryMessageBus {
    /// Create a new in-memory bus with default limits.
    #[must_use]
    pub fn new() -> Self {
        Self::with_limits(DEFAULT_CHANNEL_CAPACITY, DEFAULT_MAX_PAYLOAD_BYTES)
    }

    /// Create a new in-memory bus with specified capacity and payload limit.
    #[must_use]
    pub fn with_limits(capacity: usize, max_payload_bytes: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            messages_published: AtomicU64::new(0),
            closed: AtomicBool::new(false),
            max_payload_bytes,
            capacity,
        }
    }

    /// Subscribe to messages matching a filter.
    #[must_use]
    pub fn subscribe(&self, filter: TopicFilter) -> Subscription {
        let receiver = self.sender.subscribe();
        debug!(topics = ?filter.topics, "New bus subscription created");
        Subscription::new(receiver, filter)
    }

    /// Reject every subsequent publish.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    /// Get the number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Get the channel capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for InMemoryMessageBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageBus for InMemoryMessageBus {
    async fn publish(&self, topic: &str, message: GuardianMessage) -> Result<usize, PublishError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(PublishError::Closed);
        }

        let size = serde_json::to_vec(&message)?.len();
        if size > self.max_payload_bytes {
            return Err(PublishError::PayloadTooLarge {
                size,
                limit: self.max_payload_bytes,
            });
        }

        let message_type = message.message_type();
        self.messages_published.fetch_add(1, Ordering::Relaxed);

        let envelope = BusEnvelope {
            topic: topic.to_string(),
            message,
        };

        match self.sender.send(envelope) {
            Ok(receiver_count) => {
                debug!(
                    topic,
                    message_type = message_type.as_str(),
                    receivers = receiver_count,
                    "Message published"
                );
                Ok(receiver_count)
            }
            Err(_) => {
                // No local receivers; the publish itself still succeeded
                warn!(
                    topic,
                    message_type = message_type.as_str(),
                    "Message published with no local receivers"
                );
                Ok(0)
            }
        }
    }

    fn messages_published(&self) -> u64 {
        self.messages_published.load(Ordering::Relaxed)
    }
}
