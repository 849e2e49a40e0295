//! # Message Subscriber
//!
//! Defines the subscription side of the guardian message bus.

use crate::messages::BusEnvelope;
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::debug;

/// Errors from subscription operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// The bus was dropped.
    #[error("Message bus closed")]
    Closed,
}

/// Topic filter for a subscription. An empty list matches every topic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicFilter {
    pub topics: Vec<String>,
}

impl TopicFilter {
    /// Match every topic.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Match a single topic.
    #[must_use]
    pub fn topic(topic: impl Into<String>) -> Self {
        Self {
            topics: vec![topic.into()],
        }
    }

    /// Whether an envelope passes this filter.
    #[must_use]
    pub fn matches(&self, envelope: &BusEnvelope) -> bool {
        self.topics.is_empty() || self.topics.iter().any(|t| *t == envelope.topic)
    }
}

/// A subscription handle for receiving envelopes.
///
/// Dropping it releases its broadcast receiver.
pub struct Subscription {
    receiver: broadcast::Receiver<BusEnvelope>,
    filter: TopicFilter,
}

impl Subscription {
    pub(crate) fn new(receiver: broadcast::Receiver<BusEnvelope>, filter: TopicFilter) -> Self {
        Self { receiver, filter }
    }

    /// Receive the next envelope that matches the filter.
    ///
    /// # Returns
    ///
    /// - `Some(envelope)` - The next matching envelope
    /// - `None` - The channel was closed (bus dropped)
    pub async fn recv(&mut self) -> Option<BusEnvelope> {
        loop {
            let envelope = match self.receiver.recv().await {
                Ok(e) => e,
                Err(broadcast::error::RecvError::Closed) => return None,
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    debug!(lagged = count, "Bus subscriber lagged, some messages dropped");
                    continue;
                }
            };

            if self.filter.matches(&envelope) {
                return Some(envelope);
            }
        }
    }

    /// Try to receive the next envelope without blocking.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(envelope))` - An envelope was available and matched
    /// - `Ok(None)` - Nothing available (would block)
    /// - `Err(SubscriptionError::Closed)` - The channel was closed
    pub fn try_recv(&mut self) -> Result<Option<BusEnvelope>, SubscriptionError> {
        loop {
            let envelope = match self.receiver.try_recv() {
                Ok(e) => e,
                Err(broadcast::error::TryRecvError::Empty) => return Ok(None),
                Err(broadcast::error::TryRecvError::Closed) => {
                    return Err(SubscriptionError::Closed)
                }
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
            };

            if self.filter.matches(&envelope) {
                return Ok(Some(envelope));
            }
        }
    }

    /// Get the filter for this subscription.
    #[must_use]
    pub fn filter(&self) -> &TopicFilter {
        &self.filter
    }
}
