//! # Shared Bus - Guardian Message Bus
//!
//! Carries guardian evidence (pause requests and deposit attestations) to
//! peer guardians and the downstream aggregation layer.
//!
//! ## Contract
//!
//! - Messages are published to a string topic derived by the sender.
//! - Delivery and acknowledgement belong to the transport; the sender only
//!   learns whether the publish itself succeeded.
//! - The wire encoding is JSON with a `type` tag (`pause` | `deposit`).
//!
//! ```text
//! ┌──────────────┐     publish(topic, msg)     ┌──────────────┐
//! │   Guardian   │ ──────────────────────────→ │  Message Bus │ ──→ peers
//! └──────────────┘                             └──────────────┘
//! ```

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod messages;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use messages::{BusEnvelope, DepositMessage, GuardianMessage, MessageType, PauseMessage};
pub use publisher::{InMemoryMessageBus, MessageBus, PublishError};
pub use subscriber::{Subscription, SubscriptionError, TopicFilter};

/// Maximum envelopes to buffer per subscriber before lagging.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;

/// Default upper bound on an encoded message.
pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 64 * 1024;
