//! Error types for the deposit monitor

use shared_bus::PublishError;
use shared_types::{ChainError, ChainId};
use thiserror::Error;

/// Deposit monitor errors.
///
/// Every variant aborts the current cycle; none escapes the block handler.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// No topic prefix is configured for the connected chain
    #[error("Unsupported chain id {chain_id}")]
    UnsupportedChain {
        /// Chain id reported by the provider
        chain_id: ChainId,
    },

    /// A domain collaborator (registry, deposit, security) failed
    #[error("{operation} failed: {reason}")]
    Collaborator {
        /// Collaborator call that failed
        operation: String,
        /// Underlying failure
        reason: String,
    },

    /// Chain provider error
    #[error("Chain error: {0}")]
    Chain(#[from] ChainError),

    /// Message bus rejected the publish
    #[error("Publish error: {0}")]
    Publish(#[from] PublishError),
}

impl MonitorError {
    /// Wrap a collaborator failure.
    pub fn collaborator(operation: impl Into<String>, err: impl std::fmt::Display) -> Self {
        MonitorError::Collaborator {
            operation: operation.into(),
            reason: err.to_string(),
        }
    }
}

/// Result type for deposit monitor operations
pub type MonitorResult<T> = Result<T, MonitorError>;
