//! Error types for the contract bindings subsystem

use shared_types::ChainError;
use thiserror::Error;

use crate::domain::ContractKey;

/// Contract bindings errors
#[derive(Debug, Clone, Error)]
pub enum BindingError {
    /// Address lookup or handle construction failed during initialization
    #[error("Failed to resolve {key} binding: {reason}")]
    ResolutionFailed {
        /// Key being initialized
        key: ContractKey,
        /// Underlying failure
        reason: String,
    },

    /// A getter was called before the binding was initialized
    #[error("{key} binding is not initialized")]
    NotFound {
        /// Key that was requested
        key: ContractKey,
    },

    /// A contract read through a bound handle failed
    #[error("Chain error: {0}")]
    Chain(#[from] ChainError),
}

impl BindingError {
    pub(crate) fn resolution(key: ContractKey, err: impl std::fmt::Display) -> Self {
        BindingError::ResolutionFailed {
            key,
            reason: err.to_string(),
        }
    }
}

/// Result type for binding operations
pub type BindingResult<T> = Result<T, BindingError>;
