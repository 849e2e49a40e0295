//! # Error Types
//!
//! Defines error types used across subsystems.

use thiserror::Error;

/// Errors surfaced by the chain provider and contract calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    /// The RPC endpoint failed or returned an unusable response.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// A contract read or write reverted or could not be encoded.
    #[error("Contract call {method} failed: {reason}")]
    ContractCall { method: String, reason: String },
}

/// Result type for chain operations.
pub type ChainResult<T> = Result<T, ChainError>;

/// Errors when parsing primitives from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Input is not valid hex.
    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    /// Input decoded to the wrong number of bytes.
    #[error("Invalid length: expected {expected} bytes, got {got}")]
    InvalidLength { expected: usize, got: usize },
}
