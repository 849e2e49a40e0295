//! # Ports Module
//!
//! Outbound dependencies of the binding cache.

pub mod outbound;

pub use outbound::*;
