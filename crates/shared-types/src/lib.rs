//! # Shared Types Crate
//!
//! This crate contains the chain primitives and the chain-provider port used
//! by every guardian subsystem.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-subsystem types are defined here.
//! - **Fixed-width primitives**: addresses, hashes and validator keys are
//!   plain byte arrays; hex is only a presentation concern.
//! - **Ports, not clients**: the chain RPC client lives outside the core and
//!   is reached only through [`ChainProvider`].

pub mod chain;
pub mod entities;
pub mod errors;
pub mod hex_serde;

pub use chain::{BlockSubscription, ChainProvider};
pub use entities::*;
pub use errors::*;
