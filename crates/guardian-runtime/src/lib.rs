//! # Guardian Runtime Library
//!
//! Exposes the runtime's modules for tests. The entry point is the
//! `guardian-runtime` binary.
//!
//! - `container/` - configuration and the assembled [`GuardianRuntime`]
//! - `adapters/` - devnet implementations of every subsystem port

#![warn(missing_docs)]
#![allow(clippy::type_complexity)]

pub mod adapters;
pub mod container;

pub use container::{ConfigError, GuardianConfig, GuardianRuntime};
