//! # Guardian Container
//!
//! Runtime configuration and the assembled object graph.

pub mod config;
pub mod runtime;

pub use config::{ConfigError, GuardianConfig};
pub use runtime::GuardianRuntime;
