//! # DG-02 Deposit Monitor
//!
//! Detection and escalation engine of the guardian.
//!
//! **Subsystem ID:** 2
//! **Architecture:** Hexagonal (Ports/Adapters)
//!
//! ## Purpose
//!
//! On every new block the monitor checks whether any validator key queued
//! for deposit has already been deposited. A non-empty intersection means
//! someone front-ran the pool with the same key; the guardian then pauses
//! deposits and broadcasts the signed pause evidence. Otherwise it attests
//! the current deposit state, skipping repeated attestations of the same
//! state within a resigning window.
//!
//! ## Cycle State Machine
//!
//! ```text
//! IDLE ──(block, guard free)──→ RUNNING
//! RUNNING ──(intersection)──────────────→ pause path ──→ IDLE
//! RUNNING ──(clean, state changed)──────→ attest path ─→ IDLE
//! RUNNING ──(clean, state unchanged)────────────────────→ IDLE
//! RUNNING ──(error)──────────────────────(logged)───────→ IDLE
//! ```
//!
//! A block that arrives while a cycle is running is dropped, not queued.
//!
//! ## Module Structure
//!
//! ```text
//! dg-02-deposit-monitor/
//! ├── domain/      # ContractsState, intersection, topic derivation
//! ├── ports/       # KeysRegistry, DepositRegistry, SecurityGateway
//! ├── service.rs   # DepositMonitor
//! ├── watcher.rs   # BlockWatcher (block events → cycles)
//! └── metrics.rs   # Prometheus metrics (feature "metrics")
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod domain;
pub mod error;
mod metrics;
pub mod ports;
pub mod service;
pub mod watcher;

#[cfg(test)]
pub(crate) mod test_support;

// Re-exports
pub use config::MonitorConfig;
pub use domain::{find_intersections, message_topic, ChainPrefixes, ContractsState};
pub use error::{MonitorError, MonitorResult};
pub use ports::{DepositRegistry, KeysRegistry, SecurityGateway};
pub use service::{CycleOutcome, DepositMonitor};
pub use watcher::{BlockWatcher, WatchHandle};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
