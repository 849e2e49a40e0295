//! # DG-01 Contract Bindings
//!
//! Resolves and caches the on-chain contracts the guardian talks to.
//!
//! **Subsystem ID:** 1
//! **Architecture:** Hexagonal (Ports/Adapters)
//!
//! ## Purpose
//!
//! Every other subsystem reaches the staking pool, the deposit security
//! module (DSM), the staking router and the deposit contract through this
//! cache. Addresses come from an address resolver and are bound to callable
//! handles built by a contract connector.
//!
//! ## Initialization Order
//!
//! ```text
//! pool ──→ security module ──→ (clear + refetch prefixes)
//!                 │
//!                 └──→ deposit (address read from the DSM, bound once)
//!                                   │
//!                                   └──→ staking router
//! ```
//!
//! The deposit contract address is only discoverable through the DSM, so
//! the order is fixed. The deposit binding is permanent; the other three
//! may be re-pointed by a later initialization and the change is logged.
//!
//! ## Recovery
//!
//! [`RecoveryBootstrapper::initialize_with_recovery`] retries the whole
//! initialization with a fixed delay until it succeeds. The node is not
//! usable without its contracts, so there is no attempt cap.
//!
//! ## Module Structure
//!
//! ```text
//! dg-01-contract-bindings/
//! ├── domain/      # ContractKey, PrefixKind, Binding
//! ├── ports/       # AddressResolver, ContractConnector, contract handles
//! ├── service.rs   # ContractBindings cache
//! └── recovery.rs  # RecoveryBootstrapper
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod domain;
pub mod error;
pub mod ports;
pub mod recovery;
pub mod service;

#[cfg(test)]
pub(crate) mod test_support;

// Re-exports
pub use config::BindingsConfig;
pub use domain::{Binding, ContractBinding, ContractKey, PrefixKind};
pub use error::{BindingError, BindingResult};
pub use ports::{
    AddressResolver, ContractConnector, ContractHandle, DepositContract, SecurityModuleContract,
};
pub use recovery::RecoveryBootstrapper;
pub use service::ContractBindings;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
