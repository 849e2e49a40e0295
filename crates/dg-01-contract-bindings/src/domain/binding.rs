//! # Bindings
//!
//! A binding pairs a resolved address with the handle that calls it.
//! Handles are shared (`Arc`), so replacing a binding never invalidates a
//! caller that already holds the previous handle.

use shared_types::{to_hex, Address};
use std::fmt;
use std::sync::Arc;

use super::keys::ContractKey;
use crate::ports::{ContractHandle, SecurityModuleContract};

/// A resolved (address, handle) pair.
pub struct Binding<T: ?Sized> {
    /// Address the handle points at.
    pub address: Address,
    /// Callable handle.
    pub handle: Arc<T>,
}

impl<T: ?Sized> Binding<T> {
    /// Create a binding.
    pub fn new(address: Address, handle: Arc<T>) -> Self {
        Self { address, handle }
    }
}

impl<T: ?Sized> Clone for Binding<T> {
    fn clone(&self) -> Self {
        Self {
            address: self.address,
            handle: Arc::clone(&self.handle),
        }
    }
}

impl<T: ?Sized> fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("address", &to_hex(&self.address))
            .finish_non_exhaustive()
    }
}

/// A binding for one of the mutable keys, typed by role.
#[derive(Clone, Debug)]
pub enum ContractBinding {
    /// Staking pool.
    Pool(Binding<dyn ContractHandle>),
    /// Deposit security module.
    SecurityModule(Binding<dyn SecurityModuleContract>),
    /// Staking router.
    StakingRouter(Binding<dyn ContractHandle>),
}

impl ContractBinding {
    /// Logical key of this binding.
    #[must_use]
    pub fn key(&self) -> ContractKey {
        match self {
            ContractBinding::Pool(_) => ContractKey::Pool,
            ContractBinding::SecurityModule(_) => ContractKey::SecurityModule,
            ContractBinding::StakingRouter(_) => ContractKey::StakingRouter,
        }
    }
}
