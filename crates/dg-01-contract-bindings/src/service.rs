//! Contract Bindings Service - the binding cache
//!
//! Owns every contract binding and the DSM message prefixes. Locks are
//! never held across an `.await`; a prefix fetched from a security module
//! that was re-bound while the fetch was in flight is returned to the
//! caller but not cached.

use parking_lot::RwLock;
use shared_types::{to_hex, Address, BlockRef, Hash};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::domain::{Binding, ContractBinding, ContractKey, PrefixKind};
use crate::error::{BindingError, BindingResult};
use crate::ports::{
    AddressResolver, ContractConnector, ContractHandle, DepositContract, SecurityModuleContract,
};

/// Bindings whose address may change between initializations.
#[derive(Default)]
struct MutableBindings {
    pool: Option<Binding<dyn ContractHandle>>,
    security_module: Option<Binding<dyn SecurityModuleContract>>,
    staking_router: Option<Binding<dyn ContractHandle>>,
}

/// Binding cache for the guardian's contracts.
pub struct ContractBindings {
    resolver: Arc<dyn AddressResolver>,
    connector: Arc<dyn ContractConnector>,
    bindings: RwLock<MutableBindings>,
    deposit: RwLock<Option<Binding<dyn DepositContract>>>,
    prefixes: RwLock<HashMap<PrefixKind, Hash>>,
    /// Bumped on every security module bind; guards prefix inserts.
    security_module_generation: AtomicU64,
}

impl ContractBindings {
    /// Create an empty cache.
    pub fn new(resolver: Arc<dyn AddressResolver>, connector: Arc<dyn ContractConnector>) -> Self {
        Self {
            resolver,
            connector,
            bindings: RwLock::new(MutableBindings::default()),
            deposit: RwLock::new(None),
            prefixes: RwLock::new(HashMap::new()),
            security_module_generation: AtomicU64::new(0),
        }
    }

    // =========================================================================
    // INITIALIZATION
    // =========================================================================

    /// Resolve and bind every contract as of block `at`.
    ///
    /// Order: pool, security module (+ prefixes), deposit, staking router.
    /// A failure stops at the failing step; earlier steps stay bound.
    pub async fn initialize_all(&self, at: &BlockRef) -> BindingResult<()> {
        self.initialize_pool(at).await?;
        self.initialize_security_module(at).await?;
        self.initialize_deposit(at).await?;
        self.initialize_staking_router(at).await?;
        Ok(())
    }

    async fn resolve(&self, key: ContractKey, at: &BlockRef) -> BindingResult<Address> {
        self.resolver
            .resolve_address(key, at)
            .await
            .map_err(|e| BindingError::resolution(key, e))
    }

    async fn initialize_pool(&self, at: &BlockRef) -> BindingResult<()> {
        let key = ContractKey::Pool;
        let address = self.resolve(key, at).await?;
        let handle = self
            .connector
            .connect_pool(address)
            .map_err(|e| BindingError::resolution(key, e))?;
        self.set_binding(ContractBinding::Pool(Binding::new(address, handle)));
        Ok(())
    }

    async fn initialize_security_module(&self, at: &BlockRef) -> BindingResult<()> {
        let key = ContractKey::SecurityModule;
        let address = self.resolve(key, at).await?;
        let handle = self
            .connector
            .connect_security_module(address)
            .map_err(|e| BindingError::resolution(key, e))?;
        self.set_binding(ContractBinding::SecurityModule(Binding::new(address, handle)));

        tokio::try_join!(self.get_attest_prefix(), self.get_pause_prefix())
            .map_err(|e| BindingError::resolution(key, e))?;
        Ok(())
    }

    async fn initialize_deposit(&self, at: &BlockRef) -> BindingResult<()> {
        let key = ContractKey::Deposit;
        if self.deposit.read().is_some() {
            return Ok(());
        }

        let address = self
            .get_deposit_contract_address(at)
            .await
            .map_err(|e| BindingError::resolution(key, e))?;
        let handle = self
            .connector
            .connect_deposit(address)
            .map_err(|e| BindingError::resolution(key, e))?;
        self.set_permanent_binding(Binding::new(address, handle));
        Ok(())
    }

    async fn initialize_staking_router(&self, at: &BlockRef) -> BindingResult<()> {
        let key = ContractKey::StakingRouter;
        let address = self.resolve(key, at).await?;
        let handle = self
            .connector
            .connect_staking_router(address)
            .map_err(|e| BindingError::resolution(key, e))?;
        self.set_binding(ContractBinding::StakingRouter(Binding::new(address, handle)));
        Ok(())
    }

    // =========================================================================
    // UPSERTS
    // =========================================================================

    /// Insert or replace a mutable binding.
    ///
    /// Binding the security module clears the prefix cache.
    pub fn set_binding(&self, binding: ContractBinding) {
        let key = binding.key();
        {
            let mut bindings = self.bindings.write();
            match binding {
                ContractBinding::Pool(b) => upsert(&mut bindings.pool, key, b),
                ContractBinding::SecurityModule(b) => {
                    upsert(&mut bindings.security_module, key, b);
                    self.security_module_generation
                        .fetch_add(1, Ordering::SeqCst);
                    self.prefixes.write().clear();
                }
                ContractBinding::StakingRouter(b) => upsert(&mut bindings.staking_router, key, b),
            }
        }
    }

    /// Bind the deposit contract. A second call keeps the first binding.
    pub fn set_permanent_binding(&self, binding: Binding<dyn DepositContract>) {
        let key = ContractKey::Deposit;
        let mut slot = self.deposit.write();
        match slot.as_ref() {
            Some(existing) => {
                if existing.address != binding.address {
                    warn!(
                        key = %key,
                        cached = %to_hex(&existing.address),
                        ignored = %to_hex(&binding.address),
                        "[dg-01] Permanent address differs from cached one, keeping cached"
                    );
                }
            }
            None => {
                info!(key = %key, address = %to_hex(&binding.address), "[dg-01] Initial address bound");
                *slot = Some(binding);
            }
        }
    }

    // =========================================================================
    // GETTERS
    // =========================================================================

    /// Staking pool binding.
    pub fn get_pool(&self) -> BindingResult<Binding<dyn ContractHandle>> {
        self.bindings
            .read()
            .pool
            .clone()
            .ok_or(BindingError::NotFound {
                key: ContractKey::Pool,
            })
    }

    /// Deposit security module binding.
    pub fn get_security_module(&self) -> BindingResult<Binding<dyn SecurityModuleContract>> {
        self.bindings
            .read()
            .security_module
            .clone()
            .ok_or(BindingError::NotFound {
                key: ContractKey::SecurityModule,
            })
    }

    /// Staking router binding.
    pub fn get_staking_router(&self) -> BindingResult<Binding<dyn ContractHandle>> {
        self.bindings
            .read()
            .staking_router
            .clone()
            .ok_or(BindingError::NotFound {
                key: ContractKey::StakingRouter,
            })
    }

    /// Deposit contract binding.
    pub fn get_deposit(&self) -> BindingResult<Binding<dyn DepositContract>> {
        self.deposit.read().clone().ok_or(BindingError::NotFound {
            key: ContractKey::Deposit,
        })
    }

    // =========================================================================
    // SECURITY MODULE QUERIES
    // =========================================================================

    /// Attest message prefix, fetched from the security module on a miss.
    pub async fn get_attest_prefix(&self) -> BindingResult<Hash> {
        self.get_prefix(PrefixKind::Attest).await
    }

    /// Pause message prefix, fetched from the security module on a miss.
    pub async fn get_pause_prefix(&self) -> BindingResult<Hash> {
        self.get_prefix(PrefixKind::Pause).await
    }

    /// Cached prefix without fetching.
    pub fn cached_prefix(&self, kind: PrefixKind) -> Option<Hash> {
        self.prefixes.read().get(&kind).copied()
    }

    async fn get_prefix(&self, kind: PrefixKind) -> BindingResult<Hash> {
        if let Some(prefix) = self.cached_prefix(kind) {
            return Ok(prefix);
        }

        let generation = self.security_module_generation.load(Ordering::SeqCst);
        let security_module = self.get_security_module()?;
        let prefix = match kind {
            PrefixKind::Attest => security_module.handle.attest_message_prefix().await?,
            PrefixKind::Pause => security_module.handle.pause_message_prefix().await?,
        };

        let mut prefixes = self.prefixes.write();
        if self.security_module_generation.load(Ordering::SeqCst) == generation {
            prefixes.insert(kind, prefix);
        } else {
            debug!(kind = %kind, "[dg-01] Security module re-bound during prefix fetch, not caching");
        }
        Ok(prefix)
    }

    /// Deposit contract address as reported by the security module at `at`.
    pub async fn get_deposit_contract_address(&self, at: &BlockRef) -> BindingResult<Address> {
        let security_module = self.get_security_module()?;
        Ok(security_module.handle.deposit_contract(at).await?)
    }
}

fn upsert<T: ?Sized>(slot: &mut Option<Binding<T>>, key: ContractKey, binding: Binding<T>) {
    match slot.as_ref() {
        None => {
            info!(key = %key, address = %to_hex(&binding.address), "[dg-01] Initial address bound");
        }
        Some(existing) if existing.address != binding.address => {
            warn!(
                key = %key,
                previous = %to_hex(&existing.address),
                current = %to_hex(&binding.address),
                "[dg-01] Contract address changed"
            );
        }
        Some(_) => {}
    }
    *slot = Some(binding);
}
