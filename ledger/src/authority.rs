//! The registry authority seam.
//!
//! The ledger never decides on its own who may mutate it or which asset a
//! registry governs. Both answers come from a [`RegistryAuthority`] injected
//! at construction, so embedders and tests can substitute their own.

use std::collections::HashMap;

use tracing::info;

use permit_types::{AssetId, RegistryId};

use crate::error::LedgerError;

/// Access control and asset lookup consumed by the approval ledger.
pub trait RegistryAuthority {
    /// Whether `caller` is a registry allowed to mutate the ledger.
    fn is_authorized_caller(&self, caller: &RegistryId) -> bool;

    /// The asset governed by `registry`, if it is bound to one.
    fn bound_asset(&self, registry: &RegistryId) -> Option<AssetId>;
}

impl<T: RegistryAuthority + ?Sized> RegistryAuthority for &T {
    fn is_authorized_caller(&self, caller: &RegistryId) -> bool {
        (**self).is_authorized_caller(caller)
    }

    fn bound_asset(&self, registry: &RegistryId) -> Option<AssetId> {
        (**self).bound_asset(registry)
    }
}

impl<T: RegistryAuthority + ?Sized> RegistryAuthority for Box<T> {
    fn is_authorized_caller(&self, caller: &RegistryId) -> bool {
        (**self).is_authorized_caller(caller)
    }

    fn bound_asset(&self, registry: &RegistryId) -> Option<AssetId> {
        (**self).bound_asset(registry)
    }
}

/// In-memory registry bindings: a registry is authorized exactly while it is
/// bound to an asset.
#[derive(Clone, Debug, Default)]
pub struct ComplianceBindings {
    bound: HashMap<RegistryId, AssetId>,
}

impl ComplianceBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `registry` to the asset it governs.
    pub fn bind(&mut self, registry: RegistryId, asset: AssetId) -> Result<(), LedgerError> {
        if self.bound.contains_key(&registry) {
            return Err(LedgerError::AlreadyBound(registry));
        }
        self.bound.insert(registry, asset);
        info!(registry = %registry, asset = %asset, "registry bound");
        Ok(())
    }

    /// Remove a binding. Approvals recorded under the registry stay in the
    /// ledger but can no longer be mutated by it.
    pub fn unbind(&mut self, registry: &RegistryId) -> Result<AssetId, LedgerError> {
        let asset = self
            .bound
            .remove(registry)
            .ok_or(LedgerError::NotBound(*registry))?;
        info!(registry = %registry, "registry unbound");
        Ok(asset)
    }

    pub fn is_bound(&self, registry: &RegistryId) -> bool {
        self.bound.contains_key(registry)
    }

    pub fn len(&self) -> usize {
        self.bound.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bound.is_empty()
    }
}

impl RegistryAuthority for ComplianceBindings {
    fn is_authorized_caller(&self, caller: &RegistryId) -> bool {
        self.is_bound(caller)
    }

    fn bound_asset(&self, registry: &RegistryId) -> Option<AssetId> {
        self.bound.get(registry).copied()
    }
}
