//! Nullable registry authority.

use permit_ledger::RegistryAuthority;
use permit_types::{AssetId, RegistryId};
use std::cell::Cell;
use std::collections::{HashMap, HashSet};

/// A scriptable [`RegistryAuthority`] for testing.
///
/// Unlike the production bindings, authorization and asset binding are set
/// independently, so tests can model a registry that passes the access
/// check but has no asset.
#[derive(Debug, Default)]
pub struct NullAuthority {
    authorized: HashSet<RegistryId>,
    assets: HashMap<RegistryId, AssetId>,
    checks: Cell<u64>,
}

impl NullAuthority {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`authorize`](Self::authorize).
    pub fn with_registry(mut self, registry: RegistryId, asset: AssetId) -> Self {
        self.authorize(registry, asset);
        self
    }

    /// Authorize `registry` and bind it to `asset`.
    pub fn authorize(&mut self, registry: RegistryId, asset: AssetId) {
        self.authorized.insert(registry);
        self.assets.insert(registry, asset);
    }

    /// Authorize `registry` without binding an asset.
    pub fn authorize_unbound(&mut self, registry: RegistryId) {
        self.authorized.insert(registry);
        self.assets.remove(&registry);
    }

    /// Withdraw authorization but keep the asset binding visible to queries.
    pub fn revoke(&mut self, registry: &RegistryId) {
        self.authorized.remove(registry);
    }

    /// How many access checks the ledger has made.
    pub fn checks(&self) -> u64 {
        self.checks.get()
    }
}

impl RegistryAuthority for NullAuthority {
    fn is_authorized_caller(&self, caller: &RegistryId) -> bool {
        self.checks.set(self.checks.get() + 1);
        self.authorized.contains(caller)
    }

    fn bound_asset(&self, registry: &RegistryId) -> Option<AssetId> {
        self.assets.get(registry).copied()
    }
}
