//! Vault registry store

use std::collections::BTreeMap;

use coffer_core::VaultId;

use crate::records::Vault;

/// Live vaults keyed by id
///
/// Retiring removes the row outright; the id can be registered again.
#[derive(Debug, Clone, Default)]
pub struct VaultRegistry {
    vaults: BTreeMap<VaultId, Vault>,
}

impl VaultRegistry {
    /// Look up a live vault
    pub fn get(&self, id: &VaultId) -> Option<&Vault> {
        self.vaults.get(id)
    }

    /// Whether a live vault is registered under `id`
    pub fn contains(&self, id: &VaultId) -> bool {
        self.vaults.contains_key(id)
    }

    /// Live vaults in id order
    pub fn iter(&self) -> impl Iterator<Item = &Vault> {
        self.vaults.values()
    }

    /// Number of live vaults
    pub fn len(&self) -> usize {
        self.vaults.len()
    }

    /// Whether no live vaults exist
    pub fn is_empty(&self) -> bool {
        self.vaults.is_empty()
    }

    pub(crate) fn insert(&mut self, vault: Vault) {
        self.vaults.insert(vault.id.clone(), vault);
    }

    pub(crate) fn retire(&mut self, id: &VaultId) -> Option<Vault> {
        self.vaults.remove(id)
    }
}
