//! Per-entity access tables
//!
//! Two independent tables share one shape: `(entity, principal) -> tier`.
//! A grant overwrites any earlier grant for the same pair. There is no
//! removal; lowering a principal to `Restricted` is the closest equivalent.

use std::collections::BTreeMap;

use coffer_core::{AssetId, Principal, VaultId};

use crate::records::AccessGrant;

/// Grant table keyed by `(entity id, principal)`
#[derive(Debug, Clone)]
pub struct AccessTable<K: Ord> {
    grants: BTreeMap<(K, Principal), AccessGrant>,
}

/// Vault-scoped grants
pub type VaultAccessTable = AccessTable<VaultId>;

/// Asset-scoped grants
pub type AssetAccessTable = AccessTable<AssetId>;

impl<K: Ord> Default for AccessTable<K> {
    fn default() -> Self {
        Self {
            grants: BTreeMap::new(),
        }
    }
}

impl<K: Ord + Clone> AccessTable<K> {
    /// Look up the grant for one principal on one entity
    pub fn get(&self, entity: &K, principal: &Principal) -> Option<&AccessGrant> {
        self.grants.get(&(entity.clone(), principal.clone()))
    }

    /// Every row in key order
    pub fn iter(&self) -> impl Iterator<Item = (&K, &Principal, &AccessGrant)> {
        self.grants
            .iter()
            .map(|((entity, principal), grant)| (entity, principal, grant))
    }

    /// Number of grant rows
    pub fn len(&self) -> usize {
        self.grants.len()
    }

    /// Whether no grants exist
    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }

    /// Set the grant for a pair, returning the grant it replaced
    pub(crate) fn put(
        &mut self,
        entity: K,
        principal: Principal,
        grant: AccessGrant,
    ) -> Option<AccessGrant> {
        self.grants.insert((entity, principal), grant)
    }
}
