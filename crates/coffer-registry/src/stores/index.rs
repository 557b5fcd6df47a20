//! Many-to-many vault/asset membership index

use std::collections::{BTreeMap, BTreeSet};

use coffer_core::{AssetId, VaultId};

use crate::records::VaultAssetLink;

/// Membership rows keyed by `(vault, asset)` with a reverse `(asset, vault)` index
#[derive(Debug, Clone, Default)]
pub struct VaultAssetIndex {
    links: BTreeMap<(VaultId, AssetId), VaultAssetLink>,
    by_asset: BTreeSet<(AssetId, VaultId)>,
}

impl VaultAssetIndex {
    /// Look up one membership row
    pub fn get(&self, vault: &VaultId, asset: &AssetId) -> Option<&VaultAssetLink> {
        self.links.get(&(vault.clone(), asset.clone()))
    }

    /// Whether the asset is linked into the vault
    pub fn contains(&self, vault: &VaultId, asset: &AssetId) -> bool {
        self.get(vault, asset).is_some()
    }

    /// Assets linked into a vault, in id order
    pub fn assets_in<'a>(&'a self, vault: &'a VaultId) -> impl Iterator<Item = &'a AssetId> + 'a {
        self.links
            .range((vault.clone(), AssetId::new(""))..)
            .take_while(move |((v, _), _)| v == vault)
            .map(|((_, asset), _)| asset)
    }

    /// Vaults an asset is linked into, in id order
    pub fn vaults_of<'a>(&'a self, asset: &'a AssetId) -> impl Iterator<Item = &'a VaultId> + 'a {
        self.by_asset
            .range((asset.clone(), VaultId::new(""))..)
            .take_while(move |(a, _)| a == asset)
            .map(|(_, vault)| vault)
    }

    /// Every row in key order
    pub fn iter(&self) -> impl Iterator<Item = (&VaultId, &AssetId, &VaultAssetLink)> {
        self.links
            .iter()
            .map(|((vault, asset), link)| (vault, asset, link))
    }

    /// Number of membership rows
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Whether no rows exist
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Insert a row unless one is already present
    ///
    /// Returns `true` when a row was added. An existing row keeps its original
    /// `enrolled_at`.
    pub(crate) fn insert(&mut self, vault: VaultId, asset: AssetId, link: VaultAssetLink) -> bool {
        let key = (vault, asset);
        if self.links.contains_key(&key) {
            return false;
        }
        self.by_asset.insert((key.1.clone(), key.0.clone()));
        self.links.insert(key, link);
        true
    }

    /// Remove a row if present; returns `true` when a row was removed
    pub(crate) fn remove(&mut self, vault: &VaultId, asset: &AssetId) -> bool {
        let removed = self.links.remove(&(vault.clone(), asset.clone())).is_some();
        if removed {
            self.by_asset.remove(&(asset.clone(), vault.clone()));
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coffer_core::OrdinalTime;

    fn link(at: u64) -> VaultAssetLink {
        VaultAssetLink {
            enrolled_at: OrdinalTime::new(at),
        }
    }

    #[test]
    fn test_insert_is_idempotent() {
        let mut index = VaultAssetIndex::default();
        let (v, a) = (VaultId::new("v1"), AssetId::new("a1"));
        assert!(index.insert(v.clone(), a.clone(), link(1)));
        assert!(!index.insert(v.clone(), a.clone(), link(5)));
        assert_eq!(index.get(&v, &a), Some(&link(1)));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_both_directions_enumerate() {
        let mut index = VaultAssetIndex::default();
        index.insert(VaultId::new("v1"), AssetId::new("a1"), link(1));
        index.insert(VaultId::new("v1"), AssetId::new("a2"), link(2));
        index.insert(VaultId::new("v10"), AssetId::new("a1"), link(3));

        let v1 = VaultId::new("v1");
        let assets: Vec<_> = index.assets_in(&v1).map(AssetId::as_str).collect();
        assert_eq!(assets, vec!["a1", "a2"]);

        let a1 = AssetId::new("a1");
        let vaults: Vec<_> = index.vaults_of(&a1).map(VaultId::as_str).collect();
        assert_eq!(vaults, vec!["v1", "v10"]);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut index = VaultAssetIndex::default();
        assert!(!index.remove(&VaultId::new("v1"), &AssetId::new("a1")));
        index.insert(VaultId::new("v1"), AssetId::new("a1"), link(1));
        assert!(index.remove(&VaultId::new("v1"), &AssetId::new("a1")));
        assert_eq!(index.vaults_of(&AssetId::new("a1")).count(), 0);
    }
}
