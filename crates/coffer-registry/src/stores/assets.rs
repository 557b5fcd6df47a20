//! Asset repository store

use std::collections::BTreeMap;

use coffer_core::AssetId;

use crate::records::Asset;

/// Live assets keyed by id
///
/// Retiring removes the row outright; the id can be registered again.
#[derive(Debug, Clone, Default)]
pub struct AssetRepository {
    assets: BTreeMap<AssetId, Asset>,
}

impl AssetRepository {
    /// Look up a live asset
    pub fn get(&self, id: &AssetId) -> Option<&Asset> {
        self.assets.get(id)
    }

    /// Whether a live asset is registered under `id`
    pub fn contains(&self, id: &AssetId) -> bool {
        self.assets.contains_key(id)
    }

    /// Live assets in id order
    pub fn iter(&self) -> impl Iterator<Item = &Asset> {
        self.assets.values()
    }

    /// Number of live assets
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// Whether no live assets exist
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Insert or overwrite the row for `asset.id`
    pub(crate) fn put(&mut self, asset: Asset) {
        self.assets.insert(asset.id.clone(), asset);
    }

    pub(crate) fn retire(&mut self, id: &AssetId) -> Option<Asset> {
        self.assets.remove(id)
    }
}
