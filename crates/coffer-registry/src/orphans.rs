//! Orphaned row reporting
//!
//! Retiring a vault or asset never cascades. Memberships, grants and revision
//! history that referenced it stay in their stores as an audit trail. A row
//! is orphaned exactly when no live vault or asset holds its id, so rows left
//! by a retired id stop being reported once the id is registered again. This
//! module only finds them; it never removes anything.

use std::collections::BTreeSet;

use coffer_core::{AssetId, Principal, VaultId};
use serde::{Deserialize, Serialize};

use crate::state::RegistryState;

/// Rows whose vault or asset is no longer registered
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrphanReport {
    /// Membership rows with a missing vault or asset
    pub links: Vec<(VaultId, AssetId)>,
    /// Vault grants on missing vaults
    pub vault_grants: Vec<(VaultId, Principal)>,
    /// Asset grants on missing assets
    pub asset_grants: Vec<(AssetId, Principal)>,
    /// Assets with recorded history but no repository row
    pub histories: Vec<AssetId>,
}

impl OrphanReport {
    /// Scan every store
    pub fn collect(state: &RegistryState) -> Self {
        let links = state
            .index
            .iter()
            .filter(|(vault, asset, _)| {
                !state.vaults.contains(vault) || !state.assets.contains(asset)
            })
            .map(|(vault, asset, _)| (vault.clone(), asset.clone()))
            .collect();

        let vault_grants = state
            .vault_access
            .iter()
            .filter(|(vault, _, _)| !state.vaults.contains(vault))
            .map(|(vault, principal, _)| (vault.clone(), principal.clone()))
            .collect();

        let asset_grants = state
            .asset_access
            .iter()
            .filter(|(asset, _, _)| !state.assets.contains(asset))
            .map(|(asset, principal, _)| (asset.clone(), principal.clone()))
            .collect();

        let histories = state
            .revisions
            .iter()
            .map(|(asset, _, _, _)| asset)
            .filter(|asset| !state.assets.contains(asset))
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        Self {
            links,
            vault_grants,
            asset_grants,
            histories,
        }
    }

    /// Whether nothing is orphaned
    pub fn is_clean(&self) -> bool {
        self.links.is_empty()
            && self.vault_grants.is_empty()
            && self.asset_grants.is_empty()
            && self.histories.is_empty()
    }
}
