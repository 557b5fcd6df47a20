//! Read-side registry queries
//!
//! Lookups are ungated: finer read gating belongs to whatever serves these
//! results. The `verify_*` helpers answer tier questions for that layer.

use coffer_core::{AccessRequirement, AssetId, EntityKind, Principal, Tier, VaultId};

use crate::authorization::AccessResolution;
use crate::orphans::OrphanReport;
use crate::records::{AccessGrant, Asset, RevisionRecord, Vault, VaultAssetLink};
use crate::registry::Registry;

impl Registry {
    /// Look up a live vault
    pub fn read_vault(&self, id: &str) -> Option<&Vault> {
        self.state.vaults.get(&VaultId::new(id))
    }

    /// Look up a live asset
    pub fn read_asset(&self, id: &str) -> Option<&Asset> {
        self.state.assets.get(&AssetId::new(id))
    }

    /// Look up one revision of the current generation; retired assets keep
    /// their history
    pub fn read_revision(&self, id: &str, iteration: u32) -> Option<&RevisionRecord> {
        self.state.revisions.get(&AssetId::new(id), iteration)
    }

    /// Look up one revision of an earlier enrollment of a reused id
    pub fn read_revision_in(
        &self,
        id: &str,
        generation: u32,
        iteration: u32,
    ) -> Option<&RevisionRecord> {
        self.state
            .revisions
            .get_in(&AssetId::new(id), generation, iteration)
    }

    /// Most recent history generation recorded under an asset id
    pub fn history_generation(&self, id: &str) -> Option<u32> {
        self.state.revisions.current_generation(&AssetId::new(id))
    }

    /// Current-generation revisions of an asset in iteration order
    pub fn revision_history(&self, id: &str) -> Vec<(u32, &RevisionRecord)> {
        self.state.revisions.history(&AssetId::new(id)).collect()
    }

    /// Membership row for a pair, if linked
    pub fn link(&self, vault_id: &str, asset_id: &str) -> Option<&VaultAssetLink> {
        self.state
            .index
            .get(&VaultId::new(vault_id), &AssetId::new(asset_id))
    }

    /// Assets linked into a vault
    pub fn vault_assets(&self, vault_id: &str) -> Vec<AssetId> {
        let vault = VaultId::new(vault_id);
        self.state.index.assets_in(&vault).cloned().collect()
    }

    /// Vaults an asset is linked into
    pub fn asset_vaults(&self, asset_id: &str) -> Vec<VaultId> {
        let asset = AssetId::new(asset_id);
        self.state.index.vaults_of(&asset).cloned().collect()
    }

    /// Raw vault grant row
    pub fn vault_grant(&self, vault_id: &str, principal: &Principal) -> Option<AccessGrant> {
        self.state
            .vault_access
            .get(&VaultId::new(vault_id), principal)
            .copied()
    }

    /// Raw asset grant row
    pub fn asset_grant(&self, asset_id: &str, principal: &Principal) -> Option<AccessGrant> {
        self.state
            .asset_access
            .get(&AssetId::new(asset_id), principal)
            .copied()
    }

    /// Resolve a principal's standing on an entity
    pub fn effective_tier(
        &self,
        kind: EntityKind,
        id: &str,
        principal: &Principal,
    ) -> AccessResolution {
        self.state.resolve(kind, id, principal)
    }

    /// Whether a principal's standing on an entity meets `required`
    pub fn authorize(
        &self,
        kind: EntityKind,
        id: &str,
        principal: &Principal,
        required: Tier,
    ) -> bool {
        self.state
            .authorize(kind, id, principal, AccessRequirement::AtLeast(required))
    }

    /// Whether a principal may read an asset (`Observer` or above)
    pub fn verify_read_access(&self, asset_id: &str, principal: &Principal) -> bool {
        self.authorize(EntityKind::Asset, asset_id, principal, Tier::Observer)
    }

    /// Whether a principal may revise an asset (`Contributor` or above)
    pub fn verify_write_access(&self, asset_id: &str, principal: &Principal) -> bool {
        self.authorize(EntityKind::Asset, asset_id, principal, Tier::Contributor)
    }

    /// Whether a principal administers a vault (`Steward` or owner)
    pub fn verify_admin_access(&self, vault_id: &str, principal: &Principal) -> bool {
        self.authorize(EntityKind::Vault, vault_id, principal, Tier::Steward)
    }

    /// Rows left behind by retired vaults and assets
    pub fn orphan_report(&self) -> OrphanReport {
        OrphanReport::collect(&self.state)
    }
}
