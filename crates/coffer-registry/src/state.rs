//! Committed registry state: the six keyed stores

use coffer_core::{AccessRequirement, AssetId, EntityKind, Principal, VaultId};

use crate::authorization::{resolve_access, AccessResolution};
use crate::stores::{
    AssetAccessTable, AssetRepository, RevisionHistory, VaultAccessTable, VaultAssetIndex,
    VaultRegistry,
};

/// All committed registry tables
///
/// Every authorization decision is evaluated against this value as it stands
/// at the start of a call; nothing is cached across calls.
#[derive(Debug, Clone, Default)]
pub struct RegistryState {
    /// Vault registry
    pub vaults: VaultRegistry,
    /// Asset repository
    pub assets: AssetRepository,
    /// Revision history
    pub revisions: RevisionHistory,
    /// Vault/asset membership index
    pub index: VaultAssetIndex,
    /// Vault-scoped grants
    pub vault_access: VaultAccessTable,
    /// Asset-scoped grants
    pub asset_access: AssetAccessTable,
}

impl RegistryState {
    /// Resolve a principal's standing on a vault
    pub fn resolve_vault(&self, id: &VaultId, principal: &Principal) -> AccessResolution {
        let owner = self.vaults.get(id).map(|vault| &vault.owner);
        resolve_access(principal, owner, self.vault_access.get(id, principal))
    }

    /// Resolve a principal's standing on an asset
    pub fn resolve_asset(&self, id: &AssetId, principal: &Principal) -> AccessResolution {
        let owner = self.assets.get(id).map(|asset| &asset.owner);
        resolve_access(principal, owner, self.asset_access.get(id, principal))
    }

    /// Resolve a principal's standing on an entity of either kind
    pub fn resolve(&self, kind: EntityKind, id: &str, principal: &Principal) -> AccessResolution {
        match kind {
            EntityKind::Vault => self.resolve_vault(&VaultId::new(id), principal),
            EntityKind::Asset => self.resolve_asset(&AssetId::new(id), principal),
        }
    }

    /// Whether a principal meets `required` on an entity
    pub fn authorize(
        &self,
        kind: EntityKind,
        id: &str,
        principal: &Principal,
        required: AccessRequirement,
    ) -> bool {
        self.resolve(kind, id, principal).satisfies(required)
    }
}
