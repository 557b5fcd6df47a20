//! Mutating registry operations
//!
//! Each operation checks existence, then authorization, then parameters,
//! staging writes as it goes; the buffer is committed only at the end.
//! Creating operations validate parameters before checking uniqueness.

use coffer_core::{
    AccessRequirement, AssetId, CallContext, EntityKind, Principal, RegistryError,
    RegistryResult, Tier, VaultId,
};

use crate::journal::RegistryFact;
use crate::records::{
    AccessGrant, Asset, Enrollment, Revision, RevisionRecord, Vault, VaultAssetLink,
};
use crate::registry::Registry;
use crate::staging::{StagedWrite, StagedWrites};

const CONTRIBUTOR: AccessRequirement = AccessRequirement::AtLeast(Tier::Contributor);

impl Registry {
    /// Create a vault owned by the caller
    ///
    /// Anyone may establish a vault. Fails with `AlreadyExists` only while a
    /// live vault holds the id; a retired id is free again, and any rows
    /// orphaned under it apply to the new vault.
    pub fn establish_vault(
        &mut self,
        ctx: &CallContext,
        id: &str,
        name: &str,
        note: Option<&str>,
    ) -> RegistryResult<()> {
        let limits = &self.config.limits;
        let vault_id = VaultId::parse(id, limits.max_vault_id_len)?;
        self.check_text("vault name", name, limits.max_text_len, false)?;
        self.check_optional_text("vault note", note)?;

        if self.state.vaults.contains(&vault_id) {
            return Err(RegistryError::already_exists(EntityKind::Vault, id));
        }

        let mut staged = StagedWrites::new();
        staged
            .stage(StagedWrite::InsertVault(Vault {
                id: vault_id.clone(),
                name: name.to_string(),
                owner: ctx.caller.clone(),
                established_at: ctx.at,
                note: note.map(str::to_string),
            }))
            .record(RegistryFact::VaultEstablished {
                vault_id,
                name: name.to_string(),
            });
        self.commit(ctx, staged);

        tracing::debug!(caller = %ctx.caller, vault_id = id, at = %ctx.at, "Vault established");
        Ok(())
    }

    /// Delete a vault; owner only
    ///
    /// Memberships and grants that reference the vault are left in place.
    pub fn retire_vault(&mut self, ctx: &CallContext, id: &str) -> RegistryResult<()> {
        let vault_id = VaultId::new(id);
        if !self.state.vaults.contains(&vault_id) {
            return Err(RegistryError::vault_not_found(id));
        }
        let standing = self.state.resolve_vault(&vault_id, &ctx.caller);
        Self::require(ctx, EntityKind::Vault, id, standing, AccessRequirement::Owner)?;

        let mut staged = StagedWrites::new();
        staged
            .stage(StagedWrite::RetireVault(vault_id.clone()))
            .record(RegistryFact::VaultRetired { vault_id });
        self.commit(ctx, staged);

        tracing::debug!(caller = %ctx.caller, vault_id = id, at = %ctx.at, "Vault retired");
        Ok(())
    }

    /// Register an asset owned by the caller, recording iteration 1
    ///
    /// Fails with `AlreadyExists` only while a live asset holds the id.
    /// Enrolling a retired id opens a fresh history generation, so the new
    /// asset starts at iteration 1 and earlier revisions stay readable
    /// through [`Registry::read_revision_in`].
    pub fn enroll_asset(&mut self, ctx: &CallContext, enrollment: Enrollment) -> RegistryResult<()> {
        let limits = &self.config.limits;
        let asset_id = AssetId::parse(&enrollment.id, limits.max_asset_id_len)?;
        self.check_text("asset title", &enrollment.title, limits.max_text_len, false)?;
        self.check_text(
            "asset category",
            &enrollment.category,
            limits.max_category_len,
            false,
        )?;
        self.check_text(
            "location reference",
            &enrollment.location_ref,
            limits.max_text_len,
            false,
        )?;
        self.check_optional_text("asset info", enrollment.info.as_deref())?;

        if self.state.assets.contains(&asset_id) {
            return Err(RegistryError::already_exists(
                EntityKind::Asset,
                &enrollment.id,
            ));
        }
        let generation = self.state.revisions.next_generation(&asset_id);

        let asset = Asset {
            id: asset_id.clone(),
            title: enrollment.title,
            info: enrollment.info,
            category: enrollment.category,
            location_ref: enrollment.location_ref,
            hash_digest: enrollment.hash_digest,
            owner: ctx.caller.clone(),
            created_at: ctx.at,
            updated_at: ctx.at,
            size: enrollment.size,
            version_count: 1,
            generation,
        };
        let initial = RevisionRecord {
            hash_digest: asset.hash_digest,
            location_ref: asset.location_ref.clone(),
            timestamp: ctx.at,
            agent: ctx.caller.clone(),
            note: Some(self.config.history.initial_note.clone()),
        };

        let mut staged = StagedWrites::new();
        staged
            .stage(StagedWrite::AppendRevision {
                asset_id: asset_id.clone(),
                generation,
                iteration: 1,
                record: initial,
            })
            .record(RegistryFact::AssetEnrolled {
                asset_id: asset_id.clone(),
                generation,
                hash_digest: asset.hash_digest,
            })
            .stage(StagedWrite::PutAsset(asset));
        self.commit(ctx, staged);

        tracing::debug!(
            caller = %ctx.caller,
            asset_id = %asset_id,
            generation,
            at = %ctx.at,
            "Asset enrolled"
        );
        Ok(())
    }

    /// Overwrite an asset's current version and append a history entry
    ///
    /// Allowed for the owner and for principals holding `Contributor` or
    /// higher on the asset. Returns the new iteration number.
    pub fn publish_revision(
        &mut self,
        ctx: &CallContext,
        id: &str,
        revision: Revision,
    ) -> RegistryResult<u32> {
        let asset_id = AssetId::new(id);
        let Some(current) = self.state.assets.get(&asset_id) else {
            return Err(RegistryError::asset_not_found(id));
        };
        let standing = self.state.resolve_asset(&asset_id, &ctx.caller);
        Self::require(ctx, EntityKind::Asset, id, standing, CONTRIBUTOR)?;

        let limits = &self.config.limits;
        self.check_text("asset title", &revision.title, limits.max_text_len, false)?;
        self.check_text(
            "location reference",
            &revision.location_ref,
            limits.max_text_len,
            false,
        )?;
        self.check_optional_text("asset info", revision.info.as_deref())?;
        self.check_optional_text("revision note", revision.note.as_deref())?;

        let next_version = current
            .version_count
            .checked_add(1)
            .ok_or_else(|| RegistryError::invalid_params("asset version count exhausted"))?;

        let updated = Asset {
            title: revision.title,
            info: revision.info,
            location_ref: revision.location_ref.clone(),
            hash_digest: revision.hash_digest,
            size: revision.size,
            updated_at: ctx.at,
            version_count: next_version,
            ..current.clone()
        };
        let record = RevisionRecord {
            hash_digest: revision.hash_digest,
            location_ref: revision.location_ref,
            timestamp: ctx.at,
            agent: ctx.caller.clone(),
            note: revision.note,
        };

        let mut staged = StagedWrites::new();
        staged
            .stage(StagedWrite::PutAsset(updated))
            .stage(StagedWrite::AppendRevision {
                asset_id: asset_id.clone(),
                generation: current.generation,
                iteration: next_version,
                record,
            })
            .record(RegistryFact::RevisionPublished {
                asset_id,
                iteration: next_version,
                hash_digest: revision.hash_digest,
            });
        self.commit(ctx, staged);

        tracing::debug!(
            caller = %ctx.caller,
            asset_id = id,
            iteration = next_version,
            at = %ctx.at,
            "Revision published"
        );
        Ok(next_version)
    }

    /// Delete an asset's repository row; owner only
    ///
    /// History, grants and vault memberships are left in place.
    pub fn retire_asset(&mut self, ctx: &CallContext, id: &str) -> RegistryResult<()> {
        let asset_id = AssetId::new(id);
        if !self.state.assets.contains(&asset_id) {
            return Err(RegistryError::asset_not_found(id));
        }
        let standing = self.state.resolve_asset(&asset_id, &ctx.caller);
        Self::require(ctx, EntityKind::Asset, id, standing, AccessRequirement::Owner)?;

        let mut staged = StagedWrites::new();
        staged
            .stage(StagedWrite::RetireAsset(asset_id.clone()))
            .record(RegistryFact::AssetRetired { asset_id });
        self.commit(ctx, staged);

        tracing::debug!(caller = %ctx.caller, asset_id = id, at = %ctx.at, "Asset retired");
        Ok(())
    }

    /// Link an asset into a vault
    ///
    /// Requires owner-or-`Contributor` on both the asset and the vault.
    /// Attaching an existing link succeeds without changing it.
    pub fn attach_asset_to_vault(
        &mut self,
        ctx: &CallContext,
        vault_id: &str,
        asset_id: &str,
    ) -> RegistryResult<()> {
        let (vault, asset) = self.require_pair(vault_id, asset_id)?;

        let asset_standing = self.state.resolve_asset(&asset, &ctx.caller);
        Self::require(ctx, EntityKind::Asset, asset_id, asset_standing, CONTRIBUTOR)?;
        let vault_standing = self.state.resolve_vault(&vault, &ctx.caller);
        Self::require(ctx, EntityKind::Vault, vault_id, vault_standing, CONTRIBUTOR)?;

        let created = !self.state.index.contains(&vault, &asset);
        let mut staged = StagedWrites::new();
        if created {
            staged.stage(StagedWrite::InsertLink {
                vault_id: vault.clone(),
                asset_id: asset.clone(),
                link: VaultAssetLink {
                    enrolled_at: ctx.at,
                },
            });
        }
        staged.record(RegistryFact::AssetAttached {
            vault_id: vault,
            asset_id: asset,
            created,
        });
        self.commit(ctx, staged);

        tracing::debug!(
            caller = %ctx.caller,
            vault_id,
            asset_id,
            created,
            at = %ctx.at,
            "Asset attached to vault"
        );
        Ok(())
    }

    /// Unlink an asset from a vault
    ///
    /// Requires owner-or-`Contributor` on either the asset or the vault.
    /// Detaching a pair that was never linked succeeds without a change.
    pub fn remove_asset_from_vault(
        &mut self,
        ctx: &CallContext,
        vault_id: &str,
        asset_id: &str,
    ) -> RegistryResult<()> {
        let (vault, asset) = self.require_pair(vault_id, asset_id)?;

        let asset_standing = self.state.resolve_asset(&asset, &ctx.caller);
        if !asset_standing.satisfies(CONTRIBUTOR) {
            let vault_standing = self.state.resolve_vault(&vault, &ctx.caller);
            Self::require(ctx, EntityKind::Vault, vault_id, vault_standing, CONTRIBUTOR)?;
        }

        let removed = self.state.index.contains(&vault, &asset);
        let mut staged = StagedWrites::new();
        if removed {
            staged.stage(StagedWrite::RemoveLink {
                vault_id: vault.clone(),
                asset_id: asset.clone(),
            });
        }
        staged.record(RegistryFact::AssetDetached {
            vault_id: vault,
            asset_id: asset,
            removed,
        });
        self.commit(ctx, staged);

        tracing::debug!(
            caller = %ctx.caller,
            vault_id,
            asset_id,
            removed,
            at = %ctx.at,
            "Asset removed from vault"
        );
        Ok(())
    }

    /// Set a principal's tier on a vault; vault owner only
    ///
    /// `tier` is a raw ordinal so out-of-range values surface as `InvalidTier`.
    pub fn grant_vault_access(
        &mut self,
        ctx: &CallContext,
        vault_id: &str,
        principal: &Principal,
        tier: u8,
    ) -> RegistryResult<()> {
        let vault = VaultId::new(vault_id);
        if !self.state.vaults.contains(&vault) {
            return Err(RegistryError::vault_not_found(vault_id));
        }
        let standing = self.state.resolve_vault(&vault, &ctx.caller);
        Self::require(ctx, EntityKind::Vault, vault_id, standing, AccessRequirement::Owner)?;
        let tier = Tier::try_from(tier)?;

        let mut staged = StagedWrites::new();
        staged
            .stage(StagedWrite::PutVaultGrant {
                vault_id: vault.clone(),
                principal: principal.clone(),
                grant: AccessGrant { tier },
            })
            .record(RegistryFact::VaultAccessGranted {
                vault_id: vault,
                principal: principal.clone(),
                tier,
            });
        self.commit(ctx, staged);

        tracing::debug!(
            caller = %ctx.caller,
            vault_id,
            grantee = %principal,
            tier = %tier,
            "Vault access granted"
        );
        Ok(())
    }

    /// Set a principal's tier on an asset; asset owner only
    pub fn grant_asset_access(
        &mut self,
        ctx: &CallContext,
        asset_id: &str,
        principal: &Principal,
        tier: u8,
    ) -> RegistryResult<()> {
        let asset = AssetId::new(asset_id);
        if !self.state.assets.contains(&asset) {
            return Err(RegistryError::asset_not_found(asset_id));
        }
        let standing = self.state.resolve_asset(&asset, &ctx.caller);
        Self::require(ctx, EntityKind::Asset, asset_id, standing, AccessRequirement::Owner)?;
        let tier = Tier::try_from(tier)?;

        let mut staged = StagedWrites::new();
        staged
            .stage(StagedWrite::PutAssetGrant {
                asset_id: asset.clone(),
                principal: principal.clone(),
                grant: AccessGrant { tier },
            })
            .record(RegistryFact::AssetAccessGranted {
                asset_id: asset,
                principal: principal.clone(),
                tier,
            });
        self.commit(ctx, staged);

        tracing::debug!(
            caller = %ctx.caller,
            asset_id,
            grantee = %principal,
            tier = %tier,
            "Asset access granted"
        );
        Ok(())
    }

    /// Existence checks shared by attach and detach, asset first
    fn require_pair(&self, vault_id: &str, asset_id: &str) -> RegistryResult<(VaultId, AssetId)> {
        let asset = AssetId::new(asset_id);
        if !self.state.assets.contains(&asset) {
            return Err(RegistryError::asset_not_found(asset_id));
        }
        let vault = VaultId::new(vault_id);
        if !self.state.vaults.contains(&vault) {
            return Err(RegistryError::vault_not_found(vault_id));
        }
        Ok((vault, asset))
    }
}
