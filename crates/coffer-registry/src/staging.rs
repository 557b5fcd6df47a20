//! Per-call write buffer
//!
//! Operations run every read and check against committed state first and
//! stage their writes here. Nothing reaches the stores until the operation
//! hands a complete buffer to [`StagedWrites::apply`]; a call that returns
//! early drops the buffer and leaves state untouched. Applying is infallible.

use coffer_core::{AssetId, Principal, VaultId};

use crate::journal::RegistryFact;
use crate::records::{AccessGrant, Asset, RevisionRecord, Vault, VaultAssetLink};
use crate::state::RegistryState;

/// One pending store mutation
#[derive(Debug, Clone)]
pub(crate) enum StagedWrite {
    InsertVault(Vault),
    RetireVault(VaultId),
    PutAsset(Asset),
    RetireAsset(AssetId),
    AppendRevision {
        asset_id: AssetId,
        generation: u32,
        iteration: u32,
        record: RevisionRecord,
    },
    InsertLink {
        vault_id: VaultId,
        asset_id: AssetId,
        link: VaultAssetLink,
    },
    RemoveLink {
        vault_id: VaultId,
        asset_id: AssetId,
    },
    PutVaultGrant {
        vault_id: VaultId,
        principal: Principal,
        grant: AccessGrant,
    },
    PutAssetGrant {
        asset_id: AssetId,
        principal: Principal,
        grant: AccessGrant,
    },
}

/// Writes and facts accumulated by one call
#[derive(Debug, Default)]
pub(crate) struct StagedWrites {
    writes: Vec<StagedWrite>,
    facts: Vec<RegistryFact>,
}

impl StagedWrites {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn stage(&mut self, write: StagedWrite) -> &mut Self {
        self.writes.push(write);
        self
    }

    pub(crate) fn record(&mut self, fact: RegistryFact) -> &mut Self {
        self.facts.push(fact);
        self
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.writes.len()
    }

    /// Apply every staged write, returning the facts to journal
    pub(crate) fn apply(self, state: &mut RegistryState) -> Vec<RegistryFact> {
        for write in self.writes {
            match write {
                StagedWrite::InsertVault(vault) => state.vaults.insert(vault),
                StagedWrite::RetireVault(id) => {
                    state.vaults.retire(&id);
                }
                StagedWrite::PutAsset(asset) => state.assets.put(asset),
                StagedWrite::RetireAsset(id) => {
                    state.assets.retire(&id);
                }
                StagedWrite::AppendRevision {
                    asset_id,
                    generation,
                    iteration,
                    record,
                } => state.revisions.append(asset_id, generation, iteration, record),
                StagedWrite::InsertLink {
                    vault_id,
                    asset_id,
                    link,
                } => {
                    state.index.insert(vault_id, asset_id, link);
                }
                StagedWrite::RemoveLink { vault_id, asset_id } => {
                    state.index.remove(&vault_id, &asset_id);
                }
                StagedWrite::PutVaultGrant {
                    vault_id,
                    principal,
                    grant,
                } => {
                    state.vault_access.put(vault_id, principal, grant);
                }
                StagedWrite::PutAssetGrant {
                    asset_id,
                    principal,
                    grant,
                } => {
                    state.asset_access.put(asset_id, principal, grant);
                }
            }
        }
        self.facts
    }
}
