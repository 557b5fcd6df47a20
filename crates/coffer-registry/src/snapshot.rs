//! Registry snapshots
//!
//! A snapshot is a flat, serde-friendly copy of every store and the journal.
//! Restoring re-checks the invariants the operation layer maintains, so a
//! hand-edited or truncated snapshot is rejected instead of loaded.

use std::collections::BTreeSet;

use coffer_core::{AssetId, ConfigError, OrdinalTime, Principal, RegistryConfig, VaultId};
use serde::{Deserialize, Serialize};

use crate::journal::{AuditJournal, JournalEntry, JournalError};
use crate::records::{AccessGrant, Asset, RevisionRecord, Vault, VaultAssetLink};
use crate::registry::Registry;
use crate::state::RegistryState;

/// Snapshot schema version
pub const SNAPSHOT_FORMAT_VERSION: u16 = 1;

/// Snapshot export and restore failures
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// JSON encoding or decoding failed
    #[error("Snapshot serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Snapshot was written by an unknown schema version
    #[error("Unsupported snapshot format version {found} (expected {expected})")]
    UnsupportedVersion {
        /// Version found in the snapshot
        found: u16,
        /// Version this build reads
        expected: u16,
    },

    /// Stored rows violate a registry invariant
    #[error("Snapshot invariant violated: {0}")]
    Invariant(String),

    /// Journal chain does not verify
    #[error(transparent)]
    Journal(#[from] JournalError),

    /// Configuration supplied for the restored registry is invalid
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// One revision history row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionRow {
    /// Asset the revision belongs to
    pub asset_id: AssetId,
    /// Enrollment generation of the asset id
    pub generation: u32,
    /// Iteration number
    pub iteration: u32,
    /// Stored record
    pub record: RevisionRecord,
}

/// One membership row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRow {
    /// Vault side
    pub vault_id: VaultId,
    /// Asset side
    pub asset_id: AssetId,
    /// Stored link
    pub link: VaultAssetLink,
}

/// One grant row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantRow<K> {
    /// Entity the grant applies to
    pub entity: K,
    /// Grantee
    pub principal: Principal,
    /// Stored grant
    pub grant: AccessGrant,
}

/// Flat copy of all registry state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    /// Schema version
    pub format_version: u16,
    /// Highest committed ordinal time
    pub last_committed: OrdinalTime,
    /// Live vaults
    pub vaults: Vec<Vault>,
    /// Live assets
    pub assets: Vec<Asset>,
    /// Revision history
    pub revisions: Vec<RevisionRow>,
    /// Membership index
    pub links: Vec<LinkRow>,
    /// Vault-scoped grants
    pub vault_grants: Vec<GrantRow<VaultId>>,
    /// Asset-scoped grants
    pub asset_grants: Vec<GrantRow<AssetId>>,
    /// Audit journal
    pub journal: Vec<JournalEntry>,
}

impl RegistrySnapshot {
    /// Encode as pretty JSON
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Decode from JSON
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Registry {
    /// Copy all committed state into a snapshot
    pub fn snapshot(&self) -> RegistrySnapshot {
        let state = &self.state;
        RegistrySnapshot {
            format_version: SNAPSHOT_FORMAT_VERSION,
            last_committed: self.last_committed,
            vaults: state.vaults.iter().cloned().collect(),
            assets: state.assets.iter().cloned().collect(),
            revisions: state
                .revisions
                .iter()
                .map(|(asset_id, generation, iteration, record)| RevisionRow {
                    asset_id: asset_id.clone(),
                    generation,
                    iteration,
                    record: record.clone(),
                })
                .collect(),
            links: state
                .index
                .iter()
                .map(|(vault_id, asset_id, link)| LinkRow {
                    vault_id: vault_id.clone(),
                    asset_id: asset_id.clone(),
                    link: *link,
                })
                .collect(),
            vault_grants: state
                .vault_access
                .iter()
                .map(|(entity, principal, grant)| GrantRow {
                    entity: entity.clone(),
                    principal: principal.clone(),
                    grant: *grant,
                })
                .collect(),
            asset_grants: state
                .asset_access
                .iter()
                .map(|(entity, principal, grant)| GrantRow {
                    entity: entity.clone(),
                    principal: principal.clone(),
                    grant: *grant,
                })
                .collect(),
            journal: self.journal.entries().to_vec(),
        }
    }

    /// Rebuild a registry from a snapshot after checking its invariants
    pub fn restore(config: RegistryConfig, snapshot: RegistrySnapshot) -> Result<Self, SnapshotError> {
        config.validate()?;
        if snapshot.format_version != SNAPSHOT_FORMAT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: snapshot.format_version,
                expected: SNAPSHOT_FORMAT_VERSION,
            });
        }

        let journal = AuditJournal::from_entries(snapshot.journal)?;
        let mut state = RegistryState::default();

        for vault in snapshot.vaults {
            if state.vaults.contains(&vault.id) {
                return Err(invariant(format!("duplicate vault '{}'", vault.id)));
            }
            state.vaults.insert(vault);
        }

        for asset in snapshot.assets {
            if state.assets.contains(&asset.id) {
                return Err(invariant(format!("duplicate asset '{}'", asset.id)));
            }
            if asset.version_count == 0 {
                return Err(invariant(format!("asset '{}' has no versions", asset.id)));
            }
            state.assets.put(asset);
        }

        let mut revisions = snapshot.revisions;
        revisions.sort_by(|a, b| {
            (&a.asset_id, a.generation, a.iteration).cmp(&(&b.asset_id, b.generation, b.iteration))
        });
        for row in revisions {
            let history = &state.revisions;
            let in_sequence = if row.iteration == 1 {
                row.generation == history.next_generation(&row.asset_id)
            } else {
                history.current_generation(&row.asset_id) == Some(row.generation)
                    && history.latest_in(&row.asset_id, row.generation) == Some(row.iteration - 1)
            };
            if !in_sequence {
                return Err(invariant(format!(
                    "asset '{}' history jumps to generation {} iteration {}",
                    row.asset_id, row.generation, row.iteration
                )));
            }
            state
                .revisions
                .append(row.asset_id, row.generation, row.iteration, row.record);
        }
        for asset in state.assets.iter() {
            let current = state.revisions.current_generation(&asset.id);
            if current != Some(asset.generation) {
                return Err(invariant(format!(
                    "asset '{}' is bound to generation {} but history is at {:?}",
                    asset.id, asset.generation, current
                )));
            }
            let latest = state.revisions.latest_iteration(&asset.id).unwrap_or(0);
            if latest != asset.version_count {
                return Err(invariant(format!(
                    "asset '{}' has version count {} but {} recorded revisions",
                    asset.id, asset.version_count, latest
                )));
            }
        }

        let mut seen_links = BTreeSet::new();
        for row in snapshot.links {
            if !seen_links.insert((row.vault_id.clone(), row.asset_id.clone())) {
                return Err(invariant(format!(
                    "duplicate link '{}'/'{}'",
                    row.vault_id, row.asset_id
                )));
            }
            state.index.insert(row.vault_id, row.asset_id, row.link);
        }

        for row in snapshot.vault_grants {
            if state.vault_access.put(row.entity, row.principal, row.grant).is_some() {
                return Err(invariant("duplicate vault grant".to_string()));
            }
        }
        for row in snapshot.asset_grants {
            if state.asset_access.put(row.entity, row.principal, row.grant).is_some() {
                return Err(invariant("duplicate asset grant".to_string()));
            }
        }

        tracing::info!(
            vaults = state.vaults.len(),
            assets = state.assets.len(),
            revisions = state.revisions.len(),
            journal_entries = journal.len(),
            "Registry restored from snapshot"
        );

        Ok(Self {
            config,
            state,
            journal,
            last_committed: snapshot.last_committed,
        })
    }
}

fn invariant(message: String) -> SnapshotError {
    SnapshotError::Invariant(message)
}
