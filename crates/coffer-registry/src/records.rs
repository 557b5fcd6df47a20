//! Registry records
//!
//! Plain data rows held by the stores. Records carry no behavior beyond
//! construction; the operation layer owns every state transition.

use coffer_core::{AssetId, ContentDigest, OrdinalTime, Principal, Tier, VaultId};
use serde::{Deserialize, Serialize};

/// Named container grouping assets
///
/// Immutable after creation. Destroyed only by its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vault {
    /// Caller-chosen unique identifier
    pub id: VaultId,
    /// Display name
    pub name: String,
    /// Principal that established the vault
    pub owner: Principal,
    /// Ordinal time of establishment
    pub established_at: OrdinalTime,
    /// Free-form note
    pub note: Option<String>,
}

/// Metadata and integrity commitment for one tracked document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// Caller-chosen unique identifier
    pub id: AssetId,
    /// Current title
    pub title: String,
    /// Current descriptive info
    pub info: Option<String>,
    /// Short classification label, fixed at enrollment
    pub category: String,
    /// External storage reference for the current version
    pub location_ref: String,
    /// Digest of the current version
    pub hash_digest: ContentDigest,
    /// Principal that enrolled the asset
    pub owner: Principal,
    /// Ordinal time of enrollment
    pub created_at: OrdinalTime,
    /// Ordinal time of the latest revision
    pub updated_at: OrdinalTime,
    /// Size in bytes of the current version
    pub size: u64,
    /// Number of revisions recorded in this generation; always at least 1
    pub version_count: u32,
    /// History generation opened when this id was last enrolled
    pub generation: u32,
}

/// One immutable entry of an asset's revision history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionRecord {
    /// Digest of this version
    pub hash_digest: ContentDigest,
    /// External storage reference of this version
    pub location_ref: String,
    /// Ordinal time the version was recorded
    pub timestamp: OrdinalTime,
    /// Principal that recorded the version
    pub agent: Principal,
    /// Change note
    pub note: Option<String>,
}

/// Presence of an asset inside a vault
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultAssetLink {
    /// Ordinal time the asset was attached
    pub enrolled_at: OrdinalTime,
}

/// Tier assigned to one principal on one entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessGrant {
    /// Granted tier
    pub tier: Tier,
}

/// Parameters for enrolling a new asset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enrollment {
    /// Asset identifier to register
    pub id: String,
    /// Title
    pub title: String,
    /// Descriptive info
    pub info: Option<String>,
    /// Short classification label
    pub category: String,
    /// External storage reference
    pub location_ref: String,
    /// Digest of the initial version
    pub hash_digest: ContentDigest,
    /// Size in bytes
    pub size: u64,
}

impl Enrollment {
    /// Create an enrollment without info
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        category: impl Into<String>,
        location_ref: impl Into<String>,
        hash_digest: ContentDigest,
        size: u64,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            info: None,
            category: category.into(),
            location_ref: location_ref.into(),
            hash_digest,
            size,
        }
    }

    /// Attach descriptive info
    pub fn with_info(mut self, info: impl Into<String>) -> Self {
        self.info = Some(info.into());
        self
    }
}

/// Parameters for publishing a new revision of an existing asset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision {
    /// Replacement title
    pub title: String,
    /// Replacement info
    pub info: Option<String>,
    /// External storage reference of the new version
    pub location_ref: String,
    /// Digest of the new version
    pub hash_digest: ContentDigest,
    /// Size in bytes of the new version
    pub size: u64,
    /// Change note recorded in history
    pub note: Option<String>,
}

impl Revision {
    /// Create a revision without info or note
    pub fn new(
        title: impl Into<String>,
        location_ref: impl Into<String>,
        hash_digest: ContentDigest,
        size: u64,
    ) -> Self {
        Self {
            title: title.into(),
            info: None,
            location_ref: location_ref.into(),
            hash_digest,
            size,
            note: None,
        }
    }

    /// Attach replacement info
    pub fn with_info(mut self, info: impl Into<String>) -> Self {
        self.info = Some(info.into());
        self
    }

    /// Attach a change note
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}
