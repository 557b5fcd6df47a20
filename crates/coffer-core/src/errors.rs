//! Unified error taxonomy for registry operations
//!
//! Every mutating operation fails with exactly one of these variants. All of
//! them are terminal for the call that raised them and leave committed state
//! untouched. Existence is checked before authorization, so callers can tell
//! a missing entity apart from missing rights.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::identifiers::Principal;
use crate::tier::AccessRequirement;

/// Kind of entity an access check or lookup refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    /// A vault (container)
    Vault,
    /// An asset (document metadata)
    Asset,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Vault => f.write_str("vault"),
            EntityKind::Asset => f.write_str("asset"),
        }
    }
}

/// Error returned by registry operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum RegistryError {
    /// Caller lacks the rights the operation requires
    #[error("Not authorized: {principal} needs {required} on {kind} '{id}'")]
    NotAuthorized {
        /// Entity kind the check ran against
        kind: EntityKind,
        /// Entity identifier
        id: String,
        /// Principal that was denied
        principal: Principal,
        /// What the operation requires of the caller
        required: AccessRequirement,
    },

    /// Referenced vault is not registered
    #[error("Vault not found: {id}")]
    VaultNotFound {
        /// Vault identifier that was looked up
        id: String,
    },

    /// Referenced asset is not registered
    #[error("Asset not found: {id}")]
    AssetNotFound {
        /// Asset identifier that was looked up
        id: String,
    },

    /// An entity with this identifier is already registered
    #[error("Already exists: {kind} '{id}'")]
    AlreadyExists {
        /// Kind of entity being created
        kind: EntityKind,
        /// Conflicting identifier
        id: String,
    },

    /// A parameter failed validation
    #[error("Invalid parameters: {message}")]
    InvalidParams {
        /// Description of the rejected parameter
        message: String,
    },

    /// A tier ordinal outside `0..=3`
    #[error("Invalid tier: {tier} (expected 0..=3)")]
    InvalidTier {
        /// Rejected raw ordinal
        tier: u8,
    },
}

impl RegistryError {
    /// Create a not-authorized error
    pub fn not_authorized(
        kind: EntityKind,
        id: impl Into<String>,
        principal: &Principal,
        required: AccessRequirement,
    ) -> Self {
        Self::NotAuthorized {
            kind,
            id: id.into(),
            principal: principal.clone(),
            required,
        }
    }

    /// Create a vault-not-found error
    pub fn vault_not_found(id: impl Into<String>) -> Self {
        Self::VaultNotFound { id: id.into() }
    }

    /// Create an asset-not-found error
    pub fn asset_not_found(id: impl Into<String>) -> Self {
        Self::AssetNotFound { id: id.into() }
    }

    /// Create a not-found error for either entity kind
    pub fn not_found(kind: EntityKind, id: impl Into<String>) -> Self {
        match kind {
            EntityKind::Vault => Self::vault_not_found(id),
            EntityKind::Asset => Self::asset_not_found(id),
        }
    }

    /// Create an already-exists error
    pub fn already_exists(kind: EntityKind, id: impl Into<String>) -> Self {
        Self::AlreadyExists {
            kind,
            id: id.into(),
        }
    }

    /// Create an invalid-parameters error
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::InvalidParams {
            message: message.into(),
        }
    }

    /// Create an invalid-tier error
    pub fn invalid_tier(tier: u8) -> Self {
        Self::InvalidTier { tier }
    }

    /// Stable short code for the error variant
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotAuthorized { .. } => "NotAuthorized",
            Self::VaultNotFound { .. } => "VaultNotFound",
            Self::AssetNotFound { .. } => "AssetNotFound",
            Self::AlreadyExists { .. } => "AlreadyExists",
            Self::InvalidParams { .. } => "InvalidParams",
            Self::InvalidTier { .. } => "InvalidTier",
        }
    }
}

/// Standard Result type for registry operations
pub type RegistryResult<T> = std::result::Result<T, RegistryError>;
