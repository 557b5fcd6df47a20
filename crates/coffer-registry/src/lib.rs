//! # Coffer Registry - Domain Layer
//!
//! **Purpose**: Shared, tamper-evident access-control and version registry for
//! confidential documents.
//!
//! The registry records who owns each vault and asset, who may read or modify
//! them, and an append-only history of every content change. Document bytes
//! never enter the registry; each version is pinned by a content digest and an
//! external location reference.
//!
//! # Architecture Constraints
//!
//! - YES Six independent keyed stores with per-store invariants
//! - YES Pure authorization engine (missing entity / owner / grant lookup)
//! - YES All-or-nothing operations through a staged write buffer
//! - YES Hash-chained audit journal of committed facts
//! - NO authentication (callers arrive as pre-verified principals)
//! - NO document storage or transport
//! - NO grant revocation and no cascading deletes
//!
//! ## Control flow
//!
//! Every mutating call checks existence, then asks the authorization engine
//! for a decision against the current committed state, then validates
//! parameters and stages its writes. Only a call that passes every check
//! commits; a failed call leaves state and journal untouched.
//!
//! ```ignore
//! let mut registry = Registry::new(RegistryConfig::default())?;
//! let alice = CallContext::new("alice", 1);
//! registry.establish_vault(&alice, "v1", "Legal", None)?;
//! registry.enroll_asset(&alice.at(2), Enrollment::new("doc-1", "NDA", "legal", "s3://nda", digest, 2048))?;
//! registry.attach_asset_to_vault(&alice.at(3), "v1", "doc-1")?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Authorization engine
pub mod authorization;

/// Hash-chained audit journal
pub mod journal;

/// Orphaned row reporting
pub mod orphans;

/// Registry records and operation parameters
pub mod records;

/// Lock-guarded registry handle
pub mod shared;

/// Snapshot export and restore
pub mod snapshot;

/// Committed state
pub mod state;

/// Keyed stores
pub mod stores;

mod operations;
mod queries;
mod registry;
mod staging;

pub use authorization::{resolve_access, AccessResolution};
pub use journal::{AuditJournal, JournalEntry, JournalError, RegistryFact};
pub use orphans::OrphanReport;
pub use records::{
    AccessGrant, Asset, Enrollment, Revision, RevisionRecord, Vault, VaultAssetLink,
};
pub use registry::Registry;
pub use shared::SharedRegistry;
pub use snapshot::{RegistrySnapshot, SnapshotError};
pub use state::RegistryState;

pub use coffer_core::{
    AccessRequirement, AssetId, CallContext, ContentDigest, EntityKind, OrdinalTime, Principal,
    RegistryConfig, RegistryError, RegistryResult, Tier, VaultId,
};
