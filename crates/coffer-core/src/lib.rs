//! # Coffer Core - Foundation Layer
//!
//! **Purpose**: Define the vocabulary shared by every Coffer crate.
//!
//! This crate provides the pure value types the registry is built from. It holds
//! no state and performs no I/O apart from configuration loading.
//!
//! # Architecture Constraints
//!
//! - YES Tier model and its ordering
//! - YES Identifier newtypes with length validation
//! - YES Unified error taxonomy for registry operations
//! - YES Caller context (authenticated principal + host ordinal time)
//! - YES Registry configuration
//! - NO registry state or store implementations (that's `coffer-registry`)
//! - NO authentication; principals arrive pre-verified from the host
//!
//! ## Core Concepts
//!
//! - **Tier**: four-level ordinal permission scale (`Restricted < Observer < Contributor < Steward`)
//! - **Principal**: opaque authenticated caller identity
//! - **ContentDigest**: 32-byte integrity commitment for a document version
//! - **OrdinalTime**: host block counter, never wall-clock time

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Registry configuration loading and validation
pub mod config;

/// Caller context and ordinal time
pub mod context;

/// Content integrity commitments
pub mod digest;

/// Unified registry error taxonomy
pub mod errors;

/// Vault, asset and principal identifiers
pub mod identifiers;

/// Ordinal permission tiers
pub mod tier;

pub use config::{ConfigError, HistoryConfig, JournalConfig, LimitsConfig, RegistryConfig};
pub use context::{CallContext, OrdinalTime};
pub use digest::ContentDigest;
pub use errors::{EntityKind, RegistryError, RegistryResult};
pub use identifiers::{AssetId, Principal, VaultId};
pub use tier::{is_valid_tier, AccessRequirement, Tier};
