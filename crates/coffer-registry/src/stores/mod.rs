//! Keyed stores, one per entity or relation kind
//!
//! Each store owns the invariants of its own table. Stores expose read access
//! publicly and mutation only to the crate, so every write goes through the
//! operation layer's staged commit.

mod access;
mod assets;
mod index;
mod revisions;
mod vaults;

pub use access::{AccessTable, AssetAccessTable, VaultAccessTable};
pub use assets::AssetRepository;
pub use index::VaultAssetIndex;
pub use revisions::RevisionHistory;
pub use vaults::VaultRegistry;
