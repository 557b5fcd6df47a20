//! Lock-guarded registry for hosts that do not serialize calls
//!
//! One global write lock covers every mutating call, so each call still sees
//! the state committed by the previous one and commits all-or-nothing.
//! Queries share a read lock.

use std::sync::Arc;

use coffer_core::{CallContext, Principal, RegistryResult};
use parking_lot::RwLock;

use crate::records::{Asset, Enrollment, Revision, RevisionRecord, Vault};
use crate::registry::Registry;

/// Cloneable handle to a registry behind a single `RwLock`
#[derive(Debug, Clone, Default)]
pub struct SharedRegistry {
    inner: Arc<RwLock<Registry>>,
}

impl SharedRegistry {
    /// Wrap an existing registry
    pub fn new(registry: Registry) -> Self {
        Self {
            inner: Arc::new(RwLock::new(registry)),
        }
    }

    /// Run a closure with shared access
    pub fn read<R>(&self, f: impl FnOnce(&Registry) -> R) -> R {
        let guard = self.inner.read();
        f(&*guard)
    }

    /// Run a closure with exclusive access
    ///
    /// Everything inside the closure executes under one lock acquisition.
    pub fn write<R>(&self, f: impl FnOnce(&mut Registry) -> R) -> R {
        let mut guard = self.inner.write();
        f(&mut *guard)
    }

    /// See [`Registry::establish_vault`]
    pub fn establish_vault(
        &self,
        ctx: &CallContext,
        id: &str,
        name: &str,
        note: Option<&str>,
    ) -> RegistryResult<()> {
        self.write(|registry| registry.establish_vault(ctx, id, name, note))
    }

    /// See [`Registry::retire_vault`]
    pub fn retire_vault(&self, ctx: &CallContext, id: &str) -> RegistryResult<()> {
        self.write(|registry| registry.retire_vault(ctx, id))
    }

    /// See [`Registry::enroll_asset`]
    pub fn enroll_asset(&self, ctx: &CallContext, enrollment: Enrollment) -> RegistryResult<()> {
        self.write(|registry| registry.enroll_asset(ctx, enrollment))
    }

    /// See [`Registry::publish_revision`]
    pub fn publish_revision(
        &self,
        ctx: &CallContext,
        id: &str,
        revision: Revision,
    ) -> RegistryResult<u32> {
        self.write(|registry| registry.publish_revision(ctx, id, revision))
    }

    /// See [`Registry::retire_asset`]
    pub fn retire_asset(&self, ctx: &CallContext, id: &str) -> RegistryResult<()> {
        self.write(|registry| registry.retire_asset(ctx, id))
    }

    /// See [`Registry::attach_asset_to_vault`]
    pub fn attach_asset_to_vault(
        &self,
        ctx: &CallContext,
        vault_id: &str,
        asset_id: &str,
    ) -> RegistryResult<()> {
        self.write(|registry| registry.attach_asset_to_vault(ctx, vault_id, asset_id))
    }

    /// See [`Registry::remove_asset_from_vault`]
    pub fn remove_asset_from_vault(
        &self,
        ctx: &CallContext,
        vault_id: &str,
        asset_id: &str,
    ) -> RegistryResult<()> {
        self.write(|registry| registry.remove_asset_from_vault(ctx, vault_id, asset_id))
    }

    /// See [`Registry::grant_vault_access`]
    pub fn grant_vault_access(
        &self,
        ctx: &CallContext,
        vault_id: &str,
        principal: &Principal,
        tier: u8,
    ) -> RegistryResult<()> {
        self.write(|registry| registry.grant_vault_access(ctx, vault_id, principal, tier))
    }

    /// See [`Registry::grant_asset_access`]
    pub fn grant_asset_access(
        &self,
        ctx: &CallContext,
        asset_id: &str,
        principal: &Principal,
        tier: u8,
    ) -> RegistryResult<()> {
        self.write(|registry| registry.grant_asset_access(ctx, asset_id, principal, tier))
    }

    /// Owned copy of a vault record
    pub fn read_vault(&self, id: &str) -> Option<Vault> {
        self.read(|registry| registry.read_vault(id).cloned())
    }

    /// Owned copy of an asset record
    pub fn read_asset(&self, id: &str) -> Option<Asset> {
        self.read(|registry| registry.read_asset(id).cloned())
    }

    /// Owned copy of a revision record
    pub fn read_revision(&self, id: &str, iteration: u32) -> Option<RevisionRecord> {
        self.read(|registry| registry.read_revision(id, iteration).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coffer_core::ContentDigest;
    use std::thread;

    #[test]
    fn test_concurrent_publishers_get_dense_iterations() {
        let shared = SharedRegistry::default();
        let owner = CallContext::new("alice", 1);
        shared
            .enroll_asset(
                &owner,
                Enrollment::new(
                    "doc-1",
                    "Contract",
                    "legal",
                    "s3://doc-1/1",
                    ContentDigest::new([1; 32]),
                    10,
                ),
            )
            .unwrap();

        let handles: Vec<_> = (0..8u8)
            .map(|n| {
                let shared = shared.clone();
                thread::spawn(move || {
                    let ctx = CallContext::new("alice", 10 + u64::from(n));
                    let revision = Revision::new(
                        "Contract",
                        format!("s3://doc-1/{n}"),
                        ContentDigest::new([n; 32]),
                        10,
                    );
                    shared.publish_revision(&ctx, "doc-1", revision).unwrap()
                })
            })
            .collect();

        let mut iterations: Vec<u32> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        iterations.sort_unstable();
        assert_eq!(iterations, (2..=9).collect::<Vec<_>>());
        assert_eq!(shared.read_asset("doc-1").map(|a| a.version_count), Some(9));
        assert!(shared.read_revision("doc-1", 9).is_some());
    }

    #[test]
    fn test_handle_covers_every_mutation() {
        let shared = SharedRegistry::default();
        let alice = CallContext::new("alice", 1);
        let bob = Principal::new("bob");
        shared.establish_vault(&alice, "v1", "Legal", None).unwrap();
        shared
            .enroll_asset(
                &alice.at(2),
                Enrollment::new("a1", "Deed", "legal", "s3://a1", ContentDigest::new([2; 32]), 1),
            )
            .unwrap();
        shared.attach_asset_to_vault(&alice.at(3), "v1", "a1").unwrap();
        shared.grant_vault_access(&alice.at(4), "v1", &bob, 2).unwrap();
        shared.grant_asset_access(&alice.at(5), "a1", &bob, 1).unwrap();
        assert!(shared.read(|registry| registry.link("v1", "a1").is_some()));

        // Contributor on the vault side is enough to detach
        shared
            .remove_asset_from_vault(&CallContext::new("bob", 6), "v1", "a1")
            .unwrap();
        assert!(shared.read(|registry| registry.link("v1", "a1").is_none()));

        shared.retire_asset(&alice.at(7), "a1").unwrap();
        shared.retire_vault(&alice.at(8), "v1").unwrap();
        assert!(shared.read_asset("a1").is_none());
        assert!(shared.read_vault("v1").is_none());
        assert_eq!(shared.read(|registry| registry.journal().len()), 8);
    }
}
