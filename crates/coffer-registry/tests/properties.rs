//! Property tests over random operation sequences

#![allow(clippy::unwrap_used)]

mod common;

use coffer_registry::{EntityKind, Registry, Tier};
use common::{ctx, enrollment, principal, revision};
use proptest::prelude::*;

const CALLERS: [&str; 3] = ["alice", "bob", "carol"];

#[derive(Debug, Clone)]
enum Op {
    Publish { caller: usize, seed: u8 },
    Grant { grantee: usize, tier: u8 },
    Reenroll { seed: u8 },
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..CALLERS.len(), any::<u8>()).prop_map(|(caller, seed)| Op::Publish { caller, seed }),
        (0..CALLERS.len(), 0u8..6).prop_map(|(grantee, tier)| Op::Grant { grantee, tier }),
        any::<u8>().prop_map(|seed| Op::Reenroll { seed }),
    ]
}

proptest! {
    /// Whatever sequence of calls runs, each generation's history stays
    /// dense, past entries never change, and version_count tracks the latest
    /// iteration of the current generation.
    #[test]
    fn history_stays_dense_and_immutable(ops in proptest::collection::vec(arb_op(), 1..40)) {
        let mut registry = Registry::default();
        registry.enroll_asset(&ctx("alice", 0), enrollment("doc", 0)).unwrap();
        let mut seen = vec![registry.read_revision("doc", 1).unwrap().clone()];
        let mut earlier: Vec<Vec<_>> = Vec::new();

        for (step, op) in ops.into_iter().enumerate() {
            let at = step as u64 + 1;
            match op {
                Op::Publish { caller, seed } => {
                    let caller = CALLERS[caller];
                    let allowed = registry.verify_write_access("doc", &principal(caller));
                    let result = registry.publish_revision(&ctx(caller, at), "doc", revision("doc", seed));
                    prop_assert_eq!(result.is_ok(), allowed);
                    if let Ok(iteration) = result {
                        prop_assert_eq!(iteration as usize, seen.len() + 1);
                        seen.push(registry.read_revision("doc", iteration).unwrap().clone());
                    }
                }
                Op::Grant { grantee, tier } => {
                    let result = registry.grant_asset_access(&ctx("alice", at), "doc", &principal(CALLERS[grantee]), tier);
                    prop_assert_eq!(result.is_ok(), tier <= 3);
                }
                Op::Reenroll { seed } => {
                    registry.retire_asset(&ctx("alice", at), "doc").unwrap();
                    registry.enroll_asset(&ctx("alice", at), enrollment("doc", seed)).unwrap();
                    earlier.push(std::mem::take(&mut seen));
                    seen.push(registry.read_revision("doc", 1).unwrap().clone());
                }
            }

            let asset = registry.read_asset("doc").unwrap();
            prop_assert_eq!(asset.version_count as usize, seen.len());
            for (index, record) in seen.iter().enumerate() {
                prop_assert_eq!(registry.read_revision("doc", index as u32 + 1), Some(record));
            }
            prop_assert!(registry.read_revision("doc", seen.len() as u32 + 1).is_none());
            prop_assert_eq!(asset.generation as usize, earlier.len());
            for (generation, records) in earlier.iter().enumerate() {
                for (index, record) in records.iter().enumerate() {
                    prop_assert_eq!(
                        registry.read_revision_in("doc", generation as u32, index as u32 + 1),
                        Some(record)
                    );
                }
            }
        }
    }

    /// A non-owner passes a tier check exactly when its grant reaches it.
    #[test]
    fn authorize_matches_grant(granted in 0u8..4, required in 0u8..4) {
        let mut registry = common::registry_with_alice_entities();
        registry.grant_vault_access(&ctx("alice", 3), "v1", &principal("bob"), granted).unwrap();
        let required = Tier::try_from(required).unwrap();
        let granted = Tier::try_from(granted).unwrap();

        prop_assert_eq!(
            registry.authorize(EntityKind::Vault, "v1", &principal("bob"), required),
            granted >= required
        );
        prop_assert!(registry.authorize(EntityKind::Vault, "v1", &principal("alice"), required));
    }
}
