//! Access tables and the verify helpers

#![allow(clippy::unwrap_used)]

mod common;

use assert_matches::assert_matches;
use coffer_registry::{
    AccessRequirement, AccessResolution, EntityKind, RegistryError, Tier,
};
use common::{ctx, principal, registry_with_alice_entities};

#[test]
fn grants_accept_every_valid_tier() {
    let mut registry = registry_with_alice_entities();
    for tier in 0..=3u8 {
        registry
            .grant_asset_access(&ctx("alice", 10 + u64::from(tier)), "a1", &principal("bob"), tier)
            .unwrap();
        registry
            .grant_vault_access(&ctx("alice", 20 + u64::from(tier)), "v1", &principal("bob"), tier)
            .unwrap();
        assert_eq!(
            registry.asset_grant("a1", &principal("bob")).map(|g| g.tier.as_u8()),
            Some(tier)
        );
    }
}

#[test]
fn out_of_range_tier_is_invalid() {
    let mut registry = registry_with_alice_entities();
    for tier in [4u8, 5, 200, u8::MAX] {
        assert_eq!(
            registry.grant_vault_access(&ctx("alice", 3), "v1", &principal("bob"), tier),
            Err(RegistryError::InvalidTier { tier })
        );
        assert_eq!(
            registry.grant_asset_access(&ctx("alice", 4), "a1", &principal("bob"), tier),
            Err(RegistryError::InvalidTier { tier })
        );
    }
    assert!(registry.vault_grant("v1", &principal("bob")).is_none());
}

#[test]
fn authorization_checked_before_tier() {
    let mut registry = registry_with_alice_entities();
    assert_matches!(
        registry.grant_asset_access(&ctx("bob", 3), "a1", &principal("bob"), 9),
        Err(RegistryError::NotAuthorized {
            required: AccessRequirement::Owner,
            ..
        })
    );
    assert_eq!(
        registry.grant_asset_access(&ctx("bob", 4), "ghost", &principal("bob"), 9),
        Err(RegistryError::asset_not_found("ghost"))
    );
}

#[test]
fn stewards_cannot_delegate() {
    let mut registry = registry_with_alice_entities();
    registry
        .grant_vault_access(&ctx("alice", 3), "v1", &principal("steve"), 3)
        .unwrap();
    registry
        .grant_asset_access(&ctx("alice", 4), "a1", &principal("steve"), 3)
        .unwrap();

    assert_matches!(
        registry.grant_vault_access(&ctx("steve", 5), "v1", &principal("eve"), 1),
        Err(RegistryError::NotAuthorized { .. })
    );
    assert_matches!(
        registry.grant_asset_access(&ctx("steve", 6), "a1", &principal("eve"), 1),
        Err(RegistryError::NotAuthorized { .. })
    );
    assert!(registry.asset_grant("a1", &principal("eve")).is_none());
}

#[test]
fn grant_overwrites_previous_tier() {
    let mut registry = registry_with_alice_entities();
    registry
        .grant_asset_access(&ctx("alice", 3), "a1", &principal("bob"), 2)
        .unwrap();
    assert!(registry.verify_write_access("a1", &principal("bob")));

    registry
        .grant_asset_access(&ctx("alice", 4), "a1", &principal("bob"), 0)
        .unwrap();
    assert!(!registry.verify_write_access("a1", &principal("bob")));
    assert!(!registry.verify_read_access("a1", &principal("bob")));
    assert_eq!(
        registry.effective_tier(EntityKind::Asset, "a1", &principal("bob")),
        AccessResolution::Granted(Tier::Restricted)
    );
}

#[test]
fn owner_bypass_survives_low_self_grant() {
    let mut registry = registry_with_alice_entities();
    registry
        .grant_asset_access(&ctx("alice", 3), "a1", &principal("alice"), 0)
        .unwrap();
    registry
        .grant_vault_access(&ctx("alice", 4), "v1", &principal("alice"), 0)
        .unwrap();

    assert!(registry.verify_write_access("a1", &principal("alice")));
    assert!(registry.verify_admin_access("v1", &principal("alice")));
    assert_eq!(
        registry.effective_tier(EntityKind::Vault, "v1", &principal("alice")),
        AccessResolution::Owner
    );
}

#[test]
fn verify_helpers_follow_tier_thresholds() {
    let mut registry = registry_with_alice_entities();
    let (olive, cody, stella) = (principal("olive"), principal("cody"), principal("stella"));
    registry.grant_asset_access(&ctx("alice", 3), "a1", &olive, 1).unwrap();
    registry.grant_asset_access(&ctx("alice", 4), "a1", &cody, 2).unwrap();
    registry.grant_vault_access(&ctx("alice", 5), "v1", &cody, 2).unwrap();
    registry.grant_vault_access(&ctx("alice", 6), "v1", &stella, 3).unwrap();

    assert!(registry.verify_read_access("a1", &olive));
    assert!(!registry.verify_write_access("a1", &olive));
    assert!(registry.verify_read_access("a1", &cody));
    assert!(registry.verify_write_access("a1", &cody));
    assert!(!registry.verify_admin_access("v1", &cody));
    assert!(registry.verify_admin_access("v1", &stella));
    assert!(!registry.verify_read_access("a1", &principal("nobody")));
}

#[test]
fn missing_entities_fail_closed() {
    let registry = registry_with_alice_entities();
    assert!(!registry.verify_read_access("ghost", &principal("alice")));
    assert!(!registry.verify_admin_access("ghost", &principal("alice")));
    assert!(!registry.authorize(EntityKind::Asset, "ghost", &principal("alice"), Tier::Restricted));
    assert_eq!(
        registry.effective_tier(EntityKind::Asset, "ghost", &principal("alice")),
        AccessResolution::Denied
    );
}

#[test]
fn vault_and_asset_tables_are_independent() {
    let mut registry = registry_with_alice_entities();
    registry
        .grant_vault_access(&ctx("alice", 3), "v1", &principal("bob"), 3)
        .unwrap();
    assert!(!registry.verify_read_access("a1", &principal("bob")));
    assert!(registry.asset_grant("a1", &principal("bob")).is_none());
}
