//! Shared fixtures for registry integration tests

#![allow(dead_code)]

use coffer_registry::{CallContext, ContentDigest, Enrollment, Principal, Registry, Revision};

/// Route registry logs to the test harness; `RUST_LOG=coffer_registry=debug` shows them
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn digest(seed: u8) -> ContentDigest {
    ContentDigest::new([seed; 32])
}

pub fn ctx(caller: &str, at: u64) -> CallContext {
    CallContext::new(caller, at)
}

pub fn principal(name: &str) -> Principal {
    Principal::new(name)
}

pub fn enrollment(id: &str, seed: u8) -> Enrollment {
    Enrollment::new(
        id,
        format!("{id} title"),
        "legal",
        format!("s3://bucket/{id}/1"),
        digest(seed),
        1024,
    )
}

pub fn revision(id: &str, seed: u8) -> Revision {
    Revision::new(
        format!("{id} title v{seed}"),
        format!("s3://bucket/{id}/{seed}"),
        digest(seed),
        2048,
    )
}

/// Registry where alice owns vault `v1` and asset `a1`
pub fn registry_with_alice_entities() -> Registry {
    let mut registry = Registry::default();
    registry
        .establish_vault(&ctx("alice", 1), "v1", "Legal", None)
        .unwrap();
    registry
        .enroll_asset(&ctx("alice", 2), enrollment("a1", 1))
        .unwrap();
    registry
}
