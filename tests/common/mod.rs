//! Common test utilities and fixtures.
//!
//! Shared record types and store constructors used across the integration
//! test suite.

#![allow(dead_code)]

use serde::{Deserialize, Serialize};
use tempfile::TempDir;
use typed_store::prelude::*;

/// A nested record exercising strings, scalars, and lists of strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub age: u32,
    pub tags: Vec<String>,
}

pub fn profile(name: &str, age: u32, tags: &[&str]) -> Profile {
    Profile {
        name: name.to_string(),
        age,
        tags: tags.iter().map(ToString::to_string).collect(),
    }
}

/// Open a store in a fresh temp dir with an ephemeral key provider.
///
/// The temp dir must stay alive as long as the store; callers keep the
/// returned guard in scope.
pub fn open_store() -> (TempDir, Store) {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = Store::open(dir.path(), &InMemoryKeyProvider::default()).expect("open store");
    (dir, store)
}

/// Parametrized-key fixture: one base id, slots varying by uuid.
pub fn computed_key(uuid: &str) -> StoreKey<String> {
    StoreKey::parametrized("computedKey", uuid, StoreKind::Persistent)
}
