//! Test utilities for integration tests

use didhub_core::{open_store, Config, KeyValueStore};
use didhub_identity::{IdentityEntry, IdentityRegistry, IdentityType};
use std::path::Path;

/// Install a test subscriber once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("didhub=debug,didhub_identity=debug,didhub_core=debug")
        .try_init();
}

/// Open a fresh registry over the on-disk store at `path`.
///
/// Each call opens a new store handle, which is how tests simulate a process
/// restart.
pub fn open_registry(path: &Path) -> IdentityRegistry<Box<dyn KeyValueStore>> {
    let config = Config::default_config().with_store_path(path);
    let store = open_store(&config.storage).expect("failed to open store");
    IdentityRegistry::new(store).with_storage_key(config.storage.key)
}

/// A small organization tree: one organization, an operator and a machine.
pub fn sample_entries() -> Vec<IdentityEntry> {
    vec![
        IdentityEntry::new("did:iota:evm:0xORG", IdentityType::Organization, "acme")
            .with_label("Acme Printing"),
        IdentityEntry::new("did:iota:evm:0xOP1", IdentityType::Operator, "op1")
            .with_parent("did:iota:evm:0xORG"),
        IdentityEntry::new("did:iota:evm:0xM01", IdentityType::Machine, "press-01")
            .with_parent("did:iota:evm:0xorg")
            .with_label("Press 01"),
    ]
}
