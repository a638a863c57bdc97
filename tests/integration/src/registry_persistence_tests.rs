//! Registry persistence tests
//!
//! Every scenario runs against both on-disk backends: a directory store and a
//! SQLite database. A "restart" is a brand-new registry over the same path.

use crate::test_utils::{init_tracing, open_registry, sample_entries};
use didhub_core::config::DEFAULT_STORAGE_KEY;
use didhub_core::{FileStore, KeyValueStore, SqliteStore};
use didhub_identity::{IdentityEntry, IdentityType};
use std::path::PathBuf;
use tempfile::TempDir;

fn backend_paths(dir: &TempDir) -> Vec<PathBuf> {
    vec![dir.path().join("files"), dir.path().join("registry.db")]
}

#[test]
fn test_register_survives_restart() {
    init_tracing();
    let dir = TempDir::new().unwrap();

    for path in backend_paths(&dir) {
        let entry = IdentityEntry::new("DID:IOTA:EVM:0xAbC", IdentityType::Creator, "creator-1")
            .with_label("Ada");
        {
            let registry = open_registry(&path);
            registry.register(entry.clone()).unwrap();
        }

        let restarted = open_registry(&path);
        let found = restarted.find_by_did(&entry.did).unwrap();

        assert_eq!(found.did, "did:iota:evm:0xabc");
        assert_eq!(found.identity_type, entry.identity_type);
        assert_eq!(found.id, entry.id);
        assert_eq!(found.label, entry.label);
        assert_eq!(found.parent_did, None);
        assert!(found.created_at.is_some(), "createdAt populated for {:?}", path);
    }
}

#[test]
fn test_order_and_replacement_persist() {
    init_tracing();
    let dir = TempDir::new().unwrap();

    for path in backend_paths(&dir) {
        let registry = open_registry(&path);
        for entry in sample_entries() {
            registry.register(entry).unwrap();
        }
        let first_created = registry.find_by_did("did:iota:evm:0xop1").unwrap().created_at;
        assert!(first_created.is_some());

        registry
            .register(
                IdentityEntry::new("did:iota:evm:0xop1", IdentityType::Operator, "op1")
                    .with_label("Night shift"),
            )
            .unwrap();
        drop(registry);

        let restarted = open_registry(&path);
        let all = restarted.all_identities();
        let ids: Vec<_> = all.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["acme", "op1", "press-01"]);
        assert_eq!(all[1].label.as_deref(), Some("Night shift"));
        assert_eq!(all[1].parent_did, None);
        assert_eq!(all[1].created_at, first_created);

        let children = restarted.children_of("DID:IOTA:EVM:0XORG");
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].id, "press-01");
    }
}

#[test]
fn test_clear_persists() {
    let dir = TempDir::new().unwrap();

    for path in backend_paths(&dir) {
        let registry = open_registry(&path);
        for entry in sample_entries() {
            registry.register(entry).unwrap();
        }
        registry.clear_registry().unwrap();
        drop(registry);

        let restarted = open_registry(&path);
        assert!(restarted.all_identities().is_empty());
        assert!(restarted.find_by_did("did:iota:evm:0xorg").is_none());
    }
}

#[test]
fn test_corrupted_file_store_fails_open() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("files");

    let store = FileStore::open(&path).unwrap();
    store.set(DEFAULT_STORAGE_KEY, "[{\"did\":").unwrap();

    let registry = open_registry(&path);
    assert!(registry.all_identities().is_empty());
    assert!(registry.try_load().is_err());

    registry
        .register(IdentityEntry::new("did:x:1", IdentityType::Machine, "m"))
        .unwrap();
    assert_eq!(open_registry(&path).all_identities().len(), 1);
}

#[test]
fn test_corrupted_sqlite_store_fails_open() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("registry.db");

    {
        let store = SqliteStore::open(&path).unwrap();
        store.set(DEFAULT_STORAGE_KEY, "{\"not\":\"an array\"}").unwrap();
    }

    let registry = open_registry(&path);
    assert!(registry.all_identities().is_empty());
    assert!(registry.find_by_did("did:x:1").is_none());
}

#[test]
fn test_export_from_files_import_into_sqlite() {
    let dir = TempDir::new().unwrap();
    let source = open_registry(&dir.path().join("files"));
    for entry in sample_entries() {
        source.register(entry).unwrap();
    }
    let exported = source.export_json().unwrap();

    let target = open_registry(&dir.path().join("registry.db"));
    assert_eq!(target.import_json(&exported).unwrap(), 3);
    assert_eq!(target.all_identities(), source.all_identities());
}
