//! Core functionality for the didhub identity dashboard backend.
//!
//! This crate provides the shared error type, configuration, logging setup
//! and the key-value persistence layer the identity registry is stored in.

pub mod config;
pub mod error;
pub mod logging;
pub mod storage;

pub use config::{Config, CryptoConfig, LoggingConfig, StorageBackend, StorageConfig};
pub use error::{Error, Result};
pub use storage::{open_store, FileStore, KeyValueStore, MemoryStore};
#[cfg(feature = "sqlite")]
pub use storage::SqliteStore;
