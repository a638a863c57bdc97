//! Key-value persistence backends.
//!
//! The registry keeps its whole collection as a single serialized value under
//! one key, the way a browser keeps data in local storage. Backends only need
//! to store opaque UTF-8 strings by key.

use crate::config::{StorageBackend, StorageConfig};
use crate::error::{Error, Result};
use std::sync::Arc;

pub mod file;
pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use file::FileStore;
pub use memory::MemoryStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;

/// A string-to-string persistent store.
pub trait KeyValueStore: Send + Sync {
    /// Load the value stored under `key`, `None` if absent.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

/// Open the backend selected by the `[storage]` configuration section.
pub fn open_store(config: &StorageConfig) -> Result<Box<dyn KeyValueStore>> {
    match config.backend {
        StorageBackend::Memory => Ok(Box::new(MemoryStore::new())),
        StorageBackend::File => {
            let path = config
                .path
                .as_ref()
                .ok_or_else(|| Error::Config("file backend requires storage.path".to_string()))?;
            Ok(Box::new(FileStore::open(path)?))
        }
        #[cfg(feature = "sqlite")]
        StorageBackend::Sqlite => {
            let path = config
                .path
                .as_ref()
                .ok_or_else(|| Error::Config("sqlite backend requires storage.path".to_string()))?;
            Ok(Box::new(SqliteStore::open(path)?))
        }
        #[cfg(not(feature = "sqlite"))]
        StorageBackend::Sqlite => Err(Error::Config(
            "sqlite backend requires the `sqlite` feature".to_string(),
        )),
    }
}
