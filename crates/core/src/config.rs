//! Configuration management for didhub.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Storage key the identity collection lives under.
pub const DEFAULT_STORAGE_KEY: &str = "didhub.identities/v1";

/// DID method prefix used when no custom prefix is configured.
pub const DEFAULT_DID_PREFIX: &str = "did:iota:evm";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub crypto: CryptoConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which key-value backend holds the persisted collection.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    File,
    Sqlite,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    /// Directory (file backend) or database file (sqlite backend)
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default = "default_storage_key")]
    pub key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CryptoConfig {
    #[serde(default = "default_seed_length")]
    pub seed_length: usize,
    #[serde(default = "default_did_prefix")]
    pub did_prefix: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

fn default_seed_length() -> usize {
    32
}

fn default_did_prefix() -> String {
    DEFAULT_DID_PREFIX.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: None,
            key: default_storage_key(),
        }
    }
}

impl Default for CryptoConfig {
    fn default() -> Self {
        Self {
            seed_length: default_seed_length(),
            did_prefix: default_did_prefix(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl Config {
    #[cfg(feature = "toml")]
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self::default()
    }

    /// Point the storage section at an on-disk location.
    ///
    /// A path ending in `.db` or `.sqlite` selects the sqlite backend, anything
    /// else is treated as a directory for the file backend.
    pub fn with_store_path(mut self, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let is_db = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("db") | Some("sqlite")
        );
        self.storage.backend = if is_db {
            StorageBackend::Sqlite
        } else {
            StorageBackend::File
        };
        self.storage.path = Some(path.to_path_buf());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.storage.key.trim().is_empty() {
            return Err(Error::Config("storage.key must not be empty".to_string()));
        }
        if self.storage.backend != StorageBackend::Memory && self.storage.path.is_none() {
            return Err(Error::Config(format!(
                "storage.path is required for the {:?} backend",
                self.storage.backend
            )));
        }
        if self.crypto.seed_length == 0 {
            return Err(Error::Config(
                "crypto.seed_length must be greater than zero".to_string(),
            ));
        }
        if self.crypto.did_prefix.is_empty() {
            return Err(Error::Config(
                "crypto.did_prefix must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
