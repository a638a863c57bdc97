//! Persisted identity registry.
//!
//! The registry keeps every [`IdentityEntry`] as one JSON array under a single
//! key of a [`KeyValueStore`]. Each call reads the array from the store,
//! so there is no cache to keep in sync and the registry survives restarts of
//! whatever process owns the store.
//!
//! # Guarantees
//!
//! - At most one entry per case-insensitive DID
//! - DIDs are persisted lower-cased
//! - `createdAt` is filled when a new entry is appended without one, and
//!   carried over when a replacement leaves it empty
//! - Replacing an entry keeps its position in the collection
//!
//! # Read policy
//!
//! Reads fail open: a missing key, an unreadable store or a value that is not
//! a JSON array of entries all load as an empty collection, with a `warn!`
//! for the latter two. [`IdentityRegistry::try_load`] is the strict variant.
//!
//! Read-modify-write is not atomic. Two registries over the same store that
//! write concurrently can lose an update.

use crate::entry::{normalize_did, IdentityEntry, IdentityType};
use crate::error::{IdentityError, IdentityResult};
use chrono::{DateTime, SecondsFormat, Utc};
use didhub_core::config::DEFAULT_STORAGE_KEY;
use didhub_core::KeyValueStore;
use tracing::{debug, info, warn};

/// Time source for `createdAt` defaults.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Render a timestamp the way `createdAt` is stored, e.g. `2024-05-01T12:00:00.000Z`.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Upsert-by-DID collection of identities over a key-value store.
pub struct IdentityRegistry<S: KeyValueStore> {
    store: S,
    key: String,
    clock: Box<dyn Clock>,
}

impl<S: KeyValueStore> IdentityRegistry<S> {
    /// Registry over `store` using the default storage key.
    pub fn new(store: S) -> Self {
        Self {
            store,
            key: DEFAULT_STORAGE_KEY.to_string(),
            clock: Box::new(SystemClock),
        }
    }

    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn storage_key(&self) -> &str {
        &self.key
    }

    /// Insert `entry`, or replace the entry with the same normalized DID.
    ///
    /// Returns the entry as persisted: DID lower-cased and `created_at` filled
    /// in when it was `None`. A replacement without `created_at` keeps the
    /// stored entry's value and falls back to the clock only when that is
    /// missing too.
    pub fn register(&self, mut entry: IdentityEntry) -> IdentityResult<IdentityEntry> {
        if entry.did.trim().is_empty() {
            return Err(IdentityError::EmptyDid);
        }

        entry.did = normalize_did(&entry.did);

        let mut entries = self.load();
        let existing = entries.iter().position(|e| normalize_did(&e.did) == entry.did);
        if entry.created_at.is_none() {
            entry.created_at = existing
                .and_then(|index| entries[index].created_at.clone())
                .or_else(|| Some(format_timestamp(self.clock.now())));
        }

        match existing {
            Some(index) => {
                debug!(did = %entry.did, index, "Replacing identity");
                entries[index] = entry.clone();
            }
            None => {
                debug!(did = %entry.did, "Appending identity");
                entries.push(entry.clone());
            }
        }

        self.save(&entries)?;
        info!(
            did = %entry.did,
            identity_type = %entry.identity_type,
            total = entries.len(),
            "Registered identity"
        );
        Ok(entry)
    }

    /// Look up an entry by DID, ignoring case.
    pub fn find_by_did(&self, did: &str) -> Option<IdentityEntry> {
        let key = normalize_did(did);
        self.load()
            .into_iter()
            .find(|e| normalize_did(&e.did) == key)
    }

    /// Every entry, in persisted order.
    pub fn all_identities(&self) -> Vec<IdentityEntry> {
        self.load()
    }

    /// Delete the whole persisted collection.
    pub fn clear_registry(&self) -> IdentityResult<()> {
        self.store.remove(&self.key)?;
        info!(key = %self.key, "Cleared identity registry");
        Ok(())
    }

    /// Remove the entry for `did`. `Ok(None)` if nothing matched.
    pub fn remove(&self, did: &str) -> IdentityResult<Option<IdentityEntry>> {
        let key = normalize_did(did);
        let mut entries = self.load();
        let Some(index) = entries.iter().position(|e| normalize_did(&e.did) == key) else {
            return Ok(None);
        };

        let removed = entries.remove(index);
        self.save(&entries)?;
        info!(did = %removed.did, total = entries.len(), "Removed identity");
        Ok(Some(removed))
    }

    /// Entries whose `parentDid` points at `parent_did`.
    pub fn children_of(&self, parent_did: &str) -> Vec<IdentityEntry> {
        let key = normalize_did(parent_did);
        self.load()
            .into_iter()
            .filter(|e| e.parent_did.as_deref().map(normalize_did).as_deref() == Some(key.as_str()))
            .collect()
    }

    pub fn identities_of_type(&self, identity_type: IdentityType) -> Vec<IdentityEntry> {
        self.load()
            .into_iter()
            .filter(|e| e.identity_type == identity_type)
            .collect()
    }

    /// Pretty JSON array of the current collection.
    pub fn export_json(&self) -> IdentityResult<String> {
        Ok(serde_json::to_string_pretty(&self.load())?)
    }

    /// Register every entry of a JSON array.
    ///
    /// The whole document is parsed before anything is written, so malformed
    /// input leaves the registry untouched. Returns the number of entries
    /// applied.
    pub fn import_json(&self, json: &str) -> IdentityResult<usize> {
        let incoming: Vec<IdentityEntry> = serde_json::from_str(json)?;
        if incoming.iter().any(|e| e.did.trim().is_empty()) {
            return Err(IdentityError::EmptyDid);
        }

        let count = incoming.len();
        for entry in incoming {
            self.register(entry)?;
        }
        info!(count, "Imported identities");
        Ok(count)
    }

    /// Strict load: store and parse failures are returned instead of
    /// degrading to an empty collection.
    pub fn try_load(&self) -> IdentityResult<Vec<IdentityEntry>> {
        match self.store.get(&self.key)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    /// Fail-open load used by every read path.
    fn load(&self) -> Vec<IdentityEntry> {
        match self.try_load() {
            Ok(entries) => entries,
            Err(e) => {
                warn!(key = %self.key, error = %e, "Identity registry unreadable, treating as empty");
                Vec::new()
            }
        }
    }

    fn save(&self, entries: &[IdentityEntry]) -> IdentityResult<()> {
        let raw = serde_json::to_string(entries)?;
        self.store.set(&self.key, &raw)?;
        Ok(())
    }
}
