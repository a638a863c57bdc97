//! In-memory holder for the session's secret material.
//!
//! The dashboard keeps the active seed and its derived key pair only in
//! memory. `SecretVault` is a cheap-to-clone handle to that state; every
//! clone sees the same material, and `lock` wipes it for all of them.

use crate::error::{CryptoError, CryptoResult};
use crate::keys::{generate_key_pair, KeyPair};
use crate::signing::create_signature;
use std::fmt;
use std::sync::{Arc, RwLock};
use tracing::info;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Seed, derived keys and the DID they are bound to.
#[derive(Zeroize, ZeroizeOnDrop)]
struct SecretMaterial {
    seed: String,
    key_pair: KeyPair,
    did: Option<String>,
}

/// Shared in-memory secret store.
#[derive(Clone, Default)]
pub struct SecretVault {
    inner: Arc<RwLock<Option<SecretMaterial>>>,
}

impl fmt::Debug for SecretVault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretVault")
            .field("unlocked", &self.is_unlocked())
            .finish()
    }
}

impl SecretVault {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive keys from `seed` and hold them, replacing any previous material.
    ///
    /// Returns the public key of the derived pair.
    pub fn unlock_with_seed(&self, seed: &str) -> CryptoResult<String> {
        let key_pair = generate_key_pair(seed)?;
        let public_key = key_pair.public_key.clone();

        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(SecretMaterial {
            seed: seed.to_string(),
            key_pair,
            did: None,
        });

        info!(public_key = %public_key, "Secret vault unlocked");
        Ok(public_key)
    }

    pub fn is_unlocked(&self) -> bool {
        self.inner.read().unwrap_or_else(|e| e.into_inner()).is_some()
    }

    /// Bind the held material to a DID.
    pub fn set_did(&self, did: impl Into<String>) -> CryptoResult<()> {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        let material = guard.as_mut().ok_or(CryptoError::VaultLocked)?;
        material.did = Some(did.into());
        Ok(())
    }

    pub fn did(&self) -> CryptoResult<Option<String>> {
        self.with_material(|m| m.did.clone())
    }

    pub fn public_key(&self) -> CryptoResult<String> {
        self.with_material(|m| m.key_pair.public_key.clone())
    }

    /// Copy of the held seed, for export flows that show it to the user.
    pub fn seed(&self) -> CryptoResult<String> {
        self.with_material(|m| m.seed.clone())
    }

    /// Sign `data` with the held private key.
    pub fn sign(&self, data: impl AsRef<[u8]>) -> CryptoResult<String> {
        let guard = self.inner.read().unwrap_or_else(|e| e.into_inner());
        let material = guard.as_ref().ok_or(CryptoError::VaultLocked)?;
        create_signature(data, &material.key_pair.private_key)
    }

    /// Drop and wipe the held material.
    pub fn lock(&self) {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        if guard.take().is_some() {
            info!("Secret vault locked");
        }
    }

    fn with_material<T>(&self, f: impl FnOnce(&SecretMaterial) -> T) -> CryptoResult<T> {
        let guard = self.inner.read().unwrap_or_else(|e| e.into_inner());
        guard.as_ref().map(f).ok_or(CryptoError::VaultLocked)
    }
}
