//! Seed-derived Ed25519 key pairs

use crate::error::{CryptoError, CryptoResult};
use ed25519_dalek::{SigningKey, VerifyingKey};
use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// BLAKE3 derive-key context; changing it changes every derived key.
const KEY_DERIVATION_CONTEXT: &str = "didhub 2024-01-01 ed25519 identity signing key v1";

/// Hex-encoded Ed25519 key pair.
///
/// Both halves are zeroized when the pair is dropped.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub struct KeyPair {
    /// 32-byte verifying key, hex
    pub public_key: String,
    /// 32-byte secret scalar seed, hex
    pub private_key: String,
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &self.public_key)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// Derive the key pair for `seed`.
///
/// The same seed always yields the same pair. The seed is taken as opaque
/// text, so callers may pass the hex output of `generate_seed` or any other
/// secret string.
pub fn generate_key_pair(seed: &str) -> CryptoResult<KeyPair> {
    if seed.is_empty() {
        return Err(CryptoError::InvalidSeed {
            reason: "seed must not be empty".to_string(),
        });
    }

    let mut secret = blake3::derive_key(KEY_DERIVATION_CONTEXT, seed.as_bytes());
    let signing_key = SigningKey::from_bytes(&secret);
    secret.zeroize();

    Ok(KeyPair {
        public_key: hex::encode(signing_key.verifying_key().as_bytes()),
        private_key: hex::encode(signing_key.to_bytes()),
    })
}

/// Decode a hex private key into a signing key.
pub(crate) fn signing_key_from_hex(private_key: &str) -> CryptoResult<SigningKey> {
    let mut bytes = decode_32(private_key, "private key")?;
    let key = SigningKey::from_bytes(&bytes);
    bytes.zeroize();
    Ok(key)
}

/// Decode a hex public key into a verifying key.
pub(crate) fn verifying_key_from_hex(public_key: &str) -> CryptoResult<VerifyingKey> {
    let bytes = decode_32(public_key, "public key")?;
    VerifyingKey::from_bytes(&bytes).map_err(|e| CryptoError::InvalidKey {
        reason: e.to_string(),
    })
}

fn decode_32(value: &str, what: &str) -> CryptoResult<[u8; 32]> {
    let mut decoded = hex::decode(value).map_err(|e| CryptoError::InvalidKey {
        reason: format!("{} is not valid hex: {}", what, e),
    })?;
    if decoded.len() != 32 {
        let len = decoded.len();
        decoded.zeroize();
        return Err(CryptoError::InvalidKey {
            reason: format!("{} has length {} (expected 32)", what, len),
        });
    }
    let mut out = [0u8; 32];
    out.copy_from_slice(&decoded);
    decoded.zeroize();
    Ok(out)
}
