//! Signatures and digests over caller data.
//!
//! Signatures are plain Ed25519 over the raw bytes of `data`, hex-encoded.
//! Ed25519 signing is deterministic, so the same data and key always produce
//! the same signature.

use crate::error::CryptoResult;
use crate::keys::{signing_key_from_hex, verifying_key_from_hex};
use ed25519_dalek::{Signature, Signer};
use tracing::debug;

/// Tag prefixed to every rendered digest.
pub const HASH_TAG: &str = "blake3:";

/// Sign `data` with a hex-encoded private key.
pub fn create_signature(data: impl AsRef<[u8]>, private_key: &str) -> CryptoResult<String> {
    let signing_key = signing_key_from_hex(private_key)?;
    let signature = signing_key.sign(data.as_ref());
    Ok(hex::encode(signature.to_bytes()))
}

/// Check `signature` over `data` against a hex-encoded public key.
///
/// Malformed signatures or keys verify as `false`.
pub fn verify_signature(data: impl AsRef<[u8]>, signature: &str, public_key: &str) -> bool {
    let verifying_key = match verifying_key_from_hex(public_key) {
        Ok(key) => key,
        Err(e) => {
            debug!(error = %e, "Rejecting signature with malformed public key");
            return false;
        }
    };

    let bytes: [u8; 64] = match hex::decode(signature).ok().and_then(|b| b.try_into().ok()) {
        Some(bytes) => bytes,
        None => {
            debug!("Rejecting malformed signature encoding");
            return false;
        }
    };

    verifying_key
        .verify_strict(data.as_ref(), &Signature::from_bytes(&bytes))
        .is_ok()
}

/// BLAKE3 digest of `data`, rendered as `blake3:<64 hex>`.
pub fn generate_hash(data: impl AsRef<[u8]>) -> String {
    format!("{}{}", HASH_TAG, blake3::hash(data.as_ref()).to_hex())
}
