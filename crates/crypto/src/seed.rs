//! Seed and DID generation.

use crate::error::{CryptoError, CryptoResult};
use rand::rngs::OsRng;
use rand::RngCore;

/// Default seed size in bytes.
pub const DEFAULT_SEED_LENGTH: usize = 32;

/// DID method prefix produced by [`generate_did`].
pub const DID_PREFIX: &str = "did:iota:evm";

/// Size of the random DID suffix, matching an EVM address.
const DID_SUFFIX_BYTES: usize = 20;

/// Generate `length_in_bytes` bytes from the OS CSPRNG, hex-encoded lower-case.
///
/// # Example
/// ```
/// let seed = didhub_crypto::generate_seed(32).unwrap();
/// assert_eq!(seed.len(), 64);
/// ```
pub fn generate_seed(length_in_bytes: usize) -> CryptoResult<String> {
    if length_in_bytes == 0 {
        return Err(CryptoError::InvalidSeed {
            reason: "seed length must be greater than zero".to_string(),
        });
    }

    let mut bytes = vec![0u8; length_in_bytes];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| CryptoError::Entropy {
            reason: e.to_string(),
        })?;
    let seed = hex::encode(&bytes);
    zeroize::Zeroize::zeroize(&mut bytes);
    Ok(seed)
}

/// Generate a fresh `did:iota:evm:0x<40 hex>` identifier.
pub fn generate_did() -> String {
    generate_did_with_prefix(DID_PREFIX)
}

/// Generate a DID under a custom method prefix.
///
/// The prefix is used verbatim and joined to the random suffix with `:`.
pub fn generate_did_with_prefix(prefix: &str) -> String {
    let mut suffix = [0u8; DID_SUFFIX_BYTES];
    rand::thread_rng().fill_bytes(&mut suffix);
    format!("{}:0x{}", prefix, hex::encode(suffix))
}
