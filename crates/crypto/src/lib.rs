//! Key, signature and hashing primitives for didhub.
//!
//! These functions back the dashboard's identity flows: creating a seed,
//! deriving a key pair from it, minting DIDs, and signing or hashing payloads
//! such as verifiable credentials.
//!
//! # Algorithms
//!
//! - **Randomness**: OS CSPRNG for seeds, thread RNG for DID suffixes
//! - **Key derivation**: BLAKE3 `derive_key` over the seed text
//! - **Signatures**: Ed25519 (deterministic)
//! - **Hashing**: BLAKE3, rendered as `blake3:<hex>`
//!
//! Secret material is zeroized on drop and redacted from `Debug` output.

pub mod error;
pub mod keys;
pub mod seed;
pub mod signing;
pub mod vault;

pub use error::{CryptoError, CryptoResult};
pub use keys::{generate_key_pair, KeyPair};
pub use seed::{
    generate_did, generate_did_with_prefix, generate_seed, DEFAULT_SEED_LENGTH, DID_PREFIX,
};
pub use signing::{create_signature, generate_hash, verify_signature, HASH_TAG};
pub use vault::SecretVault;
