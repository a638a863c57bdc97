//! Error types for didhub identity operations.

use thiserror::Error;

/// Errors that can occur in registry and credential operations.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// The entry's DID is empty after trimming
    #[error("Identity DID must not be empty")]
    EmptyDid,

    /// Identity not found
    #[error("Identity not found: {did}")]
    NotFound { did: String },

    /// Backing key-value store failed
    #[error("Store error: {0}")]
    Store(#[from] didhub_core::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Cryptographic errors
    #[error("Cryptographic error: {0}")]
    Crypto(#[from] didhub_crypto::CryptoError),

    /// Credential shape or verification errors
    #[error("Invalid credential: {0}")]
    Credential(String),
}

/// Result type for identity operations.
pub type IdentityResult<T> = Result<T, IdentityError>;
