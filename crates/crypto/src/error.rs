//! Error types for didhub crypto operations.

use thiserror::Error;

/// Errors that can occur in key, signature and vault operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    #[error("Invalid seed: {reason}")]
    InvalidSeed { reason: String },

    #[error("Invalid key: {reason}")]
    InvalidKey { reason: String },

    #[error("Random source failure: {reason}")]
    Entropy { reason: String },

    #[error("Secret vault is locked")]
    VaultLocked,
}

/// Result type for crypto operations.
pub type CryptoResult<T> = Result<T, CryptoError>;
