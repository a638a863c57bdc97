//! Identity registry and credentials for the didhub dashboard.
//!
//! This crate holds the persisted registry of identities (organizations,
//! creators, operators and machines) keyed by DID, plus typed verifiable
//! credentials issued between them.
//!
//! # Core Concepts
//!
//! - **Identity entry**: one DID with its role, domain id and optional label
//!   and parent organization
//! - **Registry**: upsert-by-DID collection persisted as one JSON value in a
//!   [`didhub_core::KeyValueStore`]
//! - **Credential**: a typed claim signed with the key held in a
//!   [`didhub_crypto::SecretVault`]
//!
//! # Example
//! ```
//! use didhub_core::MemoryStore;
//! use didhub_identity::{IdentityEntry, IdentityRegistry, IdentityType};
//!
//! let registry = IdentityRegistry::new(MemoryStore::new());
//! registry
//!     .register(IdentityEntry::new("DID:X:1", IdentityType::Operator, "op1"))
//!     .unwrap();
//! assert!(registry.find_by_did("did:x:1").is_some());
//! ```

pub mod credential;
pub mod entry;
pub mod error;
pub mod registry;

pub use credential::{CredentialClaim, CredentialProof, VerifiableCredential};
pub use entry::{normalize_did, IdentityEntry, IdentityType};
pub use error::{IdentityError, IdentityResult};
pub use registry::{format_timestamp, Clock, IdentityRegistry, SystemClock};
