//! Cross-crate integration tests for didhub
//!
//! This test suite validates:
//! - Registry persistence across simulated restarts on every store backend
//! - Fail-open reads over corrupted store contents
//! - Credential issuance and verification between registered identities

pub mod test_utils;

#[cfg(test)]
mod registry_persistence_tests;

#[cfg(test)]
mod credential_flow_tests;
