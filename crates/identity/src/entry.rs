//! Identity records held by the registry.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role an identity plays in the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityType {
    Organization,
    Creator,
    Operator,
    Machine,
}

impl IdentityType {
    pub const ALL: [IdentityType; 4] = [
        IdentityType::Organization,
        IdentityType::Creator,
        IdentityType::Operator,
        IdentityType::Machine,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IdentityType::Organization => "organization",
            IdentityType::Creator => "creator",
            IdentityType::Operator => "operator",
            IdentityType::Machine => "machine",
        }
    }
}

impl fmt::Display for IdentityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IdentityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IdentityType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown identity type: {}", s))
    }
}

/// One registered identity.
///
/// Serialized with the field names the dashboard persists (`type`,
/// `parentDid`, `createdAt`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityEntry {
    /// Unique key, compared case-insensitively
    pub did: String,
    #[serde(rename = "type")]
    pub identity_type: IdentityType,
    /// Domain identifier, often equal to `did`
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// DID of the owning organization
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_did: Option<String>,
    /// RFC 3339 timestamp of first registration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl IdentityEntry {
    pub fn new(did: impl Into<String>, identity_type: IdentityType, id: impl Into<String>) -> Self {
        Self {
            did: did.into(),
            identity_type,
            id: id.into(),
            label: None,
            parent_did: None,
            created_at: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_parent(mut self, parent_did: impl Into<String>) -> Self {
        self.parent_did = Some(parent_did.into());
        self
    }

    pub fn with_created_at(mut self, created_at: impl Into<String>) -> Self {
        self.created_at = Some(created_at.into());
        self
    }

    /// Lookup key for this entry.
    pub fn normalized_did(&self) -> String {
        normalize_did(&self.did)
    }
}

/// Canonical form of a DID used for matching and storage.
pub fn normalize_did(did: &str) -> String {
    did.to_lowercase()
}
