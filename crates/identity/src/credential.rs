//! Verifiable credentials issued between registered identities.
//!
//! Claims are typed variants rather than free-form JSON. `Custom` covers
//! anything else, carrying an explicit schema discriminator next to its
//! payload.
//!
//! A credential's proof commits to the canonical JSON of its unsigned body:
//! the body is hashed with `generate_hash`, and the tagged hash string is what
//! gets signed.

use crate::entry::normalize_did;
use crate::error::{IdentityError, IdentityResult};
use crate::registry::{format_timestamp, Clock, IdentityRegistry, SystemClock};
use didhub_core::KeyValueStore;
use didhub_crypto::{generate_hash, verify_signature, SecretVault};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// What a credential asserts about its subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CredentialClaim {
    /// Subject belongs to an organization
    Membership {
        organization_did: String,
        role: String,
    },
    /// Subject authored a work
    Authorship { work_id: String, title: String },
    /// Subject may operate a machine within the listed scopes
    OperatorAuthorization {
        machine_did: String,
        scopes: Vec<String>,
    },
    /// Issuer vouches for a machine's provenance
    MachineAttestation {
        manufacturer: String,
        model: String,
        serial_number: String,
    },
    Custom {
        schema: String,
        payload: serde_json::Value,
    },
}

impl CredentialClaim {
    pub fn kind(&self) -> &'static str {
        match self {
            CredentialClaim::Membership { .. } => "membership",
            CredentialClaim::Authorship { .. } => "authorship",
            CredentialClaim::OperatorAuthorization { .. } => "operator_authorization",
            CredentialClaim::MachineAttestation { .. } => "machine_attestation",
            CredentialClaim::Custom { .. } => "custom",
        }
    }

    fn validate(&self) -> IdentityResult<()> {
        let missing = match self {
            CredentialClaim::Membership {
                organization_did, ..
            } if organization_did.trim().is_empty() => Some("organization_did"),
            CredentialClaim::Authorship { work_id, .. } if work_id.trim().is_empty() => {
                Some("work_id")
            }
            CredentialClaim::OperatorAuthorization { machine_did, .. }
                if machine_did.trim().is_empty() =>
            {
                Some("machine_did")
            }
            CredentialClaim::MachineAttestation { serial_number, .. }
                if serial_number.trim().is_empty() =>
            {
                Some("serial_number")
            }
            CredentialClaim::Custom { schema, .. } if schema.trim().is_empty() => Some("schema"),
            _ => None,
        };

        match missing {
            Some(field) => Err(IdentityError::Credential(format!(
                "{} claim field '{}' must not be empty",
                self.kind(),
                field
            ))),
            None => Ok(()),
        }
    }
}

/// Issuer's commitment to the credential body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialProof {
    /// `blake3:<hex>` digest of the unsigned body
    pub hash: String,
    /// Ed25519 signature over `hash`, hex
    pub signature: String,
    /// Issuer's public key, hex
    pub public_key: String,
}

/// A signed claim about `subject`, made by `issuer`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiableCredential {
    pub id: String,
    pub issuer: String,
    pub subject: String,
    pub issued_at: String,
    pub claim: CredentialClaim,
    pub proof: CredentialProof,
}

/// Fields covered by the proof, in serialization order.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UnsignedBody<'a> {
    id: &'a str,
    issuer: &'a str,
    subject: &'a str,
    issued_at: &'a str,
    claim: &'a CredentialClaim,
}

impl VerifiableCredential {
    /// Issue a credential signed with the key held in `vault`.
    pub fn issue(
        issuer_did: &str,
        subject_did: &str,
        claim: CredentialClaim,
        vault: &SecretVault,
    ) -> IdentityResult<Self> {
        Self::issue_with_clock(issuer_did, subject_did, claim, vault, &SystemClock)
    }

    /// Like [`VerifiableCredential::issue`], with `issuedAt` taken from `clock`.
    pub fn issue_with_clock(
        issuer_did: &str,
        subject_did: &str,
        claim: CredentialClaim,
        vault: &SecretVault,
        clock: &dyn Clock,
    ) -> IdentityResult<Self> {
        if issuer_did.trim().is_empty() || subject_did.trim().is_empty() {
            return Err(IdentityError::EmptyDid);
        }
        claim.validate()?;

        let id = format!("urn:uuid:{}", uuid::Uuid::new_v4());
        let issuer = normalize_did(issuer_did);
        let subject = normalize_did(subject_did);
        let issued_at = format_timestamp(clock.now());

        let hash = body_hash(&UnsignedBody {
            id: &id,
            issuer: &issuer,
            subject: &subject,
            issued_at: &issued_at,
            claim: &claim,
        })?;
        let signature = vault.sign(&hash)?;
        let public_key = vault.public_key()?;

        info!(
            credential_id = %id,
            issuer = %issuer,
            subject = %subject,
            kind = claim.kind(),
            "Issued credential"
        );

        Ok(Self {
            id,
            issuer,
            subject,
            issued_at,
            claim,
            proof: CredentialProof {
                hash,
                signature,
                public_key,
            },
        })
    }

    /// Recompute the body hash and check the issuer's signature over it.
    pub fn verify(&self) -> bool {
        let expected = match body_hash(&self.unsigned_body()) {
            Ok(hash) => hash,
            Err(_) => return false,
        };
        if expected != self.proof.hash {
            warn!(credential_id = %self.id, "Credential body does not match its proof hash");
            return false;
        }
        verify_signature(&self.proof.hash, &self.proof.signature, &self.proof.public_key)
    }

    /// Verify the proof and require issuer and subject to be registered.
    pub fn verify_against_registry<S: KeyValueStore>(
        &self,
        registry: &IdentityRegistry<S>,
    ) -> IdentityResult<()> {
        for did in [&self.issuer, &self.subject] {
            if registry.find_by_did(did).is_none() {
                return Err(IdentityError::NotFound { did: did.clone() });
            }
        }
        if !self.verify() {
            return Err(IdentityError::Credential(format!(
                "proof of {} does not verify",
                self.id
            )));
        }
        Ok(())
    }

    fn unsigned_body(&self) -> UnsignedBody<'_> {
        UnsignedBody {
            id: &self.id,
            issuer: &self.issuer,
            subject: &self.subject,
            issued_at: &self.issued_at,
            claim: &self.claim,
        }
    }
}

fn body_hash(body: &UnsignedBody<'_>) -> IdentityResult<String> {
    let bytes = serde_json::to_vec(body)?;
    Ok(generate_hash(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{IdentityEntry, IdentityType};
    use chrono::{DateTime, TimeZone, Utc};
    use didhub_core::MemoryStore;

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    fn unlocked_vault() -> SecretVault {
        let vault = SecretVault::new();
        vault.unlock_with_seed("issuer-seed").unwrap();
        vault
    }

    fn membership() -> CredentialClaim {
        CredentialClaim::Membership {
            organization_did: "did:iota:evm:0xorg".to_string(),
            role: "operator".to_string(),
        }
    }

    #[test]
    fn test_issue_and_verify() {
        let vault = unlocked_vault();
        let vc = VerifiableCredential::issue("DID:X:ORG", "did:x:op", membership(), &vault).unwrap();

        assert_eq!(vc.issuer, "did:x:org");
        assert!(vc.id.starts_with("urn:uuid:"));
        assert!(vc.proof.hash.starts_with("blake3:"));
        assert!(vc.verify());
    }

    #[test]
    fn test_issued_at_comes_from_clock() {
        let vault = unlocked_vault();
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 7, 4, 9, 15, 30).unwrap());
        let vc = VerifiableCredential::issue_with_clock(
            "did:x:org",
            "did:x:op",
            membership(),
            &vault,
            &clock,
        )
        .unwrap();

        assert_eq!(vc.issued_at, "2024-07-04T09:15:30.000Z");
        assert!(vc.verify());

        // The timestamp is covered by the proof
        let mut moved = vc.clone();
        moved.issued_at = "2024-07-05T09:15:30.000Z".to_string();
        assert!(!moved.verify());
    }

    #[test]
    fn test_tampered_claim_fails_verification() {
        let vault = unlocked_vault();
        let mut vc = VerifiableCredential::issue("did:x:org", "did:x:op", membership(), &vault).unwrap();
        vc.claim = CredentialClaim::Membership {
            organization_did: "did:iota:evm:0xorg".to_string(),
            role: "admin".to_string(),
        };
        assert!(!vc.verify());
    }

    #[test]
    fn test_swapped_public_key_fails_verification() {
        let vault = unlocked_vault();
        let mut vc = VerifiableCredential::issue("did:x:org", "did:x:op", membership(), &vault).unwrap();
        vc.proof.public_key = didhub_crypto::generate_key_pair("mallory").unwrap().public_key.clone();
        assert!(!vc.verify());
    }

    #[test]
    fn test_locked_vault_cannot_issue() {
        let vault = SecretVault::new();
        let result = VerifiableCredential::issue("did:x:org", "did:x:op", membership(), &vault);
        assert!(matches!(result, Err(IdentityError::Crypto(_))));
    }

    #[test]
    fn test_custom_claim_requires_schema() {
        let vault = unlocked_vault();
        let claim = CredentialClaim::Custom {
            schema: " ".to_string(),
            payload: serde_json::json!({"k": 1}),
        };
        let result = VerifiableCredential::issue("did:x:org", "did:x:op", claim, &vault);
        assert!(matches!(result, Err(IdentityError::Credential(_))));
    }

    #[test]
    fn test_claim_serializes_with_kind_tag() {
        let claim = CredentialClaim::OperatorAuthorization {
            machine_did: "did:x:m1".to_string(),
            scopes: vec!["start".to_string(), "stop".to_string()],
        };
        let json = serde_json::to_value(&claim).unwrap();
        assert_eq!(json["kind"], "operator_authorization");
        assert_eq!(json["scopes"][1], "stop");

        let back: CredentialClaim = serde_json::from_value(json).unwrap();
        assert_eq!(back, claim);
    }

    #[test]
    fn test_verify_against_registry() {
        let vault = unlocked_vault();
        let registry = IdentityRegistry::new(MemoryStore::new());
        registry
            .register(IdentityEntry::new("did:x:org", IdentityType::Organization, "org"))
            .unwrap();

        let vc = VerifiableCredential::issue("did:x:org", "did:x:op", membership(), &vault).unwrap();
        assert!(matches!(
            vc.verify_against_registry(&registry),
            Err(IdentityError::NotFound { .. })
        ));

        registry
            .register(IdentityEntry::new("DID:X:OP", IdentityType::Operator, "op"))
            .unwrap();
        assert!(vc.verify_against_registry(&registry).is_ok());
    }
}
