//! Canonical record shapes produced by the normalization layer.
//!
//! Each record is an immutable value object built fresh from one upstream
//! record. Nothing here is persisted or mutated in place.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::states::{ConnectionState, CredentialExchangeState, PresentationExchangeState};
use crate::types::{CredentialRole, ExchangeVersion, PresentationRole};

/// A pairwise relationship between two parties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    /// Upstream connection id, copied verbatim.
    pub connection_id: String,
    /// Protocol variant tag of the connection protocol itself.
    pub connection_protocol: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub invitation_mode: Option<String>,
    pub their_role: Option<String>,
    /// rfc23 state; already canonical upstream, no translation applied.
    pub state: Option<ConnectionState>,
    pub alias: Option<String>,
    pub my_did: Option<String>,
    pub their_did: Option<String>,
    pub their_label: Option<String>,
    pub their_public_did: Option<String>,
    pub error_msg: Option<String>,
    pub invitation_key: Option<String>,
    pub invitation_msg_id: Option<String>,
}

/// A credential exchange, unified across both protocol generations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialExchange {
    /// Version-prefixed id: `v1-`/`v2-` + the bare upstream exchange id.
    /// The prefix always matches `protocol_version`.
    pub credential_id: String,
    pub role: CredentialRole,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub protocol_version: ExchangeVersion,
    pub schema_id: Option<String>,
    pub credential_definition_id: Option<String>,
    pub state: Option<CredentialExchangeState>,
    /// Attribute preview (name → value), when the upstream record carries one.
    pub attributes: Option<HashMap<String, String>>,
    pub connection_id: Option<String>,
}

impl CredentialExchange {
    /// Whether the id prefix and `protocol_version` agree.
    pub fn id_matches_version(&self) -> bool {
        self.credential_id
            .starts_with(self.protocol_version.id_prefix())
    }
}

/// A presentation (proof) exchange, unified across both protocol generations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresentationExchange {
    /// Version-prefixed id, same scheme as [`CredentialExchange::credential_id`].
    pub proof_id: String,
    pub connection_id: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub presentation: Option<serde_json::Value>,
    pub presentation_request: Option<serde_json::Value>,
    pub protocol_version: ExchangeVersion,
    pub role: PresentationRole,
    pub state: Option<PresentationExchangeState>,
    /// Tri-state verification outcome: `Some(true)`, `Some(false)`, or
    /// `None` when the upstream has not verified yet.
    pub verified: Option<bool>,
}

impl PresentationExchange {
    /// Whether the id prefix and `protocol_version` agree.
    pub fn id_matches_version(&self) -> bool {
        self.proof_id.starts_with(self.protocol_version.id_prefix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_credential() -> CredentialExchange {
        CredentialExchange {
            credential_id: "v2-42".into(),
            role: CredentialRole::Issuer,
            created_at: None,
            updated_at: None,
            protocol_version: ExchangeVersion::V2,
            schema_id: Some("S1".into()),
            credential_definition_id: Some("C1".into()),
            state: Some(CredentialExchangeState::OfferSent),
            attributes: None,
            connection_id: Some("conn-1".into()),
        }
    }

    #[test]
    fn test_id_matches_version() {
        let record = sample_credential();
        assert!(record.id_matches_version());

        let mismatched = CredentialExchange {
            credential_id: "v1-42".into(),
            ..record
        };
        assert!(!mismatched.id_matches_version());
    }

    #[test]
    fn test_credential_serde_roundtrip() {
        let record = sample_credential();
        let json = serde_json::to_string(&record).unwrap();
        let back: CredentialExchange = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_credential_serializes_canonical_state() {
        let json = serde_json::to_value(sample_credential()).unwrap();
        assert_eq!(json["state"], "offer-sent");
        assert_eq!(json["protocol_version"], "v2");
        assert_eq!(json["role"], "issuer");
    }

    #[test]
    fn test_presentation_verified_tristate_serde() {
        let record = PresentationExchange {
            proof_id: "v1-9".into(),
            connection_id: None,
            created_at: None,
            updated_at: None,
            presentation: None,
            presentation_request: None,
            protocol_version: ExchangeVersion::V1,
            role: PresentationRole::Verifier,
            state: Some(PresentationExchangeState::PresentationSent),
            verified: None,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["verified"], serde_json::Value::Null);
        assert!(record.id_matches_version());
    }
}
