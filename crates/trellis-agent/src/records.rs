//! Upstream record shapes, as the agent's REST API emits them.
//!
//! The two protocol generations expose structurally incompatible shapes
//! for the same logical entity; both are modeled here as-is and absorbed
//! by [`crate::normalize`]. Unknown upstream fields are ignored on
//! deserialization; a record missing its id or role fails to decode.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use trellis_core::{CredentialRole, PresentationRole};

use crate::error::AgentError;

/// An upstream pairwise-connection record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionRecord {
    pub connection_id: String,
    pub connection_protocol: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub invitation_mode: Option<String>,
    pub their_role: Option<String>,
    /// rfc23 state vocabulary; the legacy `state` field is ignored.
    pub rfc23_state: Option<String>,
    pub alias: Option<String>,
    pub my_did: Option<String>,
    pub their_did: Option<String>,
    pub their_label: Option<String>,
    pub their_public_did: Option<String>,
    pub error_msg: Option<String>,
    pub invitation_key: Option<String>,
    pub invitation_msg_id: Option<String>,
}

/// Attribute preview carried inside credential proposals and offers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CredentialPreview {
    #[serde(default)]
    pub attributes: Vec<CredentialPreviewAttribute>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialPreviewAttribute {
    pub name: String,
    pub value: String,
    #[serde(rename = "mime-type")]
    pub mime_type: Option<String>,
}

/// v1 credential-exchange record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct V1CredentialExchangeRecord {
    pub credential_exchange_id: String,
    pub connection_id: Option<String>,
    pub role: CredentialRole,
    /// Underscore-separated v1 state token.
    pub state: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub schema_id: Option<String>,
    pub credential_definition_id: Option<String>,
    pub credential_proposal_dict: Option<V1CredentialProposal>,
    pub credential_offer_dict: Option<V1CredentialOffer>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct V1CredentialProposal {
    pub credential_proposal: Option<CredentialPreview>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct V1CredentialOffer {
    pub credential_preview: Option<CredentialPreview>,
}

/// v2 credential-exchange record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct V2CredentialExchangeRecord {
    pub cred_ex_id: String,
    pub connection_id: Option<String>,
    pub role: CredentialRole,
    /// Canonical kebab-case state token.
    pub state: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub cred_preview: Option<CredentialPreview>,
    pub cred_offer: Option<V2CredentialMessage>,
    pub cred_proposal: Option<V2CredentialMessage>,
    pub by_format: Option<V2CredentialFormats>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct V2CredentialMessage {
    pub credential_preview: Option<CredentialPreview>,
}

/// Per-format payloads of a v2 credential exchange, keyed by format name
/// (`"indy"`, …).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct V2CredentialFormats {
    pub cred_offer: Option<HashMap<String, serde_json::Value>>,
    pub cred_proposal: Option<HashMap<String, serde_json::Value>>,
}

/// v1 presentation-exchange record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct V1PresentationExchangeRecord {
    pub presentation_exchange_id: String,
    pub connection_id: Option<String>,
    pub role: PresentationRole,
    /// Underscore-separated v1 state token.
    pub state: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub presentation: Option<serde_json::Value>,
    pub presentation_request: Option<serde_json::Value>,
    /// Upstream encodes the verification outcome as the strings "true" /
    /// "false"; anything else means not verified yet.
    pub verified: Option<String>,
}

/// v2 presentation-exchange record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct V2PresentationExchangeRecord {
    pub pres_ex_id: String,
    pub connection_id: Option<String>,
    pub role: PresentationRole,
    /// Canonical kebab-case state token.
    pub state: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub by_format: Option<V2PresentationFormats>,
    pub verified: Option<String>,
}

/// Per-format payloads of a v2 presentation exchange, keyed by format name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct V2PresentationFormats {
    pub pres: Option<HashMap<String, serde_json::Value>>,
    pub pres_request: Option<HashMap<String, serde_json::Value>>,
}

/// A presentation-exchange record of either protocol generation.
///
/// Closed variant set: normalization matches on it exhaustively, so a new
/// protocol generation is a compile-time concern, not a runtime type check.
#[derive(Debug, Clone)]
pub enum PresentationRecord {
    V1(V1PresentationExchangeRecord),
    V2(V2PresentationExchangeRecord),
}

impl PresentationRecord {
    /// Classify a loose JSON record by its id field and decode it.
    ///
    /// Any shape carrying neither generation's id field is rejected.
    pub fn from_value(value: serde_json::Value) -> Result<Self, AgentError> {
        if value.get("pres_ex_id").is_some() {
            Ok(Self::V2(serde_json::from_value(value)?))
        } else if value.get("presentation_exchange_id").is_some() {
            Ok(Self::V1(serde_json::from_value(value)?))
        } else {
            Err(AgentError::UnknownRecordFormat(
                "presentation exchange".into(),
            ))
        }
    }
}

/// Request body for sending a v1 credential offer upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct V1CredentialOfferRequest {
    pub connection_id: String,
    pub cred_def_id: String,
    pub credential_preview: CredentialPreview,
    pub comment: Option<String>,
}

/// Request body for sending a v2 credential offer upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct V2CredentialOfferRequest {
    pub connection_id: String,
    /// Per-format filter, keyed by format name (`"indy"`, …).
    pub filter: HashMap<String, serde_json::Value>,
    pub credential_preview: CredentialPreview,
    pub comment: Option<String>,
}
