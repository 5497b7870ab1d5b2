//! Record normalization: upstream shapes → canonical records.
//!
//! Pure functions, no I/O. Each call builds a fresh canonical value from a
//! borrowed upstream record. Missing optional data (no preview, no schema
//! id, unmapped legacy state) normalizes to `None`; only an unrecognizable
//! record shape is an error, and that is rejected before these functions
//! run (see [`crate::records::PresentationRecord::from_value`]).

use std::collections::HashMap;

use trellis_core::{
    Connection, ConnectionState, CredentialExchange, CredentialExchangeState, ExchangeVersion,
    PresentationExchange, PresentationExchangeState,
};

use crate::records::{
    ConnectionRecord, CredentialPreview, PresentationRecord, V1CredentialExchangeRecord,
    V2CredentialExchangeRecord,
};

/// Key of the per-format payload both v2 exchange kinds nest their data
/// under.
const INDY_FORMAT: &str = "indy";

/// Normalize an upstream connection record.
///
/// Fields are copied verbatim; the state comes from `rfc23_state`, which
/// is already canonical, so no translation table applies.
pub fn connection(record: &ConnectionRecord) -> Connection {
    Connection {
        connection_id: record.connection_id.clone(),
        connection_protocol: record.connection_protocol.clone(),
        created_at: record.created_at,
        updated_at: record.updated_at,
        invitation_mode: record.invitation_mode.clone(),
        their_role: record.their_role.clone(),
        state: record
            .rfc23_state
            .as_deref()
            .and_then(ConnectionState::from_canonical),
        alias: record.alias.clone(),
        my_did: record.my_did.clone(),
        their_did: record.their_did.clone(),
        their_label: record.their_label.clone(),
        their_public_did: record.their_public_did.clone(),
        error_msg: record.error_msg.clone(),
        invitation_key: record.invitation_key.clone(),
        invitation_msg_id: record.invitation_msg_id.clone(),
    }
}

/// Normalize a v1 credential-exchange record.
pub fn credential_v1(record: &V1CredentialExchangeRecord) -> CredentialExchange {
    CredentialExchange {
        credential_id: ExchangeVersion::V1.tag_id(&record.credential_exchange_id),
        role: record.role,
        created_at: record.created_at,
        updated_at: record.updated_at,
        protocol_version: ExchangeVersion::V1,
        schema_id: record.schema_id.clone(),
        credential_definition_id: record.credential_definition_id.clone(),
        state: record
            .state
            .as_deref()
            .and_then(CredentialExchangeState::from_v1),
        attributes: v1_attributes(record),
        connection_id: record.connection_id.clone(),
    }
}

/// Normalize a v2 credential-exchange record.
pub fn credential_v2(record: &V2CredentialExchangeRecord) -> CredentialExchange {
    let (schema_id, credential_definition_id) = v2_schema_cred_def(record);
    CredentialExchange {
        credential_id: ExchangeVersion::V2.tag_id(&record.cred_ex_id),
        role: record.role,
        created_at: record.created_at,
        updated_at: record.updated_at,
        protocol_version: ExchangeVersion::V2,
        schema_id,
        credential_definition_id,
        state: record
            .state
            .as_deref()
            .and_then(CredentialExchangeState::from_canonical),
        attributes: v2_attributes(record),
        connection_id: record.connection_id.clone(),
    }
}

/// Normalize a presentation-exchange record of either generation.
pub fn presentation(record: &PresentationRecord) -> PresentationExchange {
    match record {
        PresentationRecord::V2(r) => PresentationExchange {
            proof_id: ExchangeVersion::V2.tag_id(&r.pres_ex_id),
            connection_id: r.connection_id.clone(),
            created_at: r.created_at,
            updated_at: r.updated_at,
            presentation: r
                .by_format
                .as_ref()
                .and_then(|f| f.pres.as_ref())
                .and_then(|m| m.get(INDY_FORMAT))
                .cloned(),
            presentation_request: r
                .by_format
                .as_ref()
                .and_then(|f| f.pres_request.as_ref())
                .and_then(|m| m.get(INDY_FORMAT))
                .cloned(),
            protocol_version: ExchangeVersion::V2,
            role: r.role,
            state: r
                .state
                .as_deref()
                .and_then(PresentationExchangeState::from_canonical),
            verified: verified_flag(r.verified.as_deref()),
        },
        PresentationRecord::V1(r) => PresentationExchange {
            proof_id: ExchangeVersion::V1.tag_id(&r.presentation_exchange_id),
            connection_id: r.connection_id.clone(),
            created_at: r.created_at,
            updated_at: r.updated_at,
            presentation: r.presentation.clone(),
            presentation_request: r.presentation_request.clone(),
            protocol_version: ExchangeVersion::V1,
            role: r.role,
            state: r
                .state
                .as_deref()
                .and_then(PresentationExchangeState::from_v1),
            verified: verified_flag(r.verified.as_deref()),
        },
    }
}

/// v1 attribute preview: proposal dict first, then offer dict.
fn v1_attributes(record: &V1CredentialExchangeRecord) -> Option<HashMap<String, String>> {
    let preview = record
        .credential_proposal_dict
        .as_ref()
        .and_then(|p| p.credential_proposal.as_ref())
        .or_else(|| {
            record
                .credential_offer_dict
                .as_ref()
                .and_then(|o| o.credential_preview.as_ref())
        })?;
    Some(preview_attributes(preview))
}

/// v2 attribute preview: direct preview first, then offer, then proposal.
fn v2_attributes(record: &V2CredentialExchangeRecord) -> Option<HashMap<String, String>> {
    let preview = record
        .cred_preview
        .as_ref()
        .or_else(|| {
            record
                .cred_offer
                .as_ref()
                .and_then(|o| o.credential_preview.as_ref())
        })
        .or_else(|| {
            record
                .cred_proposal
                .as_ref()
                .and_then(|p| p.credential_preview.as_ref())
        })?;
    Some(preview_attributes(preview))
}

fn preview_attributes(preview: &CredentialPreview) -> HashMap<String, String> {
    preview
        .attributes
        .iter()
        .map(|a| (a.name.clone(), a.value.clone()))
        .collect()
}

/// v2 schema / credential-definition ids: offer format first, then proposal.
fn v2_schema_cred_def(record: &V2CredentialExchangeRecord) -> (Option<String>, Option<String>) {
    let indy = record.by_format.as_ref().and_then(|formats| {
        formats
            .cred_offer
            .as_ref()
            .and_then(|m| m.get(INDY_FORMAT))
            .or_else(|| {
                formats
                    .cred_proposal
                    .as_ref()
                    .and_then(|m| m.get(INDY_FORMAT))
            })
    });
    match indy {
        Some(payload) => (
            payload
                .get("schema_id")
                .and_then(|v| v.as_str())
                .map(str::to_owned),
            payload
                .get("cred_def_id")
                .and_then(|v| v.as_str())
                .map(str::to_owned),
        ),
        None => (None, None),
    }
}

/// Parse the upstream tri-state verified string: "true" / "false" /
/// anything else → unknown.
fn verified_flag(raw: Option<&str>) -> Option<bool> {
    match raw {
        Some("true") => Some(true),
        Some("false") => Some(false),
        _ => None,
    }
}
