//! Integration test: Upstream records through the normalizer into
//! canonical records, across both protocol generations.

use serde_json::json;

use trellis_agent::normalize;
use trellis_agent::records::{
    ConnectionRecord, PresentationRecord, V1CredentialExchangeRecord, V2CredentialExchangeRecord,
};
use trellis_core::{
    exchange_id_without_version, split_exchange_id, CredentialExchange, CredentialExchangeState,
    ExchangeVersion, PresentationExchangeState,
};

fn v1_credential_fixture() -> V1CredentialExchangeRecord {
    serde_json::from_value(json!({
        "credential_exchange_id": "83baecfa-2b3c-4d46-a7bb-2f8e33d9a1aa",
        "connection_id": "conn-1",
        "role": "issuer",
        "state": "offer_sent",
        "created_at": "2023-02-01T09:00:00Z",
        "updated_at": "2023-02-01T09:00:05Z",
        "schema_id": "did:sov:WgWxqztrNooG92RXvxSTWv:2:degree:1.0",
        "credential_definition_id": "WgWxqztrNooG92RXvxSTWv:3:CL:20:tag",
        "credential_offer_dict": {
            "credential_preview": {
                "attributes": [
                    {"name": "surname", "value": "Dlamini"},
                    {"name": "degree", "value": "Maths"}
                ]
            }
        },
        "initiator": "self",
        "trace": false
    }))
    .expect("fixture decodes")
}

fn v2_credential_fixture() -> V2CredentialExchangeRecord {
    serde_json::from_value(json!({
        "cred_ex_id": "42",
        "connection_id": "conn-2",
        "role": "holder",
        "state": "offer-received",
        "by_format": {
            "cred_offer": {"indy": {"schema_id": "S1", "cred_def_id": "C1"}}
        },
        "cred_offer": {
            "credential_preview": {
                "attributes": [{"name": "surname", "value": "Mokoena"}]
            }
        }
    }))
    .expect("fixture decodes")
}

// =========================================================================
// Credential exchanges
// =========================================================================

#[test]
fn test_v1_credential_normalizes_end_to_end() {
    let record = v1_credential_fixture();
    let exchange = normalize::credential_v1(&record);

    assert_eq!(
        exchange.credential_id,
        "v1-83baecfa-2b3c-4d46-a7bb-2f8e33d9a1aa"
    );
    assert_eq!(exchange.protocol_version, ExchangeVersion::V1);
    assert_eq!(exchange.state, Some(CredentialExchangeState::OfferSent));
    assert_eq!(
        exchange.schema_id.as_deref(),
        Some("did:sov:WgWxqztrNooG92RXvxSTWv:2:degree:1.0")
    );
    let attributes = exchange.attributes.as_ref().expect("offer preview present");
    assert_eq!(attributes["surname"], "Dlamini");
    assert_eq!(attributes["degree"], "Maths");
    assert!(exchange.id_matches_version());
}

#[test]
fn test_v2_credential_normalizes_end_to_end() {
    let record = v2_credential_fixture();
    let exchange = normalize::credential_v2(&record);

    assert_eq!(exchange.credential_id, "v2-42");
    assert_eq!(exchange.schema_id.as_deref(), Some("S1"));
    assert_eq!(exchange.credential_definition_id.as_deref(), Some("C1"));
    assert_eq!(exchange.state, Some(CredentialExchangeState::OfferReceived));
    assert_eq!(
        exchange.attributes.as_ref().expect("preview")["surname"],
        "Mokoena"
    );
}

#[test]
fn test_merged_listing_spans_both_generations() {
    // What the gateway's listing route does: normalize each generation's
    // list and chain them into one canonical list.
    let merged: Vec<CredentialExchange> = std::iter::once(&v1_credential_fixture())
        .map(normalize::credential_v1)
        .chain(std::iter::once(&v2_credential_fixture()).map(normalize::credential_v2))
        .collect();

    assert_eq!(merged.len(), 2);
    assert!(merged.iter().all(|e| e.id_matches_version()));

    // Canonical ids survive the round trip back to the upstream id.
    let (version, bare) = split_exchange_id(&merged[1].credential_id).unwrap();
    assert_eq!(version, ExchangeVersion::V2);
    assert_eq!(bare, "42");
}

#[test]
fn test_canonical_serialization_uses_unified_vocabulary() {
    let v1 = serde_json::to_value(normalize::credential_v1(&v1_credential_fixture())).unwrap();
    let v2 = serde_json::to_value(normalize::credential_v2(&v2_credential_fixture())).unwrap();

    // One vocabulary, regardless of the generation that produced the record.
    assert_eq!(v1["state"], "offer-sent");
    assert_eq!(v2["state"], "offer-received");
    assert_eq!(v1["protocol_version"], "v1");
    assert_eq!(v2["protocol_version"], "v2");
}

// =========================================================================
// Presentation exchanges
// =========================================================================

#[test]
fn test_presentation_flow_v1() {
    let record = PresentationRecord::from_value(json!({
        "presentation_exchange_id": "9",
        "connection_id": "conn-9",
        "role": "prover",
        "state": "presentation_sent",
        "verified": "unknown-yet",
        "presentation": {"requested_proof": {}},
        "presentation_request": {"name": "degree-check", "version": "1.0"}
    }))
    .unwrap();
    let exchange = normalize::presentation(&record);

    assert_eq!(exchange.proof_id, "v1-9");
    assert_eq!(
        exchange.state,
        Some(PresentationExchangeState::PresentationSent)
    );
    assert_eq!(exchange.verified, None);
    assert_eq!(
        exchange.presentation_request.as_ref().unwrap()["name"],
        "degree-check"
    );
}

#[test]
fn test_presentation_flow_v2() {
    let record = PresentationRecord::from_value(json!({
        "pres_ex_id": "15",
        "role": "verifier",
        "state": "done",
        "verified": "true",
        "by_format": {
            "pres": {"indy": {"proof": {}}},
            "pres_request": {"indy": {"name": "degree-check"}}
        }
    }))
    .unwrap();
    let exchange = normalize::presentation(&record);

    assert_eq!(exchange.proof_id, "v2-15");
    assert_eq!(exchange.verified, Some(true));
    assert_eq!(exchange.state, Some(PresentationExchangeState::Done));
    assert_eq!(
        exchange.presentation_request.as_ref().unwrap()["name"],
        "degree-check"
    );
}

#[test]
fn test_unknown_presentation_shape_is_rejected() {
    let result = PresentationRecord::from_value(json!({
        "some_other_id": "1",
        "state": "done"
    }));
    assert!(result.is_err(), "unknown record shape must not normalize");
}

// =========================================================================
// Connections and exchange ids
// =========================================================================

#[test]
fn test_connection_normalization() {
    let record: ConnectionRecord = serde_json::from_value(json!({
        "connection_id": "conn-1",
        "connection_protocol": "didexchange/1.0",
        "rfc23_state": "completed",
        "their_label": "Faber College",
        "their_role": "issuer",
        "invitation_mode": "once",
        "created_at": "2023-02-01T09:00:00Z"
    }))
    .unwrap();
    let connection = normalize::connection(&record);

    assert_eq!(connection.connection_id, "conn-1");
    assert_eq!(connection.state.unwrap().as_str(), "completed");
    assert_eq!(connection.their_label.as_deref(), Some("Faber College"));
}

#[test]
fn test_exchange_id_round_trip() {
    assert_eq!(exchange_id_without_version("v1-abc123").unwrap(), "abc123");
    assert_eq!(
        ExchangeVersion::V2.tag_id("abc123"),
        "v2-abc123".to_string()
    );
    assert!(exchange_id_without_version("abc123").is_err());
}
