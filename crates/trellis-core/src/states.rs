//! Canonical state vocabularies and the v1 translation tables.
//!
//! The v2 protocol generation already emits these canonical hyphen-separated
//! tokens; the v1 generation emits underscore-separated tokens that are
//! translated here. An unmapped v1 token translates to "no value", never an
//! error: a state outside the table is a benign gap, not a contract break.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Connection states, rfc23 vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConnectionState {
    Start,
    InvitationSent,
    InvitationReceived,
    RequestSent,
    RequestReceived,
    ResponseSent,
    ResponseReceived,
    Completed,
    Abandoned,
    Error,
}

impl ConnectionState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::InvitationSent => "invitation-sent",
            Self::InvitationReceived => "invitation-received",
            Self::RequestSent => "request-sent",
            Self::RequestReceived => "request-received",
            Self::ResponseSent => "response-sent",
            Self::ResponseReceived => "response-received",
            Self::Completed => "completed",
            Self::Abandoned => "abandoned",
            Self::Error => "error",
        }
    }

    /// Parse a canonical (rfc23) state token. Unknown tokens yield `None`.
    pub fn from_canonical(s: &str) -> Option<Self> {
        match s {
            "start" => Some(Self::Start),
            "invitation-sent" => Some(Self::InvitationSent),
            "invitation-received" => Some(Self::InvitationReceived),
            "request-sent" => Some(Self::RequestSent),
            "request-received" => Some(Self::RequestReceived),
            "response-sent" => Some(Self::ResponseSent),
            "response-received" => Some(Self::ResponseReceived),
            "completed" => Some(Self::Completed),
            "abandoned" => Some(Self::Abandoned),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Canonical credential-exchange states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CredentialExchangeState {
    ProposalSent,
    ProposalReceived,
    OfferSent,
    OfferReceived,
    RequestSent,
    RequestReceived,
    CredentialIssued,
    CredentialReceived,
    CredentialAcked,
    Abandoned,
    Done,
}

impl CredentialExchangeState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ProposalSent => "proposal-sent",
            Self::ProposalReceived => "proposal-received",
            Self::OfferSent => "offer-sent",
            Self::OfferReceived => "offer-received",
            Self::RequestSent => "request-sent",
            Self::RequestReceived => "request-received",
            Self::CredentialIssued => "credential-issued",
            Self::CredentialReceived => "credential-received",
            Self::CredentialAcked => "credential-acked",
            Self::Abandoned => "abandoned",
            Self::Done => "done",
        }
    }

    /// Parse a canonical state token, as emitted by the v2 generation.
    /// Unknown tokens yield `None`.
    pub fn from_canonical(s: &str) -> Option<Self> {
        match s {
            "proposal-sent" => Some(Self::ProposalSent),
            "proposal-received" => Some(Self::ProposalReceived),
            "offer-sent" => Some(Self::OfferSent),
            "offer-received" => Some(Self::OfferReceived),
            "request-sent" => Some(Self::RequestSent),
            "request-received" => Some(Self::RequestReceived),
            "credential-issued" => Some(Self::CredentialIssued),
            "credential-received" => Some(Self::CredentialReceived),
            "credential-acked" => Some(Self::CredentialAcked),
            "abandoned" => Some(Self::Abandoned),
            "done" => Some(Self::Done),
            _ => None,
        }
    }

    /// Translate a v1-era underscore-separated state token.
    /// Unmapped tokens yield `None`.
    pub fn from_v1(s: &str) -> Option<Self> {
        match s {
            "proposal_sent" => Some(Self::ProposalSent),
            "proposal_received" => Some(Self::ProposalReceived),
            "offer_sent" => Some(Self::OfferSent),
            "offer_received" => Some(Self::OfferReceived),
            "request_sent" => Some(Self::RequestSent),
            "request_received" => Some(Self::RequestReceived),
            "credential_issued" => Some(Self::CredentialIssued),
            "credential_received" => Some(Self::CredentialReceived),
            "credential_acked" => Some(Self::CredentialAcked),
            "abandoned" => Some(Self::Abandoned),
            _ => None,
        }
    }
}

impl fmt::Display for CredentialExchangeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Canonical presentation-exchange states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PresentationExchangeState {
    ProposalSent,
    ProposalReceived,
    RequestSent,
    RequestReceived,
    PresentationSent,
    PresentationReceived,
    Verified,
    PresentationAcked,
    Abandoned,
    Done,
}

impl PresentationExchangeState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ProposalSent => "proposal-sent",
            Self::ProposalReceived => "proposal-received",
            Self::RequestSent => "request-sent",
            Self::RequestReceived => "request-received",
            Self::PresentationSent => "presentation-sent",
            Self::PresentationReceived => "presentation-received",
            Self::Verified => "verified",
            Self::PresentationAcked => "presentation-acked",
            Self::Abandoned => "abandoned",
            Self::Done => "done",
        }
    }

    /// Parse a canonical state token, as emitted by the v2 generation.
    /// Unknown tokens yield `None`.
    pub fn from_canonical(s: &str) -> Option<Self> {
        match s {
            "proposal-sent" => Some(Self::ProposalSent),
            "proposal-received" => Some(Self::ProposalReceived),
            "request-sent" => Some(Self::RequestSent),
            "request-received" => Some(Self::RequestReceived),
            "presentation-sent" => Some(Self::PresentationSent),
            "presentation-received" => Some(Self::PresentationReceived),
            "verified" => Some(Self::Verified),
            "presentation-acked" => Some(Self::PresentationAcked),
            "abandoned" => Some(Self::Abandoned),
            "done" => Some(Self::Done),
            _ => None,
        }
    }

    /// Translate a v1-era underscore-separated state token.
    /// Unmapped tokens yield `None`.
    pub fn from_v1(s: &str) -> Option<Self> {
        match s {
            "proposal_sent" => Some(Self::ProposalSent),
            "proposal_received" => Some(Self::ProposalReceived),
            "request_sent" => Some(Self::RequestSent),
            "request_received" => Some(Self::RequestReceived),
            "presentation_sent" => Some(Self::PresentationSent),
            "presentation_received" => Some(Self::PresentationReceived),
            "verified" => Some(Self::Verified),
            "presentation_acked" => Some(Self::PresentationAcked),
            "abandoned" => Some(Self::Abandoned),
            _ => None,
        }
    }
}

impl fmt::Display for PresentationExchangeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_v1_translation() {
        assert_eq!(
            CredentialExchangeState::from_v1("credential_acked"),
            Some(CredentialExchangeState::CredentialAcked)
        );
        assert_eq!(
            CredentialExchangeState::from_v1("offer_sent"),
            Some(CredentialExchangeState::OfferSent)
        );
        assert_eq!(
            CredentialExchangeState::from_v1("request_received"),
            Some(CredentialExchangeState::RequestReceived)
        );
    }

    #[test]
    fn test_credential_v1_unknown_token_is_none() {
        assert_eq!(CredentialExchangeState::from_v1("unknown_token"), None);
        assert_eq!(CredentialExchangeState::from_v1(""), None);
        // Canonical tokens are not valid v1 tokens.
        assert_eq!(CredentialExchangeState::from_v1("offer-sent"), None);
    }

    #[test]
    fn test_presentation_v1_translation() {
        assert_eq!(
            PresentationExchangeState::from_v1("presentation_sent"),
            Some(PresentationExchangeState::PresentationSent)
        );
        assert_eq!(
            PresentationExchangeState::from_v1("verified"),
            Some(PresentationExchangeState::Verified)
        );
        assert_eq!(PresentationExchangeState::from_v1("no_such_state"), None);
    }

    #[test]
    fn test_v1_table_matches_canonical_tokens() {
        // Every v1 underscore token maps to the state whose canonical form
        // is the same token with hyphens.
        for token in [
            "proposal_sent",
            "proposal_received",
            "offer_sent",
            "offer_received",
            "request_sent",
            "request_received",
            "credential_issued",
            "credential_received",
            "credential_acked",
        ] {
            let state = CredentialExchangeState::from_v1(token).unwrap();
            assert_eq!(state.as_str(), token.replace('_', "-"));
        }
    }

    #[test]
    fn test_canonical_roundtrip() {
        for state in [
            CredentialExchangeState::ProposalSent,
            CredentialExchangeState::OfferReceived,
            CredentialExchangeState::CredentialIssued,
            CredentialExchangeState::Done,
        ] {
            assert_eq!(
                CredentialExchangeState::from_canonical(state.as_str()),
                Some(state)
            );
        }
        for state in [
            PresentationExchangeState::RequestSent,
            PresentationExchangeState::PresentationReceived,
            PresentationExchangeState::PresentationAcked,
        ] {
            assert_eq!(
                PresentationExchangeState::from_canonical(state.as_str()),
                Some(state)
            );
        }
    }

    #[test]
    fn test_serde_uses_kebab_case() {
        assert_eq!(
            serde_json::to_string(&CredentialExchangeState::CredentialAcked).unwrap(),
            "\"credential-acked\""
        );
        assert_eq!(
            serde_json::to_string(&PresentationExchangeState::PresentationSent).unwrap(),
            "\"presentation-sent\""
        );
        let state: ConnectionState = serde_json::from_str("\"invitation-received\"").unwrap();
        assert_eq!(state, ConnectionState::InvitationReceived);
    }

    #[test]
    fn test_connection_state_from_canonical() {
        assert_eq!(
            ConnectionState::from_canonical("completed"),
            Some(ConnectionState::Completed)
        );
        assert_eq!(
            ConnectionState::from_canonical("response-sent"),
            Some(ConnectionState::ResponseSent)
        );
        assert_eq!(ConnectionState::from_canonical("not-a-state"), None);
    }

    #[test]
    fn test_display_matches_as_str() {
        assert_eq!(
            format!("{}", CredentialExchangeState::OfferSent),
            "offer-sent"
        );
        assert_eq!(format!("{}", PresentationExchangeState::Verified), "verified");
        assert_eq!(format!("{}", ConnectionState::Start), "start");
    }
}
