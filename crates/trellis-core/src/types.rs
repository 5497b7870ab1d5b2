use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Caller roles recognized by the gateway.
///
/// The enumeration is closed: any other `x-role` header value is rejected
/// at the boundary, before an agent handle is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The platform-admin tenant. Talks to the governance agent with its
    /// own API key and never carries a bearer token.
    Governance,
    /// An ecosystem partner tenant. Access is delegated: scoped to one
    /// tenant wallet via a bearer token issued by the tenant's own agent
    /// record.
    Ecosystem,
    /// An end-user (member) tenant. Delegated, like `Ecosystem`.
    Member,
}

impl Role {
    /// Whether this role's upstream access is scoped to a specific tenant
    /// and requires a bearer token issued for that tenant.
    pub fn is_delegated(self) -> bool {
        matches!(self, Self::Ecosystem | Self::Member)
    }

    /// The role name as it appears in the `x-role` header.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Governance => "governance",
            Self::Ecosystem => "ecosystem",
            Self::Member => "member",
        }
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            "governance" => Ok(Self::Governance),
            "ecosystem" => Ok(Self::Ecosystem),
            "member" => Ok(Self::Member),
            other => Err(CoreError::InvalidRole(other.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Protocol generation of an upstream exchange record.
///
/// The two generations expose structurally incompatible record shapes for
/// the same logical entity. Canonical exchange ids carry the generation as
/// a `v1-`/`v2-` prefix so they stay globally unique across both without a
/// new identifier space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExchangeVersion {
    #[serde(rename = "v1")]
    V1,
    #[serde(rename = "v2")]
    V2,
}

impl ExchangeVersion {
    /// The id prefix for this generation.
    pub const fn id_prefix(self) -> &'static str {
        match self {
            Self::V1 => "v1-",
            Self::V2 => "v2-",
        }
    }

    /// Build a canonical exchange id from a bare upstream id.
    pub fn tag_id(self, upstream_id: &str) -> String {
        format!("{}{}", self.id_prefix(), upstream_id)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::V1 => "v1",
            Self::V2 => "v2",
        }
    }
}

impl fmt::Display for ExchangeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Split a canonical exchange id into its protocol generation and the bare
/// upstream id.
pub fn split_exchange_id(id: &str) -> Result<(ExchangeVersion, &str), CoreError> {
    if let Some(bare) = id.strip_prefix("v1-") {
        Ok((ExchangeVersion::V1, bare))
    } else if let Some(bare) = id.strip_prefix("v2-") {
        Ok((ExchangeVersion::V2, bare))
    } else {
        Err(CoreError::InvalidExchangeId(id.to_string()))
    }
}

/// A canonical exchange id with the protocol prefix removed.
pub fn exchange_id_without_version(id: &str) -> Result<&str, CoreError> {
    split_exchange_id(id).map(|(_, bare)| bare)
}

/// The side this agent plays in a credential exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialRole {
    Issuer,
    Holder,
}

impl fmt::Display for CredentialRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Issuer => write!(f, "issuer"),
            Self::Holder => write!(f, "holder"),
        }
    }
}

/// The side this agent plays in a presentation exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresentationRole {
    Prover,
    Verifier,
}

impl fmt::Display for PresentationRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Prover => write!(f, "prover"),
            Self::Verifier => write!(f, "verifier"),
        }
    }
}
