use std::fmt;

use serde::{Deserialize, Serialize};

/// Roles an actor can hold in the trust registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorRole {
    Issuer,
    Verifier,
}

impl fmt::Display for ActorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Issuer => write!(f, "issuer"),
            Self::Verifier => write!(f, "verifier"),
        }
    }
}

/// A known actor in the trust registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub id: String,
    pub name: String,
    pub roles: Vec<ActorRole>,
    pub did: String,
    /// Schema ids this actor is approved to issue against.
    #[serde(default)]
    pub schemas: Vec<String>,
    pub didcomm_invitation: Option<String>,
}

impl Actor {
    pub fn has_role(&self, role: ActorRole) -> bool {
        self.roles.contains(&role)
    }

    pub fn has_schema(&self, schema_id: &str) -> bool {
        self.schemas.iter().any(|s| s == schema_id)
    }
}

/// A credential schema known to the trust registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrySchema {
    /// Composite id: `did:2:name:version`.
    pub id: String,
    pub did: String,
    pub name: String,
    pub version: String,
}

impl RegistrySchema {
    /// Build a schema entry, composing the id from its parts.
    pub fn new(did: impl Into<String>, name: impl Into<String>, version: impl Into<String>) -> Self {
        let (did, name, version) = (did.into(), name.into(), version.into());
        Self {
            id: format!("{did}:2:{name}:{version}"),
            did,
            name,
            version,
        }
    }
}
