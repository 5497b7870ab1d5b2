//! Shared configuration structs.
//!
//! Built once at process start (from TOML plus CLI overrides) and passed
//! by reference into the components that need them, never held as ambient
//! global state.

use serde::{Deserialize, Serialize};

use crate::types::Role;

/// Base URLs and default credentials for the upstream agent instances.
///
/// The role → URL table is fixed at three entries, one per caller role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentEndpoints {
    /// Admin API of the governance (platform) agent.
    #[serde(default = "default_governance_url")]
    pub governance_url: String,
    /// Admin API of the multi-tenant agent serving ecosystem tenants.
    #[serde(default = "default_ecosystem_url")]
    pub ecosystem_url: String,
    /// Admin API of the multi-tenant agent serving member tenants.
    #[serde(default = "default_member_url")]
    pub member_url: String,
    /// Fallback `x-api-key` substituted for delegated roles when the caller
    /// supplies none. Never applied to the governance role.
    #[serde(default)]
    pub default_api_key: Option<String>,
}

impl AgentEndpoints {
    /// Base URL for a caller role.
    pub fn base_url(&self, role: Role) -> &str {
        match role {
            Role::Governance => &self.governance_url,
            Role::Ecosystem => &self.ecosystem_url,
            Role::Member => &self.member_url,
        }
    }
}

impl Default for AgentEndpoints {
    fn default() -> Self {
        Self {
            governance_url: default_governance_url(),
            ecosystem_url: default_ecosystem_url(),
            member_url: default_member_url(),
            default_api_key: None,
        }
    }
}

/// Location of the trust registry service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    #[serde(default = "default_registry_url")]
    pub url: String,
    /// API key sent with registry requests, when the registry requires one.
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            url: default_registry_url(),
            api_key: None,
        }
    }
}

fn default_governance_url() -> String {
    "http://localhost:8021".into()
}
fn default_ecosystem_url() -> String {
    "http://localhost:8031".into()
}
fn default_member_url() -> String {
    "http://localhost:8041".into()
}
fn default_registry_url() -> String {
    "http://localhost:8001".into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoints() {
        let endpoints = AgentEndpoints::default();
        assert_eq!(endpoints.governance_url, "http://localhost:8021");
        assert_eq!(endpoints.ecosystem_url, "http://localhost:8031");
        assert_eq!(endpoints.member_url, "http://localhost:8041");
        assert!(endpoints.default_api_key.is_none());
    }

    #[test]
    fn test_base_url_table() {
        let endpoints = AgentEndpoints {
            governance_url: "http://gov:1".into(),
            ecosystem_url: "http://eco:2".into(),
            member_url: "http://mem:3".into(),
            default_api_key: None,
        };
        assert_eq!(endpoints.base_url(Role::Governance), "http://gov:1");
        assert_eq!(endpoints.base_url(Role::Ecosystem), "http://eco:2");
        assert_eq!(endpoints.base_url(Role::Member), "http://mem:3");
    }

    #[test]
    fn test_endpoints_partial_deserialization() {
        let json = r#"{ "member_url": "http://tenants:9999" }"#;
        let endpoints: AgentEndpoints = serde_json::from_str(json).unwrap();
        assert_eq!(endpoints.member_url, "http://tenants:9999");
        // Unspecified fields fall back to defaults.
        assert_eq!(endpoints.governance_url, "http://localhost:8021");
    }

    #[test]
    fn test_registry_config_default() {
        let config = RegistryConfig::default();
        assert_eq!(config.url, "http://localhost:8001");
        assert!(config.api_key.is_none());
    }
}
