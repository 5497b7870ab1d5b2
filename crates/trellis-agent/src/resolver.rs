//! Multi-tenant agent selection.
//!
//! Given a caller's declared role and credentials, the resolver produces a
//! correctly-scoped, correctly-authenticated [`AgentHandle`]. Either the
//! full handle is produced or resolution fails before anything is returned;
//! once returned, the handle is owned by the request and released when it
//! drops, on every exit path.

use trellis_core::{AgentEndpoints, Role};

use crate::client::{auth_headers, AdminClient, AgentClient};
use crate::error::AgentError;

/// Per-request caller identity, as extracted from the request headers.
#[derive(Debug, Clone)]
pub struct CallerIdentity {
    pub role: Role,
    /// Explicit `x-api-key`, when the caller supplied one.
    pub api_key: Option<String>,
    /// Bearer token issued by the tenant's own agent record. Mandatory for
    /// delegated roles, ignored for the governance role.
    pub auth_token: Option<String>,
    /// Whether the tenant-administration capability is requested in
    /// addition to the plain agent capability.
    pub admin: bool,
}

/// A scoped, authenticated handle to the upstream agent, optionally
/// carrying the tenant-administration capability.
///
/// The handle and everything it owns is released when it drops; normal
/// return, early return, and unwinding all take the same path.
#[derive(Debug)]
pub struct AgentHandle {
    agent: AgentClient,
    admin: Option<AdminClient>,
}

impl AgentHandle {
    /// The plain agent capability.
    pub fn agent(&self) -> &AgentClient {
        &self.agent
    }

    /// The tenant-administration capability, when it was requested at
    /// resolution time.
    pub fn admin(&self) -> Option<&AdminClient> {
        self.admin.as_ref()
    }
}

impl Drop for AgentHandle {
    fn drop(&mut self) {
        tracing::debug!(base_url = %self.agent.base_url(), "agent handle released");
    }
}

/// Resolves caller identities to scoped agent handles.
///
/// Holds the role → base-URL table and the process-wide default API key,
/// injected once at construction. No ambient configuration.
#[derive(Debug, Clone)]
pub struct AgentResolver {
    endpoints: AgentEndpoints,
}

impl AgentResolver {
    pub fn new(endpoints: AgentEndpoints) -> Self {
        Self { endpoints }
    }

    pub fn endpoints(&self) -> &AgentEndpoints {
        &self.endpoints
    }

    /// Resolve a caller to an agent handle.
    ///
    /// Validation happens before any client is built: delegated roles
    /// without a bearer token fail immediately, and the governance role
    /// must always supply its own API key. The configured default key is
    /// substituted for delegated roles only.
    pub fn resolve(&self, caller: &CallerIdentity) -> Result<AgentHandle, AgentError> {
        let base_url = self.endpoints.base_url(caller.role);

        let api_key = match caller.api_key.as_deref() {
            Some(key) => key,
            None if caller.role.is_delegated() => self
                .endpoints
                .default_api_key
                .as_deref()
                .ok_or(AgentError::MissingApiKey(caller.role))?,
            None => return Err(AgentError::MissingApiKey(caller.role)),
        };

        let bearer_token = if caller.role.is_delegated() {
            Some(
                caller
                    .auth_token
                    .as_deref()
                    .ok_or(AgentError::MissingToken(caller.role))?,
            )
        } else {
            None
        };

        let headers = auth_headers(api_key, bearer_token)?;
        let agent = AgentClient::new(base_url, headers.clone())?;
        let admin = if caller.admin {
            Some(AdminClient::new(base_url, headers)?)
        } else {
            None
        };

        tracing::debug!(
            role = %caller.role,
            base_url = %base_url,
            admin = caller.admin,
            "resolved agent handle"
        );

        Ok(AgentHandle { agent, admin })
    }
}
