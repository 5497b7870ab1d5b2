//! Shared gateway state, built once at startup.

use trellis_agent::AgentResolver;
use trellis_registry::RegistryClient;

/// Everything the route handlers need: the agent resolver (fresh handle per
/// request) and the trust registry client.
#[derive(Debug, Clone)]
pub struct AppState {
    pub resolver: AgentResolver,
    pub registry: RegistryClient,
}
