use trellis_core::Role;

/// Errors from the agent resolver and upstream client.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("role {0} requires a bearer token issued for the tenant")]
    MissingToken(Role),

    #[error("no x-api-key supplied and no default applies to role {0}")]
    MissingApiKey(Role),

    #[error("record format unknown: {0}")]
    UnknownRecordFormat(String),

    #[error("credential {0} contains non-ASCII bytes and cannot be sent as a header")]
    InvalidHeader(&'static str),

    #[error("{context} not found upstream")]
    NotFound { context: String },

    #[error("upstream returned status {status} for {context}")]
    UnexpectedStatus { status: u16, context: String },

    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to decode upstream record: {0}")]
    Decode(#[from] serde_json::Error),
}
