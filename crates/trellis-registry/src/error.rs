/// Trust registry client errors.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("trust registry returned status {status}")]
    Unavailable { status: u16 },

    #[error("trust registry request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("registry api key contains non-ASCII bytes")]
    InvalidApiKey,
}
