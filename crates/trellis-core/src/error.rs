/// Core validation errors.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid role: {0}")]
    InvalidRole(String),

    #[error("exchange id must start with prefix v1- or v2-, got: {0}")]
    InvalidExchangeId(String),
}
