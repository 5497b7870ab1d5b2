//! Trellis Core — canonical exchange records, state vocabularies, caller
//! roles, and shared configuration.
//!
//! Everything in this crate is pure data: no I/O, no shared state. The
//! canonical record shapes defined here are what every downstream consumer
//! of the gateway sees, independent of which upstream protocol generation
//! produced them.

pub mod config;
pub mod error;
pub mod records;
pub mod states;
pub mod types;

pub use config::{AgentEndpoints, RegistryConfig};
pub use error::CoreError;
pub use records::{Connection, CredentialExchange, PresentationExchange};
pub use states::{ConnectionState, CredentialExchangeState, PresentationExchangeState};
pub use types::{
    exchange_id_without_version, split_exchange_id, CredentialRole, ExchangeVersion,
    PresentationRole, Role,
};
