//! Trellis Agent — the upstream agent surface.
//!
//! Two independent building blocks live here:
//!
//! * the **record normalizer** ([`records`] + [`normalize`]): pure
//!   translation of the upstream agent's protocol v1/v2 record shapes into
//!   the canonical records of `trellis-core`;
//! * the **agent resolver** ([`client`] + [`resolver`]): multi-tenant
//!   selection of a correctly-scoped, correctly-authenticated handle to
//!   the upstream agent, released on every exit path.
//!
//! Neither depends on the other; route handlers compose them.

pub mod client;
pub mod error;
pub mod normalize;
pub mod records;
pub mod resolver;

pub use client::{AdminClient, AgentClient};
pub use error::AgentError;
pub use records::{
    ConnectionRecord, CredentialPreview, CredentialPreviewAttribute, PresentationRecord,
    V1CredentialExchangeRecord, V1CredentialOfferRequest, V1PresentationExchangeRecord,
    V2CredentialExchangeRecord, V2CredentialOfferRequest, V2PresentationExchangeRecord,
};
pub use resolver::{AgentHandle, AgentResolver, CallerIdentity};
