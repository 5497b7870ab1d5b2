//! Trellis Registry — client for the external trust registry of known
//! actors and credential schemas.
//!
//! The registry is reached over plain HTTP key lookups. "Not found" and
//! "registry unavailable" are distinct outcomes throughout: a 404 is a
//! negative answer (`None` / `false`), any other failure is an error and
//! never masked as a negative answer.

pub mod client;
pub mod error;
pub mod models;

pub use client::RegistryClient;
pub use error::RegistryError;
pub use models::{Actor, ActorRole, RegistrySchema};
