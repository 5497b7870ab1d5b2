//! HTTP client for the trust registry service.

use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;

use trellis_core::RegistryConfig;

use crate::error::RegistryError;
use crate::models::{Actor, ActorRole, RegistrySchema};

/// Client for the trust registry's lookup API.
///
/// Lookups distinguish "not found" (404 → `None` / `false`) from "registry
/// unavailable" (any other non-2xx → [`RegistryError::Unavailable`]).
#[derive(Debug, Clone)]
pub struct RegistryClient {
    http: reqwest::Client,
    base_url: String,
}

impl RegistryClient {
    pub fn new(config: &RegistryConfig) -> Result<Self, RegistryError> {
        let mut headers = HeaderMap::new();
        if let Some(key) = config.api_key.as_deref() {
            let mut value =
                HeaderValue::from_str(key).map_err(|_| RegistryError::InvalidApiKey)?;
            value.set_sensitive(true);
            headers.insert("x-api-key", value);
        }
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;
        Ok(Self {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// GET a registry entry. 404 is `None`; any other non-2xx is an error.
    async fn fetch_optional<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Option<T>, RegistryError> {
        let response = self.http.get(self.endpoint(path)).send().await?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(RegistryError::Unavailable {
                status: status.as_u16(),
            });
        }
        Ok(Some(response.json::<T>().await?))
    }

    /// Look up an actor by id.
    pub async fn actor(&self, actor_id: &str) -> Result<Option<Actor>, RegistryError> {
        self.fetch_optional(&format!("actors/{actor_id}")).await
    }

    /// Look up a schema by id.
    pub async fn schema(&self, schema_id: &str) -> Result<Option<RegistrySchema>, RegistryError> {
        self.fetch_optional(&format!("schemas/{schema_id}")).await
    }

    /// Whether the actor exists and holds the given role.
    pub async fn actor_has_role(
        &self,
        actor_id: &str,
        role: ActorRole,
    ) -> Result<bool, RegistryError> {
        Ok(self
            .actor(actor_id)
            .await?
            .is_some_and(|actor| actor.has_role(role)))
    }

    /// Whether the actor exists and is approved for the given schema.
    pub async fn actor_has_schema(
        &self,
        actor_id: &str,
        schema_id: &str,
    ) -> Result<bool, RegistryError> {
        Ok(self
            .actor(actor_id)
            .await?
            .is_some_and(|actor| actor.has_schema(schema_id)))
    }

    /// Whether the schema is registered at all.
    pub async fn has_schema(&self, schema_id: &str) -> Result<bool, RegistryError> {
        Ok(self.schema(schema_id).await?.is_some())
    }

    /// Register an actor.
    pub async fn register_actor(&self, actor: &Actor) -> Result<Actor, RegistryError> {
        self.post_json("actors", actor).await
    }

    /// Register a schema.
    pub async fn register_schema(
        &self,
        schema: &RegistrySchema,
    ) -> Result<RegistrySchema, RegistryError> {
        self.post_json("schemas", schema).await
    }

    async fn post_json<B: serde::Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, RegistryError> {
        let response = self
            .http
            .post(self.endpoint(path))
            .json(body)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RegistryError::Unavailable {
                status: status.as_u16(),
            });
        }
        Ok(response.json::<T>().await?)
    }
}
