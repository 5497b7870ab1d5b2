//! Scoped HTTP clients for the upstream agent's REST API.
//!
//! An [`AgentClient`] is bound to one base URL and one fixed header set for
//! its whole life; it is built by the resolver, owned by a single request,
//! and released when the owning [`crate::resolver::AgentHandle`] drops.
//! The [`AdminClient`] is the same thing scoped to the tenant-management
//! sub-API.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::AgentError;
use crate::records::{
    ConnectionRecord, V1CredentialExchangeRecord, V1CredentialOfferRequest,
    V1PresentationExchangeRecord, V2CredentialExchangeRecord, V2CredentialOfferRequest,
    V2PresentationExchangeRecord,
};

pub(crate) const API_KEY_HEADER: &str = "x-api-key";

/// Build the header set for a scoped client: `x-api-key` always,
/// `authorization: Bearer …` only when a tenant token is given.
pub(crate) fn auth_headers(
    api_key: &str,
    bearer_token: Option<&str>,
) -> Result<HeaderMap, AgentError> {
    let mut headers = HeaderMap::new();
    let mut key =
        HeaderValue::from_str(api_key).map_err(|_| AgentError::InvalidHeader(API_KEY_HEADER))?;
    key.set_sensitive(true);
    headers.insert(API_KEY_HEADER, key);
    if let Some(token) = bearer_token {
        let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| AgentError::InvalidHeader("authorization"))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }
    Ok(headers)
}

/// Connection state shared by nothing: one core per scoped client, so a
/// dropped client is a released connection.
#[derive(Debug)]
pub(crate) struct ClientCore {
    http: reqwest::Client,
    base_url: String,
    pub(crate) headers: HeaderMap,
}

impl ClientCore {
    fn new(base_url: &str, headers: HeaderMap) -> Result<Self, AgentError> {
        let http = reqwest::Client::builder()
            .default_headers(headers.clone())
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            headers,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        context: &str,
    ) -> Result<T, AgentError> {
        let response = self.http.get(self.endpoint(path)).send().await?;
        decode(response, context).await
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        context: &str,
    ) -> Result<T, AgentError> {
        let response = self.http.post(self.endpoint(path)).json(body).send().await?;
        decode(response, context).await
    }
}

async fn decode<T: DeserializeOwned>(
    response: reqwest::Response,
    context: &str,
) -> Result<T, AgentError> {
    let status = response.status();
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(AgentError::NotFound {
            context: context.to_string(),
        });
    }
    if !status.is_success() {
        return Err(AgentError::UnexpectedStatus {
            status: status.as_u16(),
            context: context.to_string(),
        });
    }
    Ok(response.json::<T>().await?)
}

/// List envelope the upstream wraps collection responses in.
#[derive(Debug, Deserialize)]
struct ResultsEnvelope<T> {
    results: Vec<T>,
}

/// A scoped, authenticated handle to one upstream agent instance.
///
/// Deliberately not `Clone`: the request that acquired it owns it, and the
/// connection is released exactly once, when the handle drops.
#[derive(Debug)]
pub struct AgentClient {
    pub(crate) inner: Arc<ClientCore>,
}

impl AgentClient {
    pub(crate) fn new(base_url: &str, headers: HeaderMap) -> Result<Self, AgentError> {
        Ok(Self {
            inner: Arc::new(ClientCore::new(base_url, headers)?),
        })
    }

    /// The base URL this client is scoped to.
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    // --- Connections ---

    pub async fn list_connections(&self) -> Result<Vec<ConnectionRecord>, AgentError> {
        self.inner
            .get_json::<ResultsEnvelope<ConnectionRecord>>("connections", "connection list")
            .await
            .map(|envelope| envelope.results)
    }

    pub async fn get_connection(
        &self,
        connection_id: &str,
    ) -> Result<ConnectionRecord, AgentError> {
        self.inner
            .get_json(&format!("connections/{connection_id}"), "connection")
            .await
    }

    // --- Credential exchanges ---

    pub async fn list_credential_exchanges_v1(
        &self,
    ) -> Result<Vec<V1CredentialExchangeRecord>, AgentError> {
        self.inner
            .get_json::<ResultsEnvelope<V1CredentialExchangeRecord>>(
                "issue-credential/records",
                "v1 credential exchange list",
            )
            .await
            .map(|envelope| envelope.results)
    }

    pub async fn get_credential_exchange_v1(
        &self,
        exchange_id: &str,
    ) -> Result<V1CredentialExchangeRecord, AgentError> {
        self.inner
            .get_json(
                &format!("issue-credential/records/{exchange_id}"),
                "v1 credential exchange",
            )
            .await
    }

    pub async fn send_credential_offer_v1(
        &self,
        offer: &V1CredentialOfferRequest,
    ) -> Result<V1CredentialExchangeRecord, AgentError> {
        self.inner
            .post_json("issue-credential/send-offer", offer, "v1 credential offer")
            .await
    }

    pub async fn list_credential_exchanges_v2(
        &self,
    ) -> Result<Vec<V2CredentialExchangeRecord>, AgentError> {
        self.inner
            .get_json::<ResultsEnvelope<V2CredentialExchangeRecord>>(
                "issue-credential-2.0/records",
                "v2 credential exchange list",
            )
            .await
            .map(|envelope| envelope.results)
    }

    pub async fn get_credential_exchange_v2(
        &self,
        exchange_id: &str,
    ) -> Result<V2CredentialExchangeRecord, AgentError> {
        self.inner
            .get_json(
                &format!("issue-credential-2.0/records/{exchange_id}"),
                "v2 credential exchange",
            )
            .await
    }

    pub async fn send_credential_offer_v2(
        &self,
        offer: &V2CredentialOfferRequest,
    ) -> Result<V2CredentialExchangeRecord, AgentError> {
        self.inner
            .post_json(
                "issue-credential-2.0/send-offer",
                offer,
                "v2 credential offer",
            )
            .await
    }

    // --- Presentation exchanges ---

    pub async fn list_presentation_exchanges_v1(
        &self,
    ) -> Result<Vec<V1PresentationExchangeRecord>, AgentError> {
        self.inner
            .get_json::<ResultsEnvelope<V1PresentationExchangeRecord>>(
                "present-proof/records",
                "v1 presentation exchange list",
            )
            .await
            .map(|envelope| envelope.results)
    }

    pub async fn get_presentation_exchange_v1(
        &self,
        exchange_id: &str,
    ) -> Result<V1PresentationExchangeRecord, AgentError> {
        self.inner
            .get_json(
                &format!("present-proof/records/{exchange_id}"),
                "v1 presentation exchange",
            )
            .await
    }

    pub async fn list_presentation_exchanges_v2(
        &self,
    ) -> Result<Vec<V2PresentationExchangeRecord>, AgentError> {
        self.inner
            .get_json::<ResultsEnvelope<V2PresentationExchangeRecord>>(
                "present-proof-2.0/records",
                "v2 presentation exchange list",
            )
            .await
            .map(|envelope| envelope.results)
    }

    pub async fn get_presentation_exchange_v2(
        &self,
        exchange_id: &str,
    ) -> Result<V2PresentationExchangeRecord, AgentError> {
        self.inner
            .get_json(
                &format!("present-proof-2.0/records/{exchange_id}"),
                "v2 presentation exchange",
            )
            .await
    }

    // --- Wallet / DID pass-through ---
    //
    // Wallet and DID payloads are forwarded opaquely; the gateway does not
    // normalize them.

    pub async fn create_local_did(&self) -> Result<serde_json::Value, AgentError> {
        self.inner
            .post_json("wallet/did/create", &serde_json::json!({}), "wallet did")
            .await
    }

    pub async fn list_dids(&self) -> Result<serde_json::Value, AgentError> {
        self.inner.get_json("wallet/did", "wallet did list").await
    }

    pub async fn public_did(&self) -> Result<serde_json::Value, AgentError> {
        self.inner
            .get_json("wallet/did/public", "public did")
            .await
    }

    pub async fn set_public_did(&self, did: &str) -> Result<serde_json::Value, AgentError> {
        self.inner
            .post_json(
                &format!("wallet/did/public?did={did}"),
                &serde_json::json!({}),
                "public did",
            )
            .await
    }
}

/// A scoped handle to the tenant-administration sub-API of an agent.
///
/// Same base URL as the plain client, scoped to the `multitenancy`
/// sub-path; same ownership and release rules.
#[derive(Debug)]
pub struct AdminClient {
    pub(crate) inner: Arc<ClientCore>,
}

impl AdminClient {
    pub(crate) fn new(base_url: &str, headers: HeaderMap) -> Result<Self, AgentError> {
        let scoped = format!("{}/multitenancy", base_url.trim_end_matches('/'));
        Ok(Self {
            inner: Arc::new(ClientCore::new(&scoped, headers)?),
        })
    }

    /// The tenant-management URL this client is scoped to.
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    pub async fn list_tenants(&self) -> Result<serde_json::Value, AgentError> {
        self.inner.get_json("wallets", "tenant list").await
    }

    pub async fn create_tenant(
        &self,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, AgentError> {
        self.inner.post_json("wallet", body, "tenant").await
    }

    pub async fn tenant_token(&self, wallet_id: &str) -> Result<serde_json::Value, AgentError> {
        self.inner
            .post_json(
                &format!("wallet/{wallet_id}/token"),
                &serde_json::json!({}),
                "tenant token",
            )
            .await
    }

    pub async fn remove_tenant(&self, wallet_id: &str) -> Result<serde_json::Value, AgentError> {
        self.inner
            .post_json(
                &format!("wallet/{wallet_id}/remove"),
                &serde_json::json!({}),
                "tenant removal",
            )
            .await
    }
}
