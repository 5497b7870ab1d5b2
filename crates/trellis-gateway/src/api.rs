//! HTTP API for the Trellis gateway.
//!
//! Every handler follows the same thin shape: extract the caller identity
//! from the headers, resolve a scoped agent handle, forward to the upstream
//! (or the trust registry), normalize, respond. The handle is released when
//! the handler returns, on every exit path.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use trellis_agent::records::{
    CredentialPreview, CredentialPreviewAttribute, PresentationRecord, V1CredentialOfferRequest,
    V2CredentialOfferRequest,
};
use trellis_agent::{normalize, AgentError};
use trellis_core::{
    split_exchange_id, Connection, CoreError, CredentialExchange, ExchangeVersion,
    PresentationExchange,
};
use trellis_registry::{Actor, RegistryError, RegistrySchema};

use crate::extract::caller_identity;
use crate::state::AppState;

// --- Response types ---

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Serialize)]
pub struct SchemaAccessResponse {
    pub actor_id: String,
    pub schema_id: String,
    pub approved: bool,
}

/// Request body for sending a credential offer.
#[derive(Debug, Deserialize)]
pub struct SendCredentialOfferRequest {
    pub protocol_version: ExchangeVersion,
    pub connection_id: String,
    pub schema_id: String,
    pub cred_def_id: String,
    pub attributes: HashMap<String, String>,
    pub comment: Option<String>,
}

type ApiError = (StatusCode, Json<ErrorResponse>);
type ApiResult<T> = Result<Json<T>, ApiError>;

// --- Error mapping ---

fn error_response(status: StatusCode, error: String) -> ApiError {
    (status, Json(ErrorResponse { error }))
}

fn validation_error(err: CoreError) -> ApiError {
    error_response(StatusCode::BAD_REQUEST, err.to_string())
}

fn agent_error(err: AgentError) -> ApiError {
    let status = match &err {
        AgentError::MissingToken(_) => StatusCode::UNAUTHORIZED,
        AgentError::MissingApiKey(_) | AgentError::InvalidHeader(_) => StatusCode::BAD_REQUEST,
        AgentError::NotFound { .. } => StatusCode::NOT_FOUND,
        AgentError::UnknownRecordFormat(_)
        | AgentError::UnexpectedStatus { .. }
        | AgentError::Transport(_)
        | AgentError::Decode(_) => StatusCode::BAD_GATEWAY,
    };
    error_response(status, err.to_string())
}

fn registry_error(err: RegistryError) -> ApiError {
    let status = match &err {
        RegistryError::Unavailable { .. } | RegistryError::Transport(_) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        RegistryError::InvalidApiKey => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error_response(status, err.to_string())
}

// --- Handlers ---

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
    })
}

async fn handle_list_connections(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Vec<Connection>> {
    let caller = caller_identity(&headers, false).map_err(validation_error)?;
    let handle = state.resolver.resolve(&caller).map_err(agent_error)?;
    let records = handle
        .agent()
        .list_connections()
        .await
        .map_err(agent_error)?;
    Ok(Json(records.iter().map(normalize::connection).collect()))
}

async fn handle_get_connection(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(conn_id): Path<String>,
) -> ApiResult<Connection> {
    let caller = caller_identity(&headers, false).map_err(validation_error)?;
    let handle = state.resolver.resolve(&caller).map_err(agent_error)?;
    let record = handle
        .agent()
        .get_connection(&conn_id)
        .await
        .map_err(agent_error)?;
    Ok(Json(normalize::connection(&record)))
}

async fn handle_list_credential_exchanges(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Vec<CredentialExchange>> {
    let caller = caller_identity(&headers, false).map_err(validation_error)?;
    let handle = state.resolver.resolve(&caller).map_err(agent_error)?;
    let (v1, v2) = tokio::join!(
        handle.agent().list_credential_exchanges_v1(),
        handle.agent().list_credential_exchanges_v2()
    );
    let mut records: Vec<CredentialExchange> = v1
        .map_err(agent_error)?
        .iter()
        .map(normalize::credential_v1)
        .collect();
    records.extend(v2.map_err(agent_error)?.iter().map(normalize::credential_v2));
    Ok(Json(records))
}

async fn handle_get_credential_exchange(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(credential_id): Path<String>,
) -> ApiResult<CredentialExchange> {
    let caller = caller_identity(&headers, false).map_err(validation_error)?;
    let (version, exchange_id) = split_exchange_id(&credential_id).map_err(validation_error)?;
    let handle = state.resolver.resolve(&caller).map_err(agent_error)?;
    let exchange = match version {
        ExchangeVersion::V1 => {
            let record = handle
                .agent()
                .get_credential_exchange_v1(exchange_id)
                .await
                .map_err(agent_error)?;
            normalize::credential_v1(&record)
        }
        ExchangeVersion::V2 => {
            let record = handle
                .agent()
                .get_credential_exchange_v2(exchange_id)
                .await
                .map_err(agent_error)?;
            normalize::credential_v2(&record)
        }
    };
    Ok(Json(exchange))
}

async fn handle_send_credential_offer(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<SendCredentialOfferRequest>,
) -> ApiResult<CredentialExchange> {
    let caller = caller_identity(&headers, false).map_err(validation_error)?;

    // Only schemas known to the trust registry may be offered.
    let known = state
        .registry
        .has_schema(&request.schema_id)
        .await
        .map_err(registry_error)?;
    if !known {
        return Err(error_response(
            StatusCode::FORBIDDEN,
            format!(
                "schema {} is not registered in the trust registry",
                request.schema_id
            ),
        ));
    }

    let handle = state.resolver.resolve(&caller).map_err(agent_error)?;
    let credential_preview = CredentialPreview {
        attributes: request
            .attributes
            .iter()
            .map(|(name, value)| CredentialPreviewAttribute {
                name: name.clone(),
                value: value.clone(),
                mime_type: None,
            })
            .collect(),
    };

    let exchange = match request.protocol_version {
        ExchangeVersion::V1 => {
            let record = handle
                .agent()
                .send_credential_offer_v1(&V1CredentialOfferRequest {
                    connection_id: request.connection_id,
                    cred_def_id: request.cred_def_id,
                    credential_preview,
                    comment: request.comment,
                })
                .await
                .map_err(agent_error)?;
            normalize::credential_v1(&record)
        }
        ExchangeVersion::V2 => {
            let filter = HashMap::from([(
                "indy".to_string(),
                serde_json::json!({
                    "schema_id": request.schema_id,
                    "cred_def_id": request.cred_def_id,
                }),
            )]);
            let record = handle
                .agent()
                .send_credential_offer_v2(&V2CredentialOfferRequest {
                    connection_id: request.connection_id,
                    filter,
                    credential_preview,
                    comment: request.comment,
                })
                .await
                .map_err(agent_error)?;
            normalize::credential_v2(&record)
        }
    };
    Ok(Json(exchange))
}

async fn handle_list_presentation_exchanges(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Vec<PresentationExchange>> {
    let caller = caller_identity(&headers, false).map_err(validation_error)?;
    let handle = state.resolver.resolve(&caller).map_err(agent_error)?;
    let (v1, v2) = tokio::join!(
        handle.agent().list_presentation_exchanges_v1(),
        handle.agent().list_presentation_exchanges_v2()
    );
    let mut records: Vec<PresentationExchange> = v1
        .map_err(agent_error)?
        .into_iter()
        .map(|record| normalize::presentation(&PresentationRecord::V1(record)))
        .collect();
    records.extend(
        v2.map_err(agent_error)?
            .into_iter()
            .map(|record| normalize::presentation(&PresentationRecord::V2(record))),
    );
    Ok(Json(records))
}

async fn handle_get_presentation_exchange(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(proof_id): Path<String>,
) -> ApiResult<PresentationExchange> {
    let caller = caller_identity(&headers, false).map_err(validation_error)?;
    let (version, exchange_id) = split_exchange_id(&proof_id).map_err(validation_error)?;
    let handle = state.resolver.resolve(&caller).map_err(agent_error)?;
    let record = match version {
        ExchangeVersion::V1 => PresentationRecord::V1(
            handle
                .agent()
                .get_presentation_exchange_v1(exchange_id)
                .await
                .map_err(agent_error)?,
        ),
        ExchangeVersion::V2 => PresentationRecord::V2(
            handle
                .agent()
                .get_presentation_exchange_v2(exchange_id)
                .await
                .map_err(agent_error)?,
        ),
    };
    Ok(Json(normalize::presentation(&record)))
}

// --- Wallet / DID pass-through ---

async fn handle_create_did(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<serde_json::Value> {
    let caller = caller_identity(&headers, false).map_err(validation_error)?;
    let handle = state.resolver.resolve(&caller).map_err(agent_error)?;
    let did = handle.agent().create_local_did().await.map_err(agent_error)?;
    Ok(Json(did))
}

async fn handle_list_dids(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<serde_json::Value> {
    let caller = caller_identity(&headers, false).map_err(validation_error)?;
    let handle = state.resolver.resolve(&caller).map_err(agent_error)?;
    let dids = handle.agent().list_dids().await.map_err(agent_error)?;
    Ok(Json(dids))
}

async fn handle_public_did(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<serde_json::Value> {
    let caller = caller_identity(&headers, false).map_err(validation_error)?;
    let handle = state.resolver.resolve(&caller).map_err(agent_error)?;
    let did = handle.agent().public_did().await.map_err(agent_error)?;
    Ok(Json(did))
}

async fn handle_set_public_did(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(did): Path<String>,
) -> ApiResult<serde_json::Value> {
    let caller = caller_identity(&headers, false).map_err(validation_error)?;
    let handle = state.resolver.resolve(&caller).map_err(agent_error)?;
    let result = handle
        .agent()
        .set_public_did(&did)
        .await
        .map_err(agent_error)?;
    Ok(Json(result))
}

// --- Tenant administration ---

fn admin_capability(handle: &trellis_agent::AgentHandle) -> Result<&trellis_agent::AdminClient, ApiError> {
    handle.admin().ok_or_else(|| {
        error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "admin capability missing from resolved handle".into(),
        )
    })
}

async fn handle_list_tenants(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<serde_json::Value> {
    let caller = caller_identity(&headers, true).map_err(validation_error)?;
    let handle = state.resolver.resolve(&caller).map_err(agent_error)?;
    let tenants = admin_capability(&handle)?
        .list_tenants()
        .await
        .map_err(agent_error)?;
    Ok(Json(tenants))
}

async fn handle_create_tenant(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> ApiResult<serde_json::Value> {
    let caller = caller_identity(&headers, true).map_err(validation_error)?;
    let handle = state.resolver.resolve(&caller).map_err(agent_error)?;
    let tenant = admin_capability(&handle)?
        .create_tenant(&body)
        .await
        .map_err(agent_error)?;
    Ok(Json(tenant))
}

async fn handle_tenant_token(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(wallet_id): Path<String>,
) -> ApiResult<serde_json::Value> {
    let caller = caller_identity(&headers, true).map_err(validation_error)?;
    let handle = state.resolver.resolve(&caller).map_err(agent_error)?;
    let token = admin_capability(&handle)?
        .tenant_token(&wallet_id)
        .await
        .map_err(agent_error)?;
    Ok(Json(token))
}

async fn handle_remove_tenant(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(wallet_id): Path<String>,
) -> ApiResult<serde_json::Value> {
    let caller = caller_identity(&headers, true).map_err(validation_error)?;
    let handle = state.resolver.resolve(&caller).map_err(agent_error)?;
    let result = admin_capability(&handle)?
        .remove_tenant(&wallet_id)
        .await
        .map_err(agent_error)?;
    Ok(Json(result))
}

// --- Trust registry reads ---

async fn handle_get_actor(
    State(state): State<Arc<AppState>>,
    Path(actor_id): Path<String>,
) -> ApiResult<Actor> {
    match state.registry.actor(&actor_id).await.map_err(registry_error)? {
        Some(actor) => Ok(Json(actor)),
        None => Err(error_response(
            StatusCode::NOT_FOUND,
            format!("actor {actor_id} not found"),
        )),
    }
}

async fn handle_actor_schema_access(
    State(state): State<Arc<AppState>>,
    Path((actor_id, schema_id)): Path<(String, String)>,
) -> ApiResult<SchemaAccessResponse> {
    let approved = state
        .registry
        .actor_has_schema(&actor_id, &schema_id)
        .await
        .map_err(registry_error)?;
    Ok(Json(SchemaAccessResponse {
        actor_id,
        schema_id,
        approved,
    }))
}

async fn handle_get_schema(
    State(state): State<Arc<AppState>>,
    Path(schema_id): Path<String>,
) -> ApiResult<RegistrySchema> {
    match state
        .registry
        .schema(&schema_id)
        .await
        .map_err(registry_error)?
    {
        Some(schema) => Ok(Json(schema)),
        None => Err(error_response(
            StatusCode::NOT_FOUND,
            format!("schema {schema_id} not found"),
        )),
    }
}

// --- Server ---

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/connections", get(handle_list_connections))
        .route("/connections/{conn_id}", get(handle_get_connection))
        .route("/issuance/records", get(handle_list_credential_exchanges))
        .route(
            "/issuance/records/{credential_id}",
            get(handle_get_credential_exchange),
        )
        .route("/issuance/credentials", post(handle_send_credential_offer))
        .route(
            "/verification/records",
            get(handle_list_presentation_exchanges),
        )
        .route(
            "/verification/records/{proof_id}",
            get(handle_get_presentation_exchange),
        )
        .route("/wallet/dids", get(handle_list_dids).post(handle_create_did))
        .route("/wallet/dids/public", get(handle_public_did))
        .route("/wallet/dids/public/{did}", put(handle_set_public_did))
        .route(
            "/admin/tenants",
            get(handle_list_tenants).post(handle_create_tenant),
        )
        .route("/admin/tenants/{wallet_id}/token", post(handle_tenant_token))
        .route("/admin/tenants/{wallet_id}", delete(handle_remove_tenant))
        .route("/registry/actors/{actor_id}", get(handle_get_actor))
        .route(
            "/registry/actors/{actor_id}/schemas/{schema_id}",
            get(handle_actor_schema_access),
        )
        .route("/registry/schemas/{schema_id}", get(handle_get_schema))
        .with_state(state)
}

pub async fn start_api_server(
    listen_addr: SocketAddr,
    state: Arc<AppState>,
) -> anyhow::Result<()> {
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    tracing::info!(%listen_addr, "HTTP API server started");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to listen for ctrl-c");
    tracing::info!("received shutdown signal");
}
