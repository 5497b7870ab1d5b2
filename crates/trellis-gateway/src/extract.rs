//! Caller identity extraction from request headers.

use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;

use trellis_agent::CallerIdentity;
use trellis_core::{CoreError, Role};

/// Build a [`CallerIdentity`] from the request headers.
///
/// `x-role` is mandatory and must name a recognized role; a missing or
/// unknown value is rejected as "invalid role" before anything is resolved.
/// `admin` is decided per route group, not by the caller.
pub fn caller_identity(headers: &HeaderMap, admin: bool) -> Result<CallerIdentity, CoreError> {
    let role: Role = headers
        .get("x-role")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .parse()?;

    let api_key = headers
        .get("x-api-key")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    let auth_token = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer_token)
        .map(str::to_string);

    Ok(CallerIdentity {
        role,
        api_key,
        auth_token,
        admin,
    })
}

/// Strip a `Bearer` scheme prefix, case-insensitively.
fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.split_once(' ')?;
    if scheme.eq_ignore_ascii_case("bearer") {
        Some(token.trim())
    } else {
        None
    }
}
