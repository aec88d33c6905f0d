//! API token route handlers.
//!
//! Tokens are issued to logged-in sessions and verified from the
//! `Authorization: Bearer` header. The token service pins HS256 and the
//! issuer, so the only thing these handlers do is plumbing.

use axum::{Json, extract::State, http::HeaderMap, http::header::AUTHORIZATION};
use serde::Serialize;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::middleware::RequireUser;
use crate::state::AppState;

/// Response body for a freshly issued token.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_in_hours: i64,
}

/// Response body for token introspection.
#[derive(Debug, Serialize)]
pub struct ClaimsResponse {
    pub sub: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

/// Issue a token for the logged-in user.
#[instrument(skip_all, fields(user = %user.username))]
pub async fn issue(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
) -> Result<Json<TokenResponse>> {
    let token = state.tokens().issue(user.username.as_str(), user.role)?;

    Ok(Json(TokenResponse {
        token,
        token_type: "Bearer",
        expires_in_hours: 24,
    }))
}

/// Inspect the claims of the bearer token on this request.
#[instrument(skip_all)]
pub async fn me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ClaimsResponse>> {
    let token = bearer_token(&headers)
        .ok_or_else(|| AppError::Unauthorized("missing bearer token".to_string()))?;

    let claims = state.tokens().verify(token)?;

    Ok(Json(ClaimsResponse {
        sub: claims.sub,
        role: claims.role.as_str().to_string(),
        iat: claims.iat,
        exp: claims.exp,
    }))
}

/// Pull the bearer token out of the Authorization header.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}
