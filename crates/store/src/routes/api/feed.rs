//! Product feed import route handler (admin only).
//!
//! Accepts an XML feed body and returns the parsed products as JSON.
//! The CSRF token rides in the `x-csrf-token` header since this is an
//! API call, not a form post.

use axum::{Json, http::HeaderMap};
use serde::Serialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::middleware::{RequireAdmin, csrf};
use crate::services::feed::{self, FeedProduct};

/// Response body for a feed import.
#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub imported: usize,
    pub products: Vec<FeedProduct>,
}

/// Import a product feed.
#[instrument(skip_all, fields(admin = %admin.username))]
pub async fn import(
    RequireAdmin(admin): RequireAdmin,
    session: Session,
    headers: HeaderMap,
    body: String,
) -> Result<Json<ImportResponse>> {
    let submitted = headers
        .get(csrf::CSRF_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::CsrfRejected)?;
    csrf::verify(&session, submitted).await?;

    let products = feed::parse_feed(&body)?;
    tracing::info!(count = products.len(), "feed imported");

    Ok(Json(ImportResponse {
        imported: products.len(),
        products,
    }))
}
