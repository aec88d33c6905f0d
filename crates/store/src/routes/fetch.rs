//! External URL preview route handlers (requires login).
//!
//! Delegates all target validation to the fetch service: scheme check,
//! host allowlist, and blocked address space, with redirects disabled.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State, response::IntoResponse};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::{RequireUser, csrf};
use crate::services::fetcher::FetchError;
use crate::state::AppState;

/// Fetch page template.
#[derive(Template, WebTemplate)]
#[template(path = "fetch.html")]
pub struct FetchTemplate {
    pub allowed_hosts: Vec<String>,
    pub preview: Option<PreviewView>,
    pub error: Option<String>,
    pub csrf_token: String,
}

/// Rendered preview of a fetched URL.
pub struct PreviewView {
    pub url: String,
    pub status: u16,
    pub content_type: String,
    pub body: String,
    pub truncated: bool,
}

/// Form data for the fetch page.
#[derive(Debug, Deserialize)]
pub struct FetchForm {
    pub url: String,
    pub csrf_token: String,
}

/// Display the fetch form.
#[instrument(skip_all)]
pub async fn fetch_form(
    RequireUser(_user): RequireUser,
    session: Session,
    State(state): State<AppState>,
) -> Result<impl IntoResponse> {
    let csrf_token = csrf::issue(&session).await?;

    Ok(FetchTemplate {
        allowed_hosts: state.config().fetch_allowed_hosts.clone(),
        preview: None,
        error: None,
        csrf_token,
    })
}

/// Fetch a preview of an allowlisted URL.
#[instrument(skip_all, fields(user = %user.username))]
pub async fn fetch(
    RequireUser(user): RequireUser,
    session: Session,
    State(state): State<AppState>,
    Form(form): Form<FetchForm>,
) -> Result<impl IntoResponse> {
    csrf::verify(&session, &form.csrf_token).await?;
    let csrf_token = csrf::issue(&session).await?;

    let url = form.url.trim();
    let (preview, error) = match state.fetcher().fetch_preview(url).await {
        Ok(preview) => (
            Some(PreviewView {
                url: url.to_string(),
                status: preview.status,
                content_type: preview
                    .content_type
                    .unwrap_or_else(|| "unknown".to_string()),
                body: String::from_utf8_lossy(&preview.body).into_owned(),
                truncated: preview.truncated,
            }),
            None,
        ),
        Err(err) => {
            match &err {
                FetchError::Upstream(e) => tracing::warn!(error = %e, "preview fetch failed"),
                other => tracing::info!(url, reason = %other, "preview target rejected"),
            }
            (None, Some(err.to_string()))
        }
    };

    Ok(FetchTemplate {
        allowed_hosts: state.config().fetch_allowed_hosts.clone(),
        preview,
        error,
        csrf_token,
    })
}
