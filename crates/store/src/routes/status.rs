//! Service status route handlers (admin only).
//!
//! Operators pick a probe from a closed set; each probe maps to a fixed
//! internal check. Nothing from the request reaches a shell or a
//! process argument list.

use std::str::FromStr;

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State, response::IntoResponse};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::{RequireAdmin, csrf};
use crate::state::AppState;

/// The closed set of status probes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    /// Docs directory is present and readable.
    DocsReadable,
    /// Upload directory is present and writable.
    UploadWritable,
    /// Registered account count.
    UserCount,
}

impl Probe {
    /// Slug used in the form.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::DocsReadable => "docs",
            Self::UploadWritable => "uploads",
            Self::UserCount => "users",
        }
    }

    /// Human label for the status page.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::DocsReadable => "Docs directory readable",
            Self::UploadWritable => "Upload directory writable",
            Self::UserCount => "Registered accounts",
        }
    }

    /// All probes, in display order.
    #[must_use]
    pub const fn all() -> [Self; 3] {
        [Self::DocsReadable, Self::UploadWritable, Self::UserCount]
    }
}

impl FromStr for Probe {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "docs" => Ok(Self::DocsReadable),
            "uploads" => Ok(Self::UploadWritable),
            "users" => Ok(Self::UserCount),
            _ => Err(()),
        }
    }
}

/// A probe option for the form.
pub struct ProbeOption {
    pub slug: &'static str,
    pub label: &'static str,
}

/// Status page template.
#[derive(Template, WebTemplate)]
#[template(path = "status.html")]
pub struct StatusTemplate {
    pub probes: Vec<ProbeOption>,
    pub result: Option<String>,
    pub csrf_token: String,
}

/// Form data for running a probe.
#[derive(Debug, Deserialize)]
pub struct ProbeForm {
    pub probe: String,
    pub csrf_token: String,
}

fn probe_options() -> Vec<ProbeOption> {
    Probe::all()
        .into_iter()
        .map(|p| ProbeOption {
            slug: p.slug(),
            label: p.label(),
        })
        .collect()
}

/// Display the status page.
#[instrument(skip_all)]
pub async fn status_page(
    RequireAdmin(_admin): RequireAdmin,
    session: Session,
) -> Result<impl IntoResponse> {
    let csrf_token = csrf::issue(&session).await?;

    Ok(StatusTemplate {
        probes: probe_options(),
        result: None,
        csrf_token,
    })
}

/// Run a named probe and show its result.
#[instrument(skip_all)]
pub async fn run_probe(
    RequireAdmin(_admin): RequireAdmin,
    session: Session,
    State(state): State<AppState>,
    Form(form): Form<ProbeForm>,
) -> Result<impl IntoResponse> {
    csrf::verify(&session, &form.csrf_token).await?;
    let csrf_token = csrf::issue(&session).await?;

    let result = match form.probe.parse::<Probe>() {
        Ok(probe) => run(probe, &state).await,
        Err(()) => "unknown probe".to_string(),
    };

    Ok(StatusTemplate {
        probes: probe_options(),
        result: Some(result),
        csrf_token,
    })
}

/// Execute one probe. Failures come back as a fixed message; the
/// underlying error is logged, not shown.
async fn run(probe: Probe, state: &AppState) -> String {
    match probe {
        Probe::DocsReadable => match tokio::fs::read_dir(&state.config().docs_dir).await {
            Ok(_) => "ok".to_string(),
            Err(e) => {
                tracing::warn!(error = %e, "docs probe failed");
                "probe unavailable".to_string()
            }
        },
        Probe::UploadWritable => {
            let marker = state.config().upload_dir.join(".probe");
            match tokio::fs::write(&marker, b"ok").await {
                Ok(()) => {
                    let _ = tokio::fs::remove_file(&marker).await;
                    "ok".to_string()
                }
                Err(e) => {
                    tracing::warn!(error = %e, "upload probe failed");
                    "probe unavailable".to_string()
                }
            }
        }
        Probe::UserCount => format!("{} accounts", state.users().count().await),
    }
}
