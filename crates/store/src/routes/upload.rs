//! Receipt upload route handlers (requires login).
//!
//! The client-supplied filename is used only to check the extension;
//! the stored name is a fresh UUID plus that vetted extension, written
//! under the configured upload directory.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Multipart, State},
    response::IntoResponse,
};
use tower_sessions::Session;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{RequireUser, csrf};
use crate::state::AppState;

/// Largest accepted upload body.
pub const MAX_UPLOAD_BYTES: usize = 1024 * 1024;

/// Extensions we accept, lowercased.
const ALLOWED_EXTENSIONS: &[&str] = &["txt", "pdf", "png", "jpg", "jpeg", "gif"];

/// Upload page template.
#[derive(Template, WebTemplate)]
#[template(path = "upload.html")]
pub struct UploadTemplate {
    pub stored_as: Option<String>,
    pub error: Option<String>,
    pub csrf_token: String,
}

/// Display the upload form.
#[instrument(skip_all)]
pub async fn upload_form(
    RequireUser(_user): RequireUser,
    session: Session,
) -> Result<impl IntoResponse> {
    let csrf_token = csrf::issue(&session).await?;

    Ok(UploadTemplate {
        stored_as: None,
        error: None,
        csrf_token,
    })
}

/// Accept a receipt upload.
#[instrument(skip_all, fields(user = %user.username))]
pub async fn upload(
    RequireUser(user): RequireUser,
    session: Session,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    let mut csrf_token_field: Option<String> = None;
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("malformed upload: {e}")))?
    {
        match field.name() {
            Some("csrf_token") => {
                csrf_token_field = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(format!("malformed upload: {e}")))?,
                );
            }
            Some("file") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("malformed upload: {e}")))?;
                file = Some((filename, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let submitted_token = csrf_token_field.ok_or(AppError::CsrfRejected)?;
    csrf::verify(&session, &submitted_token).await?;
    let csrf_token = csrf::issue(&session).await?;

    let Some((filename, bytes)) = file else {
        return Ok(UploadTemplate {
            stored_as: None,
            error: Some("no file submitted".to_string()),
            csrf_token,
        });
    };

    let Some(extension) = vetted_extension(&filename) else {
        return Ok(UploadTemplate {
            stored_as: None,
            error: Some(format!(
                "file type not accepted, use one of: {}",
                ALLOWED_EXTENSIONS.join(", ")
            )),
            csrf_token,
        });
    };

    if bytes.is_empty() {
        return Ok(UploadTemplate {
            stored_as: None,
            error: Some("file is empty".to_string()),
            csrf_token,
        });
    }

    // Stored name is server-generated; the client name never touches disk
    let stored_name = format!("{}.{extension}", Uuid::new_v4());
    let path = state.config().upload_dir.join(&stored_name);

    tokio::fs::create_dir_all(&state.config().upload_dir)
        .await
        .map_err(|e| AppError::Internal(format!("upload directory unavailable: {e}")))?;
    tokio::fs::write(&path, &bytes)
        .await
        .map_err(|e| AppError::Internal(format!("upload write failed: {e}")))?;

    tracing::info!(user = %user.username, stored = %stored_name, size = bytes.len(), "receipt stored");

    Ok(UploadTemplate {
        stored_as: Some(stored_name),
        error: None,
        csrf_token,
    })
}

/// Extract and vet the extension from a client filename.
fn vetted_extension(filename: &str) -> Option<&'static str> {
    let extension = std::path::Path::new(filename)
        .extension()?
        .to_str()?
        .to_lowercase();

    ALLOWED_EXTENSIONS
        .iter()
        .find(|allowed| **allowed == extension)
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_extensions() {
        assert_eq!(vetted_extension("receipt.pdf"), Some("pdf"));
        assert_eq!(vetted_extension("scan.PNG"), Some("png"));
        assert_eq!(vetted_extension("notes.txt"), Some("txt"));
    }

    #[test]
    fn test_executable_extensions_rejected() {
        assert!(vetted_extension("shell.php").is_none());
        assert!(vetted_extension("run.sh").is_none());
        assert!(vetted_extension("binary.exe").is_none());
    }

    #[test]
    fn test_double_extension_uses_last() {
        // Only the final extension counts
        assert_eq!(vetted_extension("image.php.png"), Some("png"));
        assert!(vetted_extension("image.png.php").is_none());
    }

    #[test]
    fn test_no_extension_rejected() {
        assert!(vetted_extension("README").is_none());
        assert!(vetted_extension("").is_none());
    }
}
