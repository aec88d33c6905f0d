//! Document viewer route handlers.
//!
//! Serves plain-text documents from the configured docs directory. The
//! requested name is validated against a strict filename alphabet and
//! the resolved path is canonicalized and checked against the docs root
//! before anything is read.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::state::AppState;

/// Document index template.
#[derive(Template, WebTemplate)]
#[template(path = "docs/index.html")]
pub struct DocsIndexTemplate {
    pub documents: Vec<String>,
}

/// Single document template.
#[derive(Template, WebTemplate)]
#[template(path = "docs/show.html")]
pub struct DocTemplate {
    pub name: String,
    pub body: String,
}

/// List the available documents.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let mut documents = Vec::new();

    let mut entries = tokio::fs::read_dir(&state.config().docs_dir)
        .await
        .map_err(|e| AppError::Internal(format!("docs directory unreadable: {e}")))?;
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| AppError::Internal(format!("docs directory unreadable: {e}")))?
    {
        let name = entry.file_name();
        if let Some(name) = name.to_str() {
            if name.ends_with(".txt") {
                documents.push(name.to_string());
            }
        }
    }
    documents.sort();

    Ok(DocsIndexTemplate { documents })
}

/// Display a named document.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse> {
    let name = sanitize_doc_name(&name).ok_or_else(|| AppError::NotFound(name.clone()))?;

    // Canonicalize both sides so symlinks and `..` cannot step outside
    let root = tokio::fs::canonicalize(&state.config().docs_dir)
        .await
        .map_err(|e| AppError::Internal(format!("docs directory unreadable: {e}")))?;
    let path = match tokio::fs::canonicalize(root.join(&name)).await {
        Ok(path) => path,
        Err(_) => return Err(AppError::NotFound(name)),
    };
    if !path.starts_with(&root) {
        return Err(AppError::NotFound(name));
    }

    let body = tokio::fs::read_to_string(&path)
        .await
        .map_err(|_| AppError::NotFound(name.clone()))?;

    Ok(DocTemplate { name, body })
}

/// Validate a document name: a single `.txt` filename, no separators,
/// no traversal.
fn sanitize_doc_name(raw: &str) -> Option<String> {
    let name = raw.trim();

    if name.is_empty() || name.len() > 64 {
        return None;
    }
    if !name.ends_with(".txt") {
        return None;
    }

    let stem = &name[..name.len() - 4];
    if stem.is_empty() || stem.contains("..") {
        return None;
    }
    if !stem
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    {
        return None;
    }

    Some(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names_accepted() {
        assert_eq!(
            sanitize_doc_name("warranty.txt"),
            Some("warranty.txt".to_string())
        );
        assert_eq!(
            sanitize_doc_name("field-mug-care.txt"),
            Some("field-mug-care.txt".to_string())
        );
    }

    #[test]
    fn test_traversal_rejected() {
        assert!(sanitize_doc_name("../../etc/passwd").is_none());
        assert!(sanitize_doc_name("..%2F..%2Fetc%2Fpasswd").is_none());
        assert!(sanitize_doc_name("....//secret.txt").is_none());
        assert!(sanitize_doc_name("sub/dir.txt").is_none());
        assert!(sanitize_doc_name("sub\\dir.txt").is_none());
    }

    #[test]
    fn test_non_txt_rejected() {
        assert!(sanitize_doc_name("app.py").is_none());
        assert!(sanitize_doc_name("warranty").is_none());
        assert!(sanitize_doc_name(".txt").is_none());
        assert!(sanitize_doc_name("").is_none());
    }

    #[test]
    fn test_overlong_rejected() {
        let long = format!("{}.txt", "a".repeat(100));
        assert!(sanitize_doc_name(&long).is_none());
    }
}
