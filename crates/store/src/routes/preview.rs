//! Comment preview route handler.
//!
//! Renders submitted text back as escaped content so authors can see
//! their comment before posting. Markup in the input shows up as text.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::Query, response::IntoResponse};
use serde::Deserialize;

use crate::filters;

/// Longest comment the preview will render.
const MAX_PREVIEW_LENGTH: usize = 2000;

/// Query parameters for the preview page.
#[derive(Debug, Deserialize)]
pub struct PreviewQuery {
    pub text: Option<String>,
}

/// Comment preview template.
#[derive(Template, WebTemplate)]
#[template(path = "preview.html")]
pub struct PreviewTemplate {
    pub text: String,
    pub truncated: bool,
}

/// Display an escaped preview of the submitted text.
pub async fn preview(Query(query): Query<PreviewQuery>) -> impl IntoResponse {
    let mut text = query.text.unwrap_or_default();
    let mut truncated = false;

    if text.len() > MAX_PREVIEW_LENGTH {
        let cut = (0..=MAX_PREVIEW_LENGTH)
            .rev()
            .find(|&i| text.is_char_boundary(i))
            .unwrap_or(0);
        text.truncate(cut);
        truncated = true;
    }

    PreviewTemplate { text, truncated }
}
