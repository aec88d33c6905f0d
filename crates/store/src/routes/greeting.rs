//! Personalized greeting route handler.
//!
//! The name is template *data*: it flows into an Askama context field
//! and is HTML-escaped on output. It never becomes part of a template.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::Query, response::IntoResponse};
use serde::Deserialize;

use crate::filters;

/// Longest name the page will echo back.
const MAX_NAME_LENGTH: usize = 80;

/// Query parameters for the greeting page.
#[derive(Debug, Deserialize)]
pub struct GreetingQuery {
    pub name: Option<String>,
}

/// Greeting page template.
#[derive(Template, WebTemplate)]
#[template(path = "greeting.html")]
pub struct GreetingTemplate {
    pub name: String,
}

/// Display a greeting for the given name.
pub async fn greeting(Query(query): Query<GreetingQuery>) -> impl IntoResponse {
    let mut name = query.name.unwrap_or_else(|| "friend".to_string());
    if name.trim().is_empty() {
        name = "friend".to_string();
    }
    name.truncate(floor_char_boundary(&name, MAX_NAME_LENGTH));

    GreetingTemplate { name }
}

/// Largest index `<= max` that lies on a char boundary.
fn floor_char_boundary(s: &str, max: usize) -> usize {
    if s.len() <= max {
        return s.len();
    }
    (0..=max).rev().find(|&i| s.is_char_boundary(i)).unwrap_or(0)
}
