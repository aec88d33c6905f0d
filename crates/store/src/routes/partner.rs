//! Partner redirect route handler.
//!
//! Redirects are keyed by a short slug into a static table. There is no
//! way to supply a destination URL from the outside.

use axum::{
    extract::Path,
    response::{IntoResponse, Redirect},
};

use crate::error::{AppError, Result};

/// Known partner destinations, keyed by slug.
const PARTNERS: &[(&str, &str)] = &[
    ("owasp", "https://owasp.org/"),
    ("cve", "https://www.cve.org/"),
    ("nvd", "https://nvd.nist.gov/"),
];

/// Redirect to an allowlisted partner site.
pub async fn partner(Path(slug): Path<String>) -> Result<impl IntoResponse> {
    let url = PARTNERS
        .iter()
        .find(|(key, _)| *key == slug)
        .map(|(_, url)| *url)
        .ok_or_else(|| AppError::NotFound(format!("partner '{slug}'")))?;

    Ok(Redirect::to(url))
}
