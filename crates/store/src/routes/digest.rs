//! Digest route handlers.
//!
//! Computes a SHA-256 digest of submitted text. Nothing password-shaped
//! happens here; account passwords go through argon2id in the auth
//! service.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, response::IntoResponse};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::filters;

/// Largest input the form accepts.
const MAX_INPUT_BYTES: usize = 16 * 1024;

/// Digest page template.
#[derive(Template, WebTemplate)]
#[template(path = "digest.html")]
pub struct DigestTemplate {
    pub digest: Option<String>,
    pub error: Option<String>,
}

/// Form data for the digest page.
#[derive(Debug, Deserialize)]
pub struct DigestForm {
    pub text: String,
}

/// Display the digest form.
pub async fn digest_form() -> impl IntoResponse {
    DigestTemplate {
        digest: None,
        error: None,
    }
}

/// Compute the SHA-256 digest of the submitted text.
pub async fn digest(Form(form): Form<DigestForm>) -> impl IntoResponse {
    if form.text.len() > MAX_INPUT_BYTES {
        return DigestTemplate {
            digest: None,
            error: Some(format!("input exceeds {MAX_INPUT_BYTES} bytes")),
        };
    }

    DigestTemplate {
        digest: Some(sha256_hex(form.text.as_bytes())),
        error: None,
    }
}

/// Hex-encoded SHA-256 of the input.
fn sha256_hex(input: &[u8]) -> String {
    hex::encode(Sha256::digest(input))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_known_vectors() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
