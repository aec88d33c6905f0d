//! Session-bound CSRF tokens.
//!
//! A random token is minted per session and must accompany every
//! state-changing request: HTML forms carry it in a hidden field, the
//! JSON API in an `x-csrf-token` header. Comparison is constant-time.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use tower_sessions::Session;

use crate::error::AppError;

/// Session key holding the CSRF token.
const CSRF_SESSION_KEY: &str = "csrf_token";

/// Header carrying the token on API requests.
pub const CSRF_HEADER: &str = "x-csrf-token";

/// Random bytes per token before encoding.
const TOKEN_BYTES: usize = 32;

/// Get the session's CSRF token, minting one if absent.
///
/// # Errors
///
/// Returns `AppError::Internal` if the session store fails.
pub async fn issue(session: &Session) -> Result<String, AppError> {
    if let Some(token) = session
        .get::<String>(CSRF_SESSION_KEY)
        .await
        .map_err(|e| AppError::Internal(format!("session read failed: {e}")))?
    {
        return Ok(token);
    }

    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    let token = URL_SAFE_NO_PAD.encode(bytes);

    session
        .insert(CSRF_SESSION_KEY, &token)
        .await
        .map_err(|e| AppError::Internal(format!("session write failed: {e}")))?;

    Ok(token)
}

/// Verify a submitted token against the session's.
///
/// # Errors
///
/// Returns `AppError::CsrfRejected` if the session holds no token or
/// the submitted value does not match.
pub async fn verify(session: &Session, submitted: &str) -> Result<(), AppError> {
    let expected: String = session
        .get(CSRF_SESSION_KEY)
        .await
        .map_err(|e| AppError::Internal(format!("session read failed: {e}")))?
        .ok_or(AppError::CsrfRejected)?;

    if constant_time_eq(expected.as_bytes(), submitted.as_bytes()) {
        Ok(())
    } else {
        Err(AppError::CsrfRejected)
    }
}

/// Compare two byte strings without short-circuiting on the first
/// mismatch. Length is not secret here.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
