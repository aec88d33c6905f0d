//! Unified error handling.
//!
//! Provides a unified `AppError` type that maps every failure to a
//! status code and a client-safe message. All route handlers should
//! return `Result<T, AppError>`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::services::cart::CartError;
use crate::services::feed::FeedError;
use crate::services::fetcher::FetchError;
use crate::services::tokens::TokenError;

/// Application-level error type for the store.
#[derive(Debug, Error)]
pub enum AppError {
    /// User store operation failed.
    #[error("Store error: {0}")]
    Repository(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// API token operation failed.
    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    /// Outbound fetch rejected or failed.
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Feed import rejected or failed.
    #[error("Feed error: {0}")]
    Feed(#[from] FeedError),

    /// Cart payload rejected.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// User is authenticated but not permitted.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Missing or mismatched CSRF token.
    #[error("CSRF check failed")]
    CsrfRejected,

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if matches!(self, Self::Repository(_) | Self::Internal(_)) {
            tracing::error!(error = %self, "Request error");
        }

        let status = match &self {
            Self::Repository(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::UserAlreadyExists => StatusCode::CONFLICT,
                AuthError::InvalidUsername(_)
                | AuthError::InvalidEmail(_)
                | AuthError::WeakPassword(_) => StatusCode::BAD_REQUEST,
                AuthError::Repository(_) | AuthError::PasswordHash => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Token(TokenError::Invalid) => StatusCode::UNAUTHORIZED,
            Self::Token(TokenError::Signing) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Fetch(FetchError::Upstream(_)) => StatusCode::BAD_GATEWAY,
            Self::Fetch(_) | Self::Feed(_) | Self::Cart(_) | Self::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) | Self::CsrfRejected => StatusCode::FORBIDDEN,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Repository(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => "Invalid credentials".to_string(),
                AuthError::UserAlreadyExists => "That username is already taken".to_string(),
                AuthError::InvalidUsername(e) => e.to_string(),
                AuthError::InvalidEmail(_) => "Invalid email address".to_string(),
                AuthError::WeakPassword(msg) => msg.clone(),
                AuthError::Repository(_) | AuthError::PasswordHash => {
                    "Internal server error".to_string()
                }
            },
            Self::Token(TokenError::Invalid) => "Invalid token".to_string(),
            Self::Token(TokenError::Signing) => "Internal server error".to_string(),
            Self::Fetch(FetchError::Upstream(_)) => "Upstream fetch failed".to_string(),
            Self::Fetch(err) => err.to_string(),
            Self::Feed(err) => err.to_string(),
            Self::Cart(err) => err.to_string(),
            Self::CsrfRejected => "Request could not be verified, please try again".to_string(),
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
