//! Authentication route handlers.
//!
//! Handles login, registration, and logout against the in-memory user
//! store. Failures redirect back with a short `?error=` code; the
//! templates translate codes into copy so raw input never rides a URL.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::{clear_current_user, csrf, set_current_user};
use crate::models::CurrentUser;
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub csrf_token: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    pub csrf_token: String,
}

/// Logout form data.
#[derive(Debug, Deserialize)]
pub struct LogoutForm {
    pub csrf_token: String,
}

// =============================================================================
// Query Types
// =============================================================================

/// Query parameters for error display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub csrf_token: String,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub error: Option<String>,
    pub csrf_token: String,
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
#[instrument(skip_all)]
pub async fn login_page(
    session: Session,
    Query(query): Query<MessageQuery>,
) -> Result<impl IntoResponse> {
    let csrf_token = csrf::issue(&session).await?;

    Ok(LoginTemplate {
        error: query.error,
        csrf_token,
    })
}

/// Handle login form submission.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    csrf::verify(&session, &form.csrf_token).await?;

    let auth = AuthService::new(state.users());
    match auth.login(form.username.trim(), &form.password).await {
        Ok(user) => {
            if let Err(e) = set_current_user(&session, &CurrentUser::from(&user)).await {
                tracing::error!("Failed to set session: {}", e);
                return Ok(Redirect::to("/auth/login?error=session").into_response());
            }

            tracing::info!(user = %user.username, "login");
            Ok(Redirect::to("/account").into_response())
        }
        Err(e) => {
            tracing::info!(username = form.username.trim(), error = %e, "login failed");
            Ok(Redirect::to("/auth/login?error=credentials").into_response())
        }
    }
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
#[instrument(skip_all)]
pub async fn register_page(
    session: Session,
    Query(query): Query<MessageQuery>,
) -> Result<impl IntoResponse> {
    let csrf_token = csrf::issue(&session).await?;

    Ok(RegisterTemplate {
        error: query.error,
        csrf_token,
    })
}

/// Handle registration form submission.
///
/// Successful registration logs the new user straight in.
#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Result<Response> {
    csrf::verify(&session, &form.csrf_token).await?;

    // Validate passwords match
    if form.password != form.password_confirm {
        return Ok(Redirect::to("/auth/register?error=password_mismatch").into_response());
    }

    let auth = AuthService::new(state.users());
    match auth
        .register(form.username.trim(), form.email.trim(), &form.password)
        .await
    {
        Ok(user) => {
            if let Err(e) = set_current_user(&session, &CurrentUser::from(&user)).await {
                tracing::error!("Failed to set session after registration: {}", e);
                return Ok(Redirect::to("/auth/login?error=session").into_response());
            }

            tracing::info!(user = %user.username, "account created");
            Ok(Redirect::to("/account").into_response())
        }
        Err(e) => {
            tracing::info!(error = %e, "registration failed");
            let code = match e {
                AuthError::UserAlreadyExists => "username_taken",
                AuthError::InvalidUsername(_) => "bad_username",
                AuthError::InvalidEmail(_) => "bad_email",
                AuthError::WeakPassword(_) => "weak_password",
                _ => "failed",
            };
            Ok(Redirect::to(&format!("/auth/register?error={code}")).into_response())
        }
    }
}

// =============================================================================
// Logout Route
// =============================================================================

/// Handle logout.
///
/// Destroys the entire session, cart included.
#[instrument(skip_all)]
pub async fn logout(session: Session, Form(form): Form<LogoutForm>) -> Result<Response> {
    csrf::verify(&session, &form.csrf_token).await?;

    if let Err(e) = clear_current_user(&session).await {
        tracing::error!("Failed to clear session: {}", e);
    }

    Ok(Redirect::to("/").into_response())
}
