//! HTTP route handlers for the store.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page (product listing)
//! GET  /health                 - Health check
//! GET  /static/*               - Static assets (configured directory)
//!
//! # Documents
//! GET  /docs                   - Document index
//! GET  /docs/{name}            - View a named document (validated filename)
//!
//! # Demo pages
//! GET  /greeting               - Personalized greeting (?name=, escaped)
//! GET  /preview                - Comment preview (?text=, escaped)
//! GET  /digest                 - Digest form
//! POST /digest                 - SHA-256 digest of submitted text
//! GET  /partner/{slug}         - Redirect to an allowlisted partner site
//!
//! # Cart
//! GET  /cart                   - Cart page (decodes snapshot cookie-free via form)
//! POST /cart                   - Replace cart from an encoded snapshot
//!
//! # Auth
//! GET  /auth/login             - Login page
//! POST /auth/login             - Login action
//! GET  /auth/register          - Register page
//! POST /auth/register          - Register action
//! POST /auth/logout            - Logout action
//!
//! # Account (requires login)
//! GET  /account                - Profile and own orders
//! GET  /orders/{id}            - Order detail (owner or admin only)
//! GET  /upload                 - Upload form
//! POST /upload                 - Receipt upload (validated)
//! GET  /fetch                  - URL preview form
//! POST /fetch                  - Preview an allowlisted external URL
//!
//! # Admin (requires admin)
//! GET  /admin/users            - Registered user list
//! GET  /status                 - Service status page
//! POST /status                 - Run a named status probe
//!
//! # API (JSON)
//! POST /api/tokens             - Issue an API token (requires login)
//! GET  /api/tokens/me          - Inspect the caller's token claims
//! POST /api/feed/import        - Import a product feed (admin + CSRF header)
//! ```

pub mod account;
pub mod admin;
pub mod api;
pub mod auth;
pub mod cart;
pub mod digest;
pub mod docs;
pub mod fetch;
pub mod greeting;
pub mod home;
pub mod orders;
pub mod partner;
pub mod preview;
pub mod status;
pub mod upload;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

use crate::middleware;
use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
        .layer(middleware::auth_rate_limiter())
}

/// Create the document viewer routes router.
pub fn docs_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(docs::index))
        .route("/{name}", get(docs::show))
}

/// Create the API routes router.
pub fn api_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/tokens", post(api::tokens::issue))
        .route("/tokens/me", get(api::tokens::me))
        .route("/feed/import", post(api::feed::import))
        .layer(middleware::cors_layer(&state.config().allowed_origins))
        .layer(middleware::api_rate_limiter())
}

/// Create all routes for the store.
pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Document viewer
        .nest("/docs", docs_routes())
        // Demo pages
        .route("/greeting", get(greeting::greeting))
        .route("/preview", get(preview::preview))
        .route("/digest", get(digest::digest_form).post(digest::digest))
        .route("/partner/{slug}", get(partner::partner))
        // Cart
        .route("/cart", get(cart::show).post(cart::replace))
        // Orders and account
        .route("/orders/{id}", get(orders::show))
        .route("/account", get(account::index))
        // Upload (multipart, capped body)
        .route(
            "/upload",
            get(upload::upload_form)
                .post(upload::upload)
                .layer(DefaultBodyLimit::max(upload::MAX_UPLOAD_BYTES)),
        )
        // External URL preview
        .route("/fetch", get(fetch::fetch_form).post(fetch::fetch))
        // Admin
        .route("/admin/users", get(admin::users))
        .route("/status", get(status::status_page).post(status::run_probe))
        // Auth routes
        .nest("/auth", auth_routes())
        // JSON API
        .nest("/api", api_routes(state))
}

/// Build the complete application: routes, middleware stack, and state.
///
/// Used by both `main` and the integration tests so they exercise the
/// same stack.
pub fn app(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.config());
    let static_assets = tower_http::services::ServeDir::new(&state.config().static_dir);

    Router::new()
        .route("/health", get(health))
        .merge(routes(&state))
        .nest_service("/static", static_assets)
        .layer(axum::middleware::from_fn(
            middleware::security_headers_middleware,
        ))
        .layer(session_layer)
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}
