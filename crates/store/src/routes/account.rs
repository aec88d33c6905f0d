//! Account route handlers (requires login).

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::{RequireUser, csrf};
use crate::routes::orders::OrderView;
use crate::state::AppState;

/// Account overview template.
#[derive(Template, WebTemplate)]
#[template(path = "account.html")]
pub struct AccountTemplate {
    pub username: String,
    pub email: Option<String>,
    pub role: String,
    pub orders: Vec<OrderView>,
    pub csrf_token: String,
}

/// Display the account overview with the user's own orders.
#[instrument(skip_all, fields(user = %user.username))]
pub async fn index(
    RequireUser(user): RequireUser,
    session: Session,
    State(state): State<AppState>,
) -> Result<impl IntoResponse> {
    let csrf_token = csrf::issue(&session).await?;

    // Email lives in the store, not the session
    let email = state
        .users()
        .get(&user.username)
        .await
        .map(|u| u.email.to_string());

    let orders = if user.is_admin() {
        state.catalog().orders()
    } else {
        state.catalog().orders_for(&user.username)
    }
    .into_iter()
    .map(OrderView::from)
    .collect();

    Ok(AccountTemplate {
        username: user.username.to_string(),
        email,
        role: user.role.as_str().to_string(),
        orders,
        csrf_token,
    })
}
