//! Cart route handlers.
//!
//! The cart lives client-side as an encoded snapshot. GET renders the
//! session's saved snapshot; POST replaces it after the codec validates
//! the payload.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::csrf;
use crate::services::cart::CartSnapshot;
use crate::state::AppState;

/// Session key holding the encoded cart.
const CART_SESSION_KEY: &str = "cart";

/// A cart line joined against the catalog.
pub struct CartLineView {
    pub title: String,
    pub quantity: u32,
    pub price: String,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart.html")]
pub struct CartTemplate {
    pub lines: Vec<CartLineView>,
    pub unit_count: u32,
    pub encoded: String,
    pub csrf_token: String,
    pub error: Option<String>,
}

/// Form data for replacing the cart.
#[derive(Debug, Deserialize)]
pub struct CartForm {
    pub snapshot: String,
    pub csrf_token: String,
}

async fn saved_snapshot(session: &Session) -> Result<CartSnapshot> {
    let encoded: Option<String> = session
        .get(CART_SESSION_KEY)
        .await
        .map_err(|e| AppError::Internal(format!("session read failed: {e}")))?;

    match encoded {
        Some(encoded) => Ok(CartSnapshot::decode(&encoded)?),
        None => Ok(CartSnapshot::default()),
    }
}

fn render(
    state: &AppState,
    snapshot: &CartSnapshot,
    csrf_token: String,
    error: Option<String>,
) -> CartTemplate {
    let lines = snapshot
        .items
        .iter()
        .filter_map(|item| {
            state.catalog().product(item.product_id).map(|product| CartLineView {
                title: product.title.clone(),
                quantity: item.quantity,
                price: product.price.display(),
            })
        })
        .collect();

    CartTemplate {
        lines,
        unit_count: snapshot.unit_count(),
        encoded: snapshot.encode(),
        csrf_token,
        error,
    }
}

/// Display the cart page.
#[instrument(skip_all)]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<impl IntoResponse> {
    let snapshot = saved_snapshot(&session).await.unwrap_or_default();
    let csrf_token = csrf::issue(&session).await?;

    Ok(render(&state, &snapshot, csrf_token, None))
}

/// Replace the cart from an encoded snapshot.
#[instrument(skip_all)]
pub async fn replace(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CartForm>,
) -> Result<Response> {
    csrf::verify(&session, &form.csrf_token).await?;

    let snapshot = match CartSnapshot::decode(form.snapshot.trim()) {
        Ok(snapshot) => snapshot,
        Err(err) => {
            // Bad payloads re-render the page with the saved cart intact
            let saved = saved_snapshot(&session).await.unwrap_or_default();
            let csrf_token = csrf::issue(&session).await?;
            return Ok(render(&state, &saved, csrf_token, Some(err.to_string())).into_response());
        }
    };

    // Only items that exist in the catalog survive the replace
    if let Some(item) = snapshot
        .items
        .iter()
        .find(|item| state.catalog().product(item.product_id).is_none())
    {
        let saved = saved_snapshot(&session).await.unwrap_or_default();
        let csrf_token = csrf::issue(&session).await?;
        return Ok(render(
            &state,
            &saved,
            csrf_token,
            Some(format!("unknown product {}", item.product_id)),
        )
        .into_response());
    }

    session
        .insert(CART_SESSION_KEY, snapshot.encode())
        .await
        .map_err(|e| AppError::Internal(format!("session write failed: {e}")))?;

    Ok(Redirect::to("/cart").into_response())
}
