//! Order detail route handler.
//!
//! Order IDs are typed integers and every lookup checks ownership: an
//! order that exists but belongs to someone else is indistinguishable
//! from one that does not exist.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use tracing::instrument;

use emporium_core::OrderId;

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireUser;
use crate::models::Order;
use crate::state::AppState;

/// Order display data for templates.
pub struct OrderView {
    pub id: String,
    pub item: String,
    pub total: String,
    pub status: &'static str,
    pub placed_at: String,
}

impl From<&Order> for OrderView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.to_string(),
            item: order.item.clone(),
            total: order.total.display(),
            status: order.status.as_str(),
            placed_at: order.placed_at.format("%Y-%m-%d").to_string(),
        }
    }
}

/// Order detail template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/show.html")]
pub struct OrderTemplate {
    pub order: OrderView,
}

/// Display a single order.
#[instrument(skip_all, fields(order_id = id))]
pub async fn show(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    let id = OrderId::new(id);
    let not_found = || AppError::NotFound(format!("order {id}"));

    let order = state.catalog().order(id).ok_or_else(not_found)?;

    // Owner or admin; anything else looks like a missing order
    if order.owner != user.username && !user.is_admin() {
        return Err(not_found());
    }

    Ok(OrderTemplate {
        order: OrderView::from(order),
    })
}
