//! Catalog domain types.
//!
//! Products and orders are fixed demo data with no storage behind them.
//! Orders carry an owner so the ownership check on the order-lookup route
//! has something real to enforce.

use chrono::{DateTime, Utc};

use emporium_core::{OrderId, Price, ProductId, Username};

/// A demo product.
#[derive(Debug, Clone)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// One-line description.
    pub blurb: String,
    /// Unit price.
    pub price: Price,
    /// Optional product document, served by the document viewer.
    pub doc: Option<String>,
}

/// Fulfilment state of a demo order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Shipped,
    Delivered,
}

impl OrderStatus {
    /// Display label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
        }
    }
}

/// A demo order, owned by a specific account.
#[derive(Debug, Clone)]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// Username of the account the order belongs to.
    pub owner: Username,
    /// Ordered item description.
    pub item: String,
    /// Order total.
    pub total: Price,
    /// Fulfilment state.
    pub status: OrderStatus,
    /// When the order was placed.
    pub placed_at: DateTime<Utc>,
}
