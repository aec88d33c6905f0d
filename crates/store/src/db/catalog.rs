//! Static demo catalog.
//!
//! Four products and three orders, compiled in. The orders are tagged
//! with owner usernames: two belong to the seeded admin, one to a
//! `demo-shopper` account that does not exist, so a freshly registered
//! user owns nothing and the ownership check is observable.

use std::collections::HashMap;

use chrono::{TimeZone, Utc};

use emporium_core::{CurrencyCode, OrderId, Price, ProductId, Username};

use crate::models::{Order, OrderStatus, Product};

/// The read-only product/order catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
    orders: HashMap<OrderId, Order>,
}

impl Catalog {
    /// Build the demo catalog.
    #[must_use]
    pub fn demo() -> Self {
        let products = vec![
            Product {
                id: ProductId::new(1),
                title: "Pentester's Field Mug".to_string(),
                blurb: "Holds coffee through the longest engagement.".to_string(),
                price: Price::from_cents(1499, CurrencyCode::USD),
                doc: Some("field-mug-care.txt".to_string()),
            },
            Product {
                id: ProductId::new(2),
                title: "Scanner-Approved T-Shirt".to_string(),
                blurb: "Ships with a custom slogan, safely escaped.".to_string(),
                price: Price::from_cents(2399, CurrencyCode::USD),
                doc: Some("tshirt-sizing.txt".to_string()),
            },
            Product {
                id: ProductId::new(3),
                title: "Greeting Card, Personalized".to_string(),
                blurb: "Your name rendered as data, never as a template.".to_string(),
                price: Price::from_cents(599, CurrencyCode::USD),
                doc: None,
            },
            Product {
                id: ProductId::new(4),
                title: "Warranty Booklet".to_string(),
                blurb: "The document viewer's favorite read.".to_string(),
                price: Price::from_cents(0, CurrencyCode::USD),
                doc: Some("warranty.txt".to_string()),
            },
        ];

        let admin = Username::parse("admin").expect("'admin' is a valid username");
        let demo_shopper =
            Username::parse("demo-shopper").expect("'demo-shopper' is a valid username");

        let orders = [
            Order {
                id: OrderId::new(1001),
                owner: admin.clone(),
                item: "Pentester's Field Mug x2".to_string(),
                total: Price::from_cents(2998, CurrencyCode::USD),
                status: OrderStatus::Delivered,
                placed_at: Utc.with_ymd_and_hms(2024, 11, 3, 14, 30, 0).single()
                    .expect("valid timestamp"),
            },
            Order {
                id: OrderId::new(1002),
                owner: admin,
                item: "Warranty Booklet".to_string(),
                total: Price::from_cents(0, CurrencyCode::USD),
                status: OrderStatus::Shipped,
                placed_at: Utc.with_ymd_and_hms(2025, 1, 18, 9, 5, 0).single()
                    .expect("valid timestamp"),
            },
            Order {
                id: OrderId::new(1003),
                owner: demo_shopper,
                item: "Scanner-Approved T-Shirt".to_string(),
                total: Price::from_cents(2399, CurrencyCode::USD),
                status: OrderStatus::Pending,
                placed_at: Utc.with_ymd_and_hms(2025, 2, 2, 19, 45, 0).single()
                    .expect("valid timestamp"),
            },
        ]
        .into_iter()
        .map(|o| (o.id, o))
        .collect();

        Self { products, orders }
    }

    /// All products, in display order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by ID.
    #[must_use]
    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Look up an order by ID.
    #[must_use]
    pub fn order(&self, id: OrderId) -> Option<&Order> {
        self.orders.get(&id)
    }

    /// Orders owned by the given user, oldest ID first.
    #[must_use]
    pub fn orders_for(&self, owner: &Username) -> Vec<&Order> {
        let mut orders: Vec<&Order> = self.orders.values().filter(|o| &o.owner == owner).collect();
        orders.sort_by_key(|o| o.id);
        orders
    }

    /// All orders, oldest ID first.
    #[must_use]
    pub fn orders(&self) -> Vec<&Order> {
        let mut orders: Vec<&Order> = self.orders.values().collect();
        orders.sort_by_key(|o| o.id);
        orders
    }
}
