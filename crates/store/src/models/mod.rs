//! Domain models.

pub mod catalog;
pub mod user;

pub use catalog::{Order, OrderStatus, Product};
pub use user::{CurrentUser, User, session_keys};
