//! Application services.

pub mod auth;
pub mod cart;
pub mod feed;
pub mod fetcher;
pub mod tokens;
