//! JSON API route handlers.

pub mod feed;
pub mod tokens;
