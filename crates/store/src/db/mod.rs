//! In-memory data stores.
//!
//! The store deliberately has no database: the user table is a single
//! process-wide map that is seeded at startup and lost on exit, and the
//! product/order catalog is compiled in. Keeping state in-process keeps
//! the artifact a one-binary deployment with nothing to migrate.
//!
//! ## Tables
//!
//! - [`users::UserStore`] - registered accounts (one seeded admin)
//! - [`catalog::Catalog`] - read-only demo products and orders

pub mod catalog;
pub mod users;

use thiserror::Error;

/// Errors from the in-memory repositories.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A uniqueness constraint was violated.
    #[error("conflict: {0}")]
    Conflict(String),
}
