//! Emporium Core - Shared types library.
//!
//! This crate provides the domain types used by the Emporium demo store
//! server. It contains only types and parsing logic - no I/O, no HTTP,
//! no async. Everything that touches the network lives in `emporium-store`.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, usernames, emails,
//!   roles, and prices

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
