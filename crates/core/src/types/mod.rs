//! Core types for Emporium.
//!
//! Type-safe wrappers for common domain concepts. Handlers parse untrusted
//! input into these types at the edge; the rest of the code never sees raw
//! strings where a validated type exists.

pub mod email;
pub mod id;
pub mod price;
pub mod role;
pub mod username;

pub use email::{Email, EmailError};
pub use id::*;
pub use price::{CurrencyCode, Price};
pub use role::Role;
pub use username::{Username, UsernameError};
