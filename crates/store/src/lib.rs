//! Emporium Store library.
//!
//! A small demo web store whose route surface mirrors the classic
//! web-vulnerability catalog (file inclusion, template injection, open
//! redirect, command execution, deserialization, upload, SSRF, XXE, and
//! friends) with every handler implemented safely. It exists as a hardened
//! baseline for exercising security-testing tooling: every probe a scanner
//! throws at it should come back clean.
//!
//! The crate is a library so the full router can be driven in-process by
//! the tests in `tests/`.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
