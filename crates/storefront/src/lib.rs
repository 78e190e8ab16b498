//! Football Shop storefront library.
//!
//! The HTTP service as a library, so the binary, the CLI and the
//! integration tests share one router, one schema and one set of
//! repositories.

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
