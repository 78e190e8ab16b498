//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `auth` - Registration and password login
//! - `cart` - Session cart persistence and materialization
//! - `checkout` - Turning a cart into an order
//! - `admin` - Product management
//!
//! Services take raw form input, validate it, and call the repositories.
//! Expected failures (bad input, conflicts) are returned as typed errors the
//! routes turn into notices; unexpected ones carry a `RepositoryError`.

pub mod admin;
pub mod auth;
pub mod cart;
pub mod checkout;
