//! Football Shop Core - Shared domain library.
//!
//! This crate provides the types and pure logic used across all Football Shop
//! components:
//! - `storefront` - Public shop, cart, checkout and the admin product screen
//! - `cli` - Command-line tools for migrations, seeding and admin management
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP. Cart arithmetic, slug normalization and checkout validation
//! live here so they can be tested without a running service.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and statuses
//! - [`cart`] - Session cart state and line-item materialization
//! - [`checkout`] - Checkout input validation and order drafting
//! - [`slug`] - URL slug normalization

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod checkout;
pub mod slug;
pub mod types;

pub use cart::{Cart, CartLine, CatalogItem, cart_total};
pub use checkout::{CheckoutError, CheckoutForm, CustomerDetails, OrderLineDraft, draft_lines};
pub use slug::slugify;
pub use types::*;
