//! Database operations for the shop `PostgreSQL` database.
//!
//! ## Tables
//!
//! - `users` - Customers and admins (checkout auto-provisions customers)
//! - `categories` - Product categories
//! - `products` - Catalog, including inactive products
//! - `orders` - Orders with a snapshot of the customer's contact details
//! - `order_items` - Order lines with the unit price frozen at checkout
//! - `tower_sessions.session` - Session storage (created by `fs-cli migrate`)
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p football-shop-cli -- migrate
//! ```

pub mod catalog;
pub mod orders;
pub mod seed;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use catalog::{CategoryRepository, ProductRepository};
pub use orders::OrderRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database query failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is invalid or corrupted.
    #[error("Data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("Not found")]
    NotFound,

    /// A uniqueness or reference constraint blocked the write.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A product does not have enough stock for the requested quantity.
    #[error("Insufficient stock for product {0}")]
    InsufficientStock(football_shop_core::ProductId),
}

impl RepositoryError {
    /// Map a unique violation to [`RepositoryError::Conflict`], anything
    /// else to [`RepositoryError::Database`].
    pub(crate) fn conflict_on_unique(e: sqlx::Error, message: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.is_unique_violation()
        {
            return Self::Conflict(message.to_owned());
        }
        Self::Database(e)
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
