//! Admin user management commands.
//!
//! # Usage
//!
//! ```bash
//! # Create an admin (or promote an existing user and reset their password)
//! fs-cli admin create -e admin@example.com -p '...' -n "Shop Admin"
//!
//! # Grant admin rights to a registered customer
//! fs-cli admin promote -e user@example.com
//! ```
//!
//! Admin rights are read at login, so a promoted user has to log in again.

use thiserror::Error;

use football_shop_core::{Email, EmailError, UserId};
use football_shop_storefront::db::{RepositoryError, UserRepository};
use football_shop_storefront::services::auth::{AuthError, AuthService};

use super::{ConnectError, connect};

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Could not connect.
    #[error(transparent)]
    Connect(#[from] ConnectError),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// No user with that email.
    #[error("No user with email: {0}")]
    UserNotFound(String),

    /// Account creation failed.
    #[error("Could not create admin: {0}")]
    Auth(#[from] AuthError),

    /// Database error.
    #[error("Database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Create an admin user, or promote an existing one and set its password.
///
/// # Returns
///
/// The ID of the admin user.
///
/// # Errors
///
/// Returns `AdminError` if the email or password is unusable or the
/// database fails.
pub async fn create_user(
    email: &str,
    password: &str,
    name: Option<&str>,
) -> Result<UserId, AdminError> {
    let pool = connect().await?;

    let user = AuthService::new(&pool)
        .upsert_admin(email, password, name)
        .await?;

    tracing::info!(
        "Admin user ready! ID: {}, Email: {}",
        user.id,
        user.email
    );
    Ok(user.id)
}

/// Grant admin rights to an existing user.
///
/// # Errors
///
/// Returns `AdminError::UserNotFound` if nobody has that email.
pub async fn promote(email: &str) -> Result<(), AdminError> {
    let email = Email::parse(email)?;
    let pool = connect().await?;

    UserRepository::new(&pool)
        .set_admin(&email, true)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AdminError::UserNotFound(email.to_string()),
            other => other.into(),
        })?;

    tracing::info!("User {} is now an admin", email);
    Ok(())
}
