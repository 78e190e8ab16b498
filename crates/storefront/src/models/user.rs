//! User domain types.

use chrono::{DateTime, Utc};

use football_shop_core::{Email, UserId};

/// A shop user (domain type).
///
/// Customers created at checkout have an unusable password hash until they
/// register through the normal flow.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Case-folded email address.
    pub email: Email,
    /// Display name, if known.
    pub full_name: Option<String>,
    /// Whether the user may manage the catalog.
    pub is_admin: bool,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Name to greet the user with.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| self.email.as_str())
    }
}
