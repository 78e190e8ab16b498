//! Session-related types.
//!
//! Everything the shop keeps per visitor lives in the session record: the
//! logged-in identity and the cart.

use serde::{Deserialize, Serialize};

use football_shop_core::{Email, UserId};

use super::User;

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the logged-in user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's database ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
    /// Name shown in the navigation bar.
    pub name: String,
    /// Admin flag captured at login.
    pub is_admin: bool,
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.display_name().to_owned(),
            is_admin: user.is_admin,
        }
    }
}

/// Session keys.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the product-id to quantity cart mapping.
    pub const CART: &str = "cart";

    /// Key for the id of the order just placed, shown once on the home page.
    pub const LAST_ORDER: &str = "last_order";
}
