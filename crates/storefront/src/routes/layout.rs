//! Data shared by every page: navigation state and one-shot notices.
//!
//! Handlers redirect with `?error=`, `?warning=`, `?success=` or `?info=`
//! carrying a fixed code. Only known codes produce a message, so the query
//! string can't inject text into the page.

use std::borrow::Cow;
use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use serde::Deserialize;
use tower_sessions::Session;

use football_shop_core::Cart;

use crate::models::CurrentUser;
use crate::models::session::keys;
use crate::state::AppState;

/// Severity of a notice, rendered as a CSS modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Error,
    Warning,
    Success,
    Info,
}

impl NoticeLevel {
    /// CSS class suffix for this level.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Success => "success",
            Self::Info => "info",
        }
    }
}

/// A message shown once at the top of a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: Cow<'static, str>,
}

impl Notice {
    /// A success notice with dynamic text.
    #[must_use]
    pub fn success(message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    /// A warning notice with dynamic text.
    #[must_use]
    pub fn warning(message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    /// An error notice with dynamic text.
    #[must_use]
    pub fn error(message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    /// Class name for the template.
    #[must_use]
    pub const fn css_class(&self) -> &'static str {
        self.level.css_class()
    }
}

/// Text for a notice code. Unknown codes have none.
#[must_use]
pub fn notice_message(code: &str) -> Option<&'static str> {
    let message = match code {
        "cart_empty" => "Your cart is empty.",
        "product_unavailable" => "That product is not available.",
        "added_to_cart" => "Added to cart.",
        "removed_from_cart" => "Removed from cart.",
        "cart_cleared" => "Cart cleared.",
        "out_of_stock" => {
            "Not enough stock for one of the items in your cart. Please adjust the quantity."
        }
        "registered" => "Registration complete. You are now logged in.",
        "logged_in" => "You are now logged in.",
        "logged_out" => "You have been logged out.",
        "product_created" => "Product created.",
        "product_toggled" => "Product status updated.",
        "product_deleted" => "Product deleted.",
        "missing_fields" => "Name and category are required.",
        "unknown_category" => "Category not found.",
        "slug_taken" => "A product with this slug already exists.",
        "has_orders" => "This product appears in orders and can't be deleted. Deactivate it instead.",
        _ => return None,
    };
    Some(message)
}

/// Notice codes carried in the query string.
#[derive(Debug, Default, Deserialize)]
pub struct NoticeQuery {
    pub error: Option<String>,
    pub warning: Option<String>,
    pub success: Option<String>,
    pub info: Option<String>,
}

impl NoticeQuery {
    /// Resolve known codes to notices, in severity order.
    #[must_use]
    pub fn notices(&self) -> Vec<Notice> {
        [
            (NoticeLevel::Error, &self.error),
            (NoticeLevel::Warning, &self.warning),
            (NoticeLevel::Success, &self.success),
            (NoticeLevel::Info, &self.info),
        ]
        .into_iter()
        .filter_map(|(level, code)| {
            let message = notice_message(code.as_deref()?)?;
            Some(Notice {
                level,
                message: Cow::Borrowed(message),
            })
        })
        .collect()
    }
}

/// Page chrome: app name, who is logged in, cart badge and notices.
#[derive(Debug, Clone)]
pub struct Layout {
    pub app_name: String,
    pub user: Option<CurrentUser>,
    pub cart_count: u64,
    pub notices: Vec<Notice>,
}

impl Layout {
    /// Whether the admin link should be shown.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.is_admin)
    }

    /// Append a notice.
    pub fn push(&mut self, notice: Notice) {
        self.notices.push(notice);
    }
}

impl FromRequestParts<AppState> for Layout {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let (user, cart_count) = match parts.extensions.get::<Session>() {
            Some(session) => {
                let user = session
                    .get::<CurrentUser>(keys::CURRENT_USER)
                    .await
                    .ok()
                    .flatten();
                let cart_count = session
                    .get::<Cart>(keys::CART)
                    .await
                    .ok()
                    .flatten()
                    .map_or(0, |cart| cart.total_quantity());
                (user, cart_count)
            }
            None => (None, 0),
        };

        let notices = Query::<NoticeQuery>::try_from_uri(&parts.uri)
            .map(|Query(query)| query.notices())
            .unwrap_or_default();

        Ok(Self {
            app_name: state.config().app_name.clone(),
            user,
            cart_count,
            notices,
        })
    }
}
