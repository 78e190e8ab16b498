//! Checkout service.

use sqlx::PgPool;
use thiserror::Error;

use football_shop_core::{CheckoutError, CheckoutForm, OrderId, ProductId, draft_lines};

use crate::db::{OrderRepository, RepositoryError};
use crate::models::NewOrder;

use super::cart::PricedCart;

/// Why a checkout did not produce an order.
#[derive(Debug, Error)]
pub enum CheckoutFailure {
    /// Empty cart or invalid contact details.
    #[error(transparent)]
    Invalid(#[from] CheckoutError),

    /// A line asked for more than is in stock, or its product went away.
    #[error("insufficient stock for product {0}")]
    OutOfStock(ProductId),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(RepositoryError),
}

impl From<RepositoryError> for CheckoutFailure {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::InsufficientStock(id) => Self::OutOfStock(id),
            other => Self::Repository(other),
        }
    }
}

/// Validate the form and place an order for the priced cart.
///
/// The cart itself is not touched; callers clear it after success.
///
/// # Errors
///
/// Returns `CheckoutFailure::Invalid` before any write if the cart is empty
/// or the form is incomplete. Returns `CheckoutFailure::OutOfStock` if stock
/// ran out; no order is created in that case.
pub async fn place_order(
    pool: &PgPool,
    cart: &PricedCart,
    form: &CheckoutForm,
) -> Result<OrderId, CheckoutFailure> {
    let lines = draft_lines(&cart.lines)?;
    let customer = form.validate()?;

    let order_id = OrderRepository::new(pool)
        .place_order(&NewOrder { customer, lines })
        .await?;

    Ok(order_id)
}
