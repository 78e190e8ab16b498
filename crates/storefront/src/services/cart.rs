//! Cart service.
//!
//! The cart lives in the session under [`keys::CART`]. Only ids and
//! quantities are stored; everything else is re-read from the catalog.

use sqlx::PgPool;
use thiserror::Error;
use tower_sessions::Session;

use football_shop_core::{Cart, CartLine, Price, ProductId, cart_total};

use crate::db::{ProductRepository, RepositoryError};
use crate::models::Product;
use crate::models::session::keys;

/// Errors from cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The product does not exist or is not active.
    #[error("product not available")]
    ProductUnavailable,

    /// Session store failure.
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// A cart joined with live product data.
#[derive(Debug, Clone)]
pub struct PricedCart {
    pub lines: Vec<CartLine<Product>>,
    pub total: Price,
}

impl PricedCart {
    /// Whether nothing purchasable is in the cart.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Read the cart from the session. A missing cart is an empty one.
///
/// # Errors
///
/// Returns `CartError::Session` if the session store fails.
pub async fn load(session: &Session) -> Result<Cart, CartError> {
    Ok(session.get::<Cart>(keys::CART).await?.unwrap_or_default())
}

/// Write the cart back to the session.
///
/// # Errors
///
/// Returns `CartError::Session` if the session store fails.
pub async fn save(session: &Session, cart: &Cart) -> Result<(), CartError> {
    session.insert(keys::CART, cart).await?;
    Ok(())
}

/// Add a product to the cart.
///
/// `qty` is raw form input; unusable values count as 1.
///
/// # Errors
///
/// Returns `CartError::ProductUnavailable` if the product is missing or
/// inactive; the cart is left unchanged.
pub async fn add(
    pool: &PgPool,
    session: &Session,
    product_id: ProductId,
    qty: Option<&str>,
) -> Result<Product, CartError> {
    let product = ProductRepository::new(pool)
        .get_active_by_id(product_id)
        .await?
        .ok_or(CartError::ProductUnavailable)?;

    let qty = Cart::parse_quantity(qty);
    let mut cart = load(session).await?;
    cart.add(product.id, qty);
    save(session, &cart).await?;

    tracing::debug!(product_id = %product.id, qty, "Added to cart");
    Ok(product)
}

/// Remove a product from the cart. Returns whether it was there; absent
/// products are not an error.
///
/// # Errors
///
/// Returns `CartError::Session` if the session store fails.
pub async fn remove(session: &Session, product_id: ProductId) -> Result<bool, CartError> {
    let mut cart = load(session).await?;
    let removed = cart.remove(product_id);
    if removed {
        save(session, &cart).await?;
    }
    Ok(removed)
}

/// Empty the cart.
///
/// # Errors
///
/// Returns `CartError::Session` if the session store fails.
pub async fn clear(session: &Session) -> Result<(), CartError> {
    save(session, &Cart::new()).await
}

/// Join the cart against active products and total it.
///
/// # Errors
///
/// Returns `CartError::Repository` if the product lookup fails.
pub async fn price(pool: &PgPool, cart: &Cart) -> Result<PricedCart, CartError> {
    let products = ProductRepository::new(pool)
        .get_active_by_ids(&cart.product_ids())
        .await?;
    let lines = cart.materialize(&products);
    let total = cart_total(&lines);
    Ok(PricedCart { lines, total })
}
