//! Cart route handlers.
//!
//! The cart lives in the session; every mutation redirects back to the cart
//! page with a notice code.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::Redirect,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use football_shop_core::ProductId;

use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::routes::layout::Layout;
use crate::services::cart::{self, CartError, PricedCart};
use crate::state::AppState;

/// Add-to-cart form data. `qty` stays raw so bad input can fall back to 1.
#[derive(Debug, Default, Deserialize)]
pub struct AddToCartForm {
    pub qty: Option<String>,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "shop/cart.html")]
pub struct CartTemplate {
    pub layout: Layout,
    pub cart: PricedCart,
}

/// Display the cart with live prices and the total.
#[instrument(skip(state, session, layout))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    layout: Layout,
) -> Result<CartTemplate> {
    let stored = cart::load(&session).await?;
    let cart = cart::price(state.pool(), &stored).await?;
    Ok(CartTemplate { layout, cart })
}

/// Add a product to the cart.
#[instrument(skip(state, session, form))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Path(product_id): Path<ProductId>,
    Form(form): Form<AddToCartForm>,
) -> Result<Redirect> {
    match cart::add(state.pool(), &session, product_id, form.qty.as_deref()).await {
        Ok(product) => {
            add_breadcrumb("cart", "Added to cart", &[("product", product.slug)]);
            Ok(Redirect::to("/shop/cart?success=added_to_cart"))
        }
        Err(CartError::ProductUnavailable) => {
            Ok(Redirect::to("/shop/catalog?error=product_unavailable"))
        }
        Err(e) => Err(e.into()),
    }
}

/// Remove a product from the cart. Removing an absent product is a no-op.
#[instrument(skip(session))]
pub async fn remove(session: Session, Path(product_id): Path<ProductId>) -> Result<Redirect> {
    if cart::remove(&session, product_id).await? {
        Ok(Redirect::to("/shop/cart?info=removed_from_cart"))
    } else {
        Ok(Redirect::to("/shop/cart"))
    }
}

/// Empty the cart.
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Result<Redirect> {
    cart::clear(&session).await?;
    Ok(Redirect::to("/shop/cart?info=cart_cleared"))
}
