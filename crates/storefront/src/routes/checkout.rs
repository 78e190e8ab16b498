//! Checkout route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use football_shop_core::{CheckoutError, CheckoutForm};

use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::models::session::keys;
use crate::routes::layout::{Layout, Notice};
use crate::services::cart::{self, PricedCart};
use crate::services::checkout::{self, CheckoutFailure};
use crate::state::AppState;

const EMPTY_CART_REDIRECT: &str = "/shop/catalog?warning=cart_empty";

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "shop/checkout.html")]
pub struct CheckoutTemplate {
    pub layout: Layout,
    pub cart: PricedCart,
    pub form: CheckoutForm,
}

/// Human-readable text for a rejected form.
const fn form_error_message(err: &CheckoutError) -> &'static str {
    match err {
        CheckoutError::MissingFields(_) => "Please fill in name, phone and email.",
        CheckoutError::InvalidEmail(_) => "Please enter a valid email address.",
        CheckoutError::EmptyCart => "Your cart is empty.",
    }
}

/// Display the checkout form.
///
/// A logged-in user gets their email filled in.
#[instrument(skip(state, session, layout))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    layout: Layout,
) -> Result<Response> {
    let stored = cart::load(&session).await?;
    let cart = cart::price(state.pool(), &stored).await?;
    if cart.is_empty() {
        return Ok(Redirect::to(EMPTY_CART_REDIRECT).into_response());
    }

    let form = CheckoutForm {
        customer_email: layout
            .user
            .as_ref()
            .map(|u| u.email.to_string())
            .unwrap_or_default(),
        ..CheckoutForm::default()
    };

    Ok(CheckoutTemplate { layout, cart, form }.into_response())
}

/// Place the order.
///
/// Invalid contact details re-render the form with what was entered. On
/// success the cart is emptied and the home page shows the order number.
#[instrument(skip(state, session, layout, form))]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    mut layout: Layout,
    Form(form): Form<CheckoutForm>,
) -> Result<Response> {
    let stored = cart::load(&session).await?;
    let cart = cart::price(state.pool(), &stored).await?;

    match checkout::place_order(state.pool(), &cart, &form).await {
        Ok(order_id) => {
            cart::clear(&session).await?;
            session.insert(keys::LAST_ORDER, order_id).await?;
            add_breadcrumb("checkout", "Order placed", &[("order_id", order_id.to_string())]);
            Ok(Redirect::to("/").into_response())
        }
        Err(CheckoutFailure::Invalid(CheckoutError::EmptyCart)) => {
            Ok(Redirect::to(EMPTY_CART_REDIRECT).into_response())
        }
        Err(CheckoutFailure::Invalid(err)) => {
            tracing::debug!(error = %err, "Checkout form rejected");
            layout.push(Notice::error(form_error_message(&err)));
            Ok(CheckoutTemplate { layout, cart, form }.into_response())
        }
        Err(CheckoutFailure::OutOfStock(product_id)) => {
            tracing::info!(product_id = %product_id, "Checkout hit insufficient stock");
            Ok(Redirect::to("/shop/cart?error=out_of_stock").into_response())
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_error_message() {
        let missing = CheckoutError::MissingFields(vec!["phone"]);
        assert_eq!(
            form_error_message(&missing),
            "Please fill in name, phone and email."
        );
        let invalid = CheckoutForm {
            customer_name: "Ivan".to_owned(),
            customer_phone: "+7 900".to_owned(),
            customer_email: "nope".to_owned(),
            ..CheckoutForm::default()
        }
        .validate();
        assert!(matches!(invalid, Err(CheckoutError::InvalidEmail(_))));
        if let Err(err) = invalid {
            assert_eq!(form_error_message(&err), "Please enter a valid email address.");
        }
    }
}
