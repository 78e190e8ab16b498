//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tower_sessions::Session;
use tracing::instrument;

use football_shop_core::OrderId;

use crate::db::{OrderRepository, ProductRepository};
use crate::error::Result;
use crate::filters;
use crate::models::Product;
use crate::models::session::keys;
use crate::routes::layout::{Layout, Notice};
use crate::state::AppState;

/// Number of products in the "new arrivals" strip.
const NEWEST_COUNT: u32 = 8;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub layout: Layout,
    pub products: Vec<Product>,
}

/// Display the home page.
///
/// Shows the newest active products. The confirmation for an order placed
/// in this session is shown once, then dropped.
#[instrument(skip(state, session, layout))]
pub async fn home(
    State(state): State<AppState>,
    session: Session,
    mut layout: Layout,
) -> Result<HomeTemplate> {
    if let Some(order_id) = session.remove::<OrderId>(keys::LAST_ORDER).await? {
        let message = match OrderRepository::new(state.pool()).get(order_id).await? {
            Some(order) => format!(
                "Order #{order_id} has been placed. Total: {} ₽.",
                order.total_amount()
            ),
            None => format!("Order #{order_id} has been placed."),
        };
        layout.push(Notice::success(message));
    }

    let products = ProductRepository::new(state.pool())
        .newest(NEWEST_COUNT)
        .await?;

    Ok(HomeTemplate { layout, products })
}
