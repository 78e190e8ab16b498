//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                               - Home page (new arrivals, order confirmation)
//! GET  /health                         - Liveness check
//! GET  /health/ready                   - Readiness check (database ping)
//!
//! # Shop
//! GET  /shop/                          - Redirect to catalog
//! GET  /shop/catalog?q=&category=&page= - Product listing
//! GET  /shop/product/{slug}            - Product detail
//! GET  /shop/cart                      - Cart page
//! POST /shop/cart/add/{product_id}     - Add to cart (form: qty)
//! POST /shop/cart/remove/{product_id}  - Remove a line
//! POST /shop/cart/clear                - Empty the cart
//! GET  /shop/checkout                  - Checkout form
//! POST /shop/checkout                  - Place order
//!
//! # Auth
//! GET  /auth/login                     - Login page
//! POST /auth/login                     - Login action
//! GET  /auth/register                  - Register page
//! POST /auth/register                  - Register action
//! POST /auth/logout                    - Logout action
//!
//! # Admin (admin session required)
//! GET  /admin/                         - Redirect to product list
//! GET  /admin/products                 - Product list and create form
//! POST /admin/products                 - Create product
//! POST /admin/products/{id}/toggle     - Activate/deactivate
//! POST /admin/products/{id}/delete     - Delete
//! ```

pub mod admin;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod health;
pub mod home;
pub mod layout;

use axum::{
    Router,
    body::Body,
    http::Request,
    routing::{get, post},
};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::Span;

use crate::middleware::{request_id_middleware, security_headers_middleware};
use crate::state::AppState;

/// Static assets, relative to the workspace root.
pub const STATIC_DIR: &str = "crates/storefront/static";

/// Create the shop routes router.
pub fn shop_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(catalog::index))
        .route("/catalog", get(catalog::catalog))
        .route("/product/{slug}", get(catalog::product))
        .route("/cart", get(cart::show))
        .route("/cart/add/{product_id}", post(cart::add))
        .route("/cart/remove/{product_id}", post(cart::remove))
        .route("/cart/clear", post(cart::clear))
        .route("/checkout", get(checkout::show).post(checkout::submit))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(admin::index))
        .route("/products", get(admin::products).post(admin::create))
        .route("/products/{product_id}/toggle", post(admin::toggle))
        .route("/products/{product_id}/delete", post(admin::delete))
}

/// Create all page routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/shop/", get(catalog::index))
        .route("/admin/", get(admin::index))
        .nest("/shop", shop_routes())
        .nest("/auth", auth_routes())
        .nest("/admin", admin_routes())
}

fn make_request_span(request: &Request<Body>) -> Span {
    tracing::info_span!(
        "http_request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = tracing::field::Empty,
    )
}

/// Build the full application: pages, health probes, static files and the
/// request-level middleware.
///
/// The session layer is not included; the caller supplies it with the store
/// of its choice.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .merge(routes())
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(axum::middleware::from_fn(security_headers_middleware))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .with_state(state)
}
