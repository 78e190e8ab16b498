//! Admin product management route handlers.
//!
//! Every handler takes [`RequireAdmin`] first, so anonymous and non-admin
//! requests get `403` before the form body is even read.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::Redirect,
};
use tracing::instrument;

use football_shop_core::ProductId;

use crate::db::{CategoryRepository, ProductRepository};
use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::models::{Category, Product};
use crate::routes::layout::Layout;
use crate::services::admin::{AdminError, AdminService, ProductForm};
use crate::state::AppState;

const PRODUCTS_PATH: &str = "/admin/products";

/// Admin product list template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/products.html")]
pub struct ProductsTemplate {
    pub layout: Layout,
    pub products: Vec<Product>,
    pub categories: Vec<Category>,
}

/// Notice code for a rejected create.
const fn create_rejection(err: &AdminError) -> Option<&'static str> {
    match err {
        AdminError::MissingFields => Some("error=missing_fields"),
        AdminError::UnknownCategory => Some("error=unknown_category"),
        AdminError::SlugTaken(_) => Some("warning=slug_taken"),
        _ => None,
    }
}

/// `/admin/` goes to the product list.
pub async fn index(RequireAdmin(_): RequireAdmin) -> Redirect {
    Redirect::to(PRODUCTS_PATH)
}

/// List every product, active or not, with the create form.
#[instrument(skip_all, fields(admin_id = %admin.id))]
pub async fn products(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    layout: Layout,
) -> Result<ProductsTemplate> {
    let products = ProductRepository::new(state.pool()).list_all().await?;
    let categories = CategoryRepository::new(state.pool()).list().await?;

    Ok(ProductsTemplate {
        layout,
        products,
        categories,
    })
}

/// Create a product from the form.
#[instrument(skip_all, fields(admin_id = %admin.id))]
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Form(form): Form<ProductForm>,
) -> Result<Redirect> {
    match AdminService::new(state.pool()).create_product(&form).await {
        Ok(product) => {
            add_breadcrumb("admin", "Product created", &[("slug", product.slug)]);
            Ok(Redirect::to("/admin/products?success=product_created"))
        }
        Err(err) => match create_rejection(&err) {
            Some(code) => {
                tracing::info!(error = %err, "Product form rejected");
                Ok(Redirect::to(&format!("{PRODUCTS_PATH}?{code}")))
            }
            None => Err(err.into()),
        },
    }
}

/// Flip a product between active and inactive.
#[instrument(skip_all, fields(admin_id = %admin.id, product_id = %product_id))]
pub async fn toggle(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
) -> Result<Redirect> {
    AdminService::new(state.pool())
        .toggle_active(product_id)
        .await?;
    Ok(Redirect::to("/admin/products?info=product_toggled"))
}

/// Delete a product that has never been ordered.
#[instrument(skip_all, fields(admin_id = %admin.id, product_id = %product_id))]
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
) -> Result<Redirect> {
    match AdminService::new(state.pool())
        .delete_product(product_id)
        .await
    {
        Ok(()) => Ok(Redirect::to("/admin/products?info=product_deleted")),
        Err(AdminError::HasOrderHistory) => {
            Ok(Redirect::to("/admin/products?warning=has_orders"))
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::layout::NoticeQuery;

    #[test]
    fn test_create_rejection_codes_resolve() {
        for err in [
            AdminError::MissingFields,
            AdminError::UnknownCategory,
            AdminError::SlugTaken("ball".to_owned()),
        ] {
            let code = create_rejection(&err);
            assert!(code.is_some());
            let (key, value) = code.and_then(|c| c.split_once('=')).unwrap_or_default();
            let query = match key {
                "error" => NoticeQuery {
                    error: Some(value.to_owned()),
                    ..NoticeQuery::default()
                },
                _ => NoticeQuery {
                    warning: Some(value.to_owned()),
                    ..NoticeQuery::default()
                },
            };
            assert_eq!(query.notices().len(), 1);
        }
        assert_eq!(create_rejection(&AdminError::NotFound), None);
    }
}
