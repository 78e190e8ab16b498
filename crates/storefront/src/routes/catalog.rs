//! Catalog and product detail route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::Redirect,
};
use serde::Deserialize;
use tracing::instrument;

use crate::db::{CategoryRepository, ProductRepository};
use crate::error::{AppError, Result};
use crate::filters;
use crate::models::{Category, Product, ProductFilter};
use crate::routes::layout::Layout;
use crate::state::AppState;

/// Catalog query parameters.
///
/// `page` is taken as a string so a malformed value falls back to page 1
/// instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    pub q: Option<String>,
    pub category: Option<String>,
    pub page: Option<String>,
}

impl CatalogQuery {
    fn filter(&self) -> ProductFilter {
        let page = self
            .page
            .as_deref()
            .and_then(|p| p.trim().parse::<u32>().ok());
        ProductFilter::new(self.q.as_deref(), self.category.as_deref(), page)
    }
}

/// Page links for the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub total_pages: u32,
    pub prev_url: Option<String>,
    pub next_url: Option<String>,
}

impl Pagination {
    /// Build links for `filter` given the total match count.
    #[must_use]
    pub fn new(filter: &ProductFilter, total: i64, per_page: u32) -> Self {
        let per_page = i64::from(per_page.max(1));
        let pages = (total.max(0) + per_page - 1) / per_page;
        let total_pages = u32::try_from(pages.max(1)).unwrap_or(u32::MAX);
        let page = filter.page;

        Self {
            page,
            total_pages,
            prev_url: (page > 1).then(|| page_url(filter, page.saturating_sub(1).min(total_pages))),
            next_url: (page < total_pages).then(|| page_url(filter, page + 1)),
        }
    }

    /// Whether there is more than one page.
    #[must_use]
    pub const fn is_paged(&self) -> bool {
        self.total_pages > 1
    }
}

fn page_url(filter: &ProductFilter, page: u32) -> String {
    let mut url = format!("/shop/catalog?page={page}");
    if let Some(q) = &filter.query {
        url.push_str("&q=");
        url.push_str(&urlencoding::encode(q));
    }
    if let Some(category) = &filter.category {
        url.push_str("&category=");
        url.push_str(&urlencoding::encode(category));
    }
    url
}

/// Catalog page template.
#[derive(Template, WebTemplate)]
#[template(path = "shop/catalog.html")]
pub struct CatalogTemplate {
    pub layout: Layout,
    pub products: Vec<Product>,
    pub categories: Vec<Category>,
    pub query: String,
    pub category: String,
    pub total: i64,
    pub pagination: Pagination,
}

/// Product detail template.
#[derive(Template, WebTemplate)]
#[template(path = "shop/product.html")]
pub struct ProductTemplate {
    pub layout: Layout,
    pub product: Product,
}

/// `/shop/` goes straight to the catalog.
pub async fn index() -> Redirect {
    Redirect::to("/shop/catalog")
}

/// Display active products, filtered by name and category.
#[instrument(skip(state, layout))]
pub async fn catalog(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
    layout: Layout,
) -> Result<CatalogTemplate> {
    let filter = query.filter();
    let per_page = state.config().items_per_page;

    let (products, total) = ProductRepository::new(state.pool())
        .search(&filter, per_page)
        .await?;
    let categories = CategoryRepository::new(state.pool()).list().await?;

    Ok(CatalogTemplate {
        layout,
        pagination: Pagination::new(&filter, total, per_page),
        query: filter.query.unwrap_or_default(),
        category: filter.category.unwrap_or_default(),
        products,
        categories,
        total,
    })
}

/// Display a single active product.
#[instrument(skip(state, layout))]
pub async fn product(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    layout: Layout,
) -> Result<ProductTemplate> {
    let product = ProductRepository::new(state.pool())
        .get_active_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {slug}")))?;

    Ok(ProductTemplate { layout, product })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_bad_page_is_first_page() {
        let query = CatalogQuery {
            page: Some("abc".to_owned()),
            ..CatalogQuery::default()
        };
        assert_eq!(query.filter().page, 1);
    }

    #[test]
    fn test_pagination_single_page() {
        let filter = ProductFilter::new(None, None, None);
        let pagination = Pagination::new(&filter, 5, 12);
        assert_eq!(pagination.total_pages, 1);
        assert!(!pagination.is_paged());
        assert_eq!(pagination.prev_url, None);
        assert_eq!(pagination.next_url, None);
    }

    #[test]
    fn test_pagination_empty_result_has_one_page() {
        let filter = ProductFilter::new(Some("zzz"), None, None);
        assert_eq!(Pagination::new(&filter, 0, 12).total_pages, 1);
    }

    #[test]
    fn test_pagination_links_keep_filters() {
        let filter = ProductFilter::new(Some("pro ball"), Some("balls"), Some(2));
        let pagination = Pagination::new(&filter, 25, 12);
        assert_eq!(pagination.total_pages, 3);
        assert_eq!(
            pagination.prev_url.as_deref(),
            Some("/shop/catalog?page=1&q=pro%20ball&category=balls")
        );
        assert_eq!(
            pagination.next_url.as_deref(),
            Some("/shop/catalog?page=3&q=pro%20ball&category=balls")
        );
    }

    #[test]
    fn test_pagination_past_the_end_links_back() {
        let filter = ProductFilter::new(None, None, Some(9));
        let pagination = Pagination::new(&filter, 13, 12);
        assert_eq!(pagination.total_pages, 2);
        assert_eq!(pagination.prev_url.as_deref(), Some("/shop/catalog?page=2"));
        assert_eq!(pagination.next_url, None);
    }
}
