//! Catalog domain types.

use chrono::{DateTime, Utc};

use football_shop_core::{CatalogItem, CategoryId, Price, ProductId};

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
}

/// A product, joined with its category's name and slug.
#[derive(Debug, Clone)]
pub struct Product {
    pub id: ProductId,
    pub category_id: CategoryId,
    pub category_name: String,
    pub category_slug: String,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub price: Price,
    pub stock_qty: u32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl CatalogItem for Product {
    fn id(&self) -> ProductId {
        self.id
    }

    fn price(&self) -> Price {
        self.price
    }

    fn is_active(&self) -> bool {
        self.is_active
    }
}

/// Input for creating a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub category_id: CategoryId,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub price: Price,
    pub stock_qty: u32,
    pub is_active: bool,
}

/// Catalog search parameters.
///
/// Blank strings are treated as "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Case-insensitive substring of the product name.
    pub query: Option<String>,
    /// Exact category slug.
    pub category: Option<String>,
    /// 1-based page number.
    pub page: u32,
}

impl ProductFilter {
    /// Build a filter from raw query-string values.
    #[must_use]
    pub fn new(query: Option<&str>, category: Option<&str>, page: Option<u32>) -> Self {
        fn non_blank(value: Option<&str>) -> Option<String> {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(ToOwned::to_owned)
        }

        Self {
            query: non_blank(query),
            category: non_blank(category),
            page: page.unwrap_or(1).max(1),
        }
    }

    /// Row offset for a given page size.
    #[must_use]
    pub fn offset(&self, per_page: u32) -> i64 {
        i64::from(self.page.saturating_sub(1)) * i64::from(per_page)
    }
}
