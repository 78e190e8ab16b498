//! Admin product management.
//!
//! Numeric input is parsed leniently: a bad price becomes 0.00 and a bad
//! stock count becomes 0. Only a blank name or an unknown category rejects
//! the submission.

use serde::Deserialize;
use sqlx::PgPool;
use thiserror::Error;

use football_shop_core::{CategoryId, Price, ProductId, slugify};

use crate::db::{CategoryRepository, ProductRepository, RepositoryError};
use crate::models::{NewProduct, Product};

/// Errors from admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Name or category left blank.
    #[error("name and category are required")]
    MissingFields,

    /// Category id does not resolve.
    #[error("category not found")]
    UnknownCategory,

    /// Another product already uses the slug.
    #[error("slug already taken: {0}")]
    SlugTaken(String),

    /// The product appears in existing orders and can only be deactivated.
    #[error("product has order history")]
    HasOrderHistory,

    /// Product does not exist.
    #[error("product not found")]
    NotFound,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(RepositoryError),
}

impl From<RepositoryError> for AdminError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound => Self::NotFound,
            other => Self::Repository(other),
        }
    }
}

/// New-product form as submitted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub stock_qty: String,
    #[serde(default)]
    pub category_id: String,
}

impl ProductForm {
    /// Explicit slug if given, otherwise derived from the name.
    #[must_use]
    pub fn resolved_slug(&self) -> String {
        let explicit = self.slug.trim();
        slugify(if explicit.is_empty() {
            &self.name
        } else {
            explicit
        })
    }
}

/// Parse a stock count: negatives clamp to 0, garbage becomes 0.
#[must_use]
pub fn parse_stock(raw: &str) -> u32 {
    raw.trim()
        .parse::<i64>()
        .ok()
        .and_then(|n| u32::try_from(n.clamp(0, i64::from(i32::MAX))).ok())
        .unwrap_or(0)
}

/// Admin product service.
pub struct AdminService<'a> {
    categories: CategoryRepository<'a>,
    products: ProductRepository<'a>,
}

impl<'a> AdminService<'a> {
    /// Create a new admin service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            categories: CategoryRepository::new(pool),
            products: ProductRepository::new(pool),
        }
    }

    /// Create an active product from the admin form.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::MissingFields`, `AdminError::UnknownCategory` or
    /// `AdminError::SlugTaken` without writing anything.
    pub async fn create_product(&self, form: &ProductForm) -> Result<Product, AdminError> {
        let name = form.name.trim();
        let category_raw = form.category_id.trim();
        if name.is_empty() || category_raw.is_empty() {
            return Err(AdminError::MissingFields);
        }

        let category_id: CategoryId = category_raw
            .parse()
            .map_err(|_| AdminError::UnknownCategory)?;
        let category = self
            .categories
            .get_by_id(category_id)
            .await?
            .ok_or(AdminError::UnknownCategory)?;

        let slug = form.resolved_slug();
        if self.products.slug_exists(&slug).await? {
            return Err(AdminError::SlugTaken(slug));
        }

        let new_product = NewProduct {
            category_id: category.id,
            name: name.to_owned(),
            slug,
            description: form.description.trim().to_owned(),
            price: Price::parse_lenient(&form.price),
            stock_qty: parse_stock(&form.stock_qty),
            is_active: true,
        };

        let product = self
            .products
            .create(&new_product)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AdminError::SlugTaken(new_product.slug.clone()),
                other => other.into(),
            })?;

        tracing::info!(product_id = %product.id, slug = %product.slug, "Product created");
        Ok(product)
    }

    /// Flip a product's active flag. Returns the new value.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::NotFound` if the product doesn't exist.
    pub async fn toggle_active(&self, id: ProductId) -> Result<bool, AdminError> {
        let active = self.products.toggle_active(id).await?;
        tracing::info!(product_id = %id, active, "Product toggled");
        Ok(active)
    }

    /// Hard-delete a product without order history.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::HasOrderHistory` if any order references it.
    /// Returns `AdminError::NotFound` if the product doesn't exist.
    pub async fn delete_product(&self, id: ProductId) -> Result<(), AdminError> {
        self.products.delete(id).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => AdminError::HasOrderHistory,
            other => other.into(),
        })?;
        tracing::info!(product_id = %id, "Product deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_stock() {
        assert_eq!(parse_stock("25"), 25);
        assert_eq!(parse_stock(" 7 "), 7);
        assert_eq!(parse_stock("-3"), 0);
        assert_eq!(parse_stock("lots"), 0);
        assert_eq!(parse_stock(""), 0);
        assert_eq!(parse_stock("1.5"), 0);
        assert_eq!(parse_stock("99999999999"), 2_147_483_647);
    }

    #[test]
    fn test_resolved_slug_prefers_explicit() {
        let form = ProductForm {
            name: "Boots Speed FG".to_owned(),
            slug: " Speed_Boots ".to_owned(),
            ..ProductForm::default()
        };
        assert_eq!(form.resolved_slug(), "speed-boots");
    }

    #[test]
    fn test_resolved_slug_from_name() {
        let form = ProductForm {
            name: "Бутсы «Speed FG»".to_owned(),
            ..ProductForm::default()
        };
        assert_eq!(form.resolved_slug(), "speed-fg");

        let cyrillic = ProductForm {
            name: "Мяч".to_owned(),
            ..ProductForm::default()
        };
        assert_eq!(cyrillic.resolved_slug(), "item");
    }
}
