//! Catalog seeding from a YAML file.
//!
//! Seeding is idempotent: categories and products are matched by slug and
//! updated in place, so re-running a seed never duplicates rows.
//!
//! ```yaml
//! categories:
//!   - name: Balls
//!     slug: balls
//! products:
//!   - name: Pro Match ball (size 5)
//!     slug: ball-pro-match-5
//!     category: balls
//!     description: Match ball.
//!     price: "3290.00"
//!     stock_qty: 40
//! ```

use std::collections::{HashMap, HashSet};

use serde::Deserialize;
use sqlx::PgPool;

use football_shop_core::{CategoryId, Price, slugify};

use super::RepositoryError;
use super::catalog::stock_to_db;

/// A catalog seed file.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedCatalog {
    #[serde(default)]
    pub categories: Vec<SeedCategory>,
    #[serde(default)]
    pub products: Vec<SeedProduct>,
}

/// A category entry.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedCategory {
    pub name: String,
    pub slug: String,
}

/// A product entry. `category` is a category slug.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedProduct {
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    #[serde(default)]
    pub stock_qty: u32,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

const fn default_active() -> bool {
    true
}

impl SeedProduct {
    /// Explicit slug, or one derived from the name.
    #[must_use]
    pub fn resolved_slug(&self) -> String {
        slugify(self.slug.as_deref().unwrap_or(&self.name))
    }
}

/// Counts reported after seeding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub categories: usize,
    pub products_created: usize,
    pub products_updated: usize,
}

impl SeedCatalog {
    /// Parse a YAML seed file.
    ///
    /// # Errors
    ///
    /// Returns the YAML error if the text doesn't match the seed format.
    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }

    /// Check the file for problems before touching the database.
    ///
    /// Returns one message per problem; an empty list means the file is usable.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let mut category_slugs = HashSet::new();

        for category in &self.categories {
            if category.name.trim().is_empty() {
                errors.push(format!("category '{}' has a blank name", category.slug));
            }
            let slug = slugify(&category.slug);
            if slug != category.slug {
                errors.push(format!(
                    "category slug '{}' is not normalized (expected '{slug}')",
                    category.slug
                ));
            }
            if !category_slugs.insert(category.slug.as_str()) {
                errors.push(format!("duplicate category slug '{}'", category.slug));
            }
        }

        let mut product_slugs = HashSet::new();
        for product in &self.products {
            let slug = product.resolved_slug();
            if product.name.trim().is_empty() {
                errors.push(format!("product '{slug}' has a blank name"));
            }
            if !category_slugs.contains(product.category.as_str()) {
                errors.push(format!(
                    "product '{slug}' references unknown category '{}'",
                    product.category
                ));
            }
            if !product_slugs.insert(slug.clone()) {
                errors.push(format!("duplicate product slug '{slug}'"));
            }
        }

        errors
    }
}

/// Upsert every category and product in one transaction.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if a product names a category that is
/// not in the file. Returns `RepositoryError::Database` if a query fails.
pub async fn seed_catalog(pool: &PgPool, catalog: &SeedCatalog) -> Result<SeedReport, RepositoryError> {
    let mut tx = pool.begin().await?;
    let mut report = SeedReport::default();
    let mut categories: HashMap<&str, CategoryId> = HashMap::new();

    for category in &catalog.categories {
        let id: i32 = sqlx::query_scalar(
            r"
            INSERT INTO categories (name, slug)
            VALUES ($1, $2)
            ON CONFLICT (slug) DO UPDATE SET name = EXCLUDED.name
            RETURNING id
            ",
        )
        .bind(category.name.trim())
        .bind(&category.slug)
        .fetch_one(&mut *tx)
        .await?;

        categories.insert(category.slug.as_str(), CategoryId::new(id));
        report.categories += 1;
    }

    for product in &catalog.products {
        let category_id = *categories
            .get(product.category.as_str())
            .ok_or(RepositoryError::NotFound)?;

        let inserted: bool = sqlx::query_scalar(
            r"
            INSERT INTO products (category_id, name, slug, description, price, stock_qty, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (slug) DO UPDATE
            SET category_id = EXCLUDED.category_id,
                name = EXCLUDED.name,
                description = EXCLUDED.description,
                price = EXCLUDED.price,
                stock_qty = EXCLUDED.stock_qty,
                is_active = EXCLUDED.is_active
            RETURNING (xmax = 0) AS inserted
            ",
        )
        .bind(category_id)
        .bind(product.name.trim())
        .bind(product.resolved_slug())
        .bind(product.description.trim())
        .bind(product.price)
        .bind(stock_to_db(product.stock_qty))
        .bind(product.is_active)
        .fetch_one(&mut *tx)
        .await?;

        if inserted {
            report.products_created += 1;
        } else {
            report.products_updated += 1;
        }
    }

    tx.commit().await?;

    tracing::info!(
        categories = report.categories,
        created = report.products_created,
        updated = report.products_updated,
        "Catalog seeded"
    );

    Ok(report)
}
