//! Seed the catalog from a YAML file.
//!
//! The file is parsed and validated before any connection is made. Seeding
//! is idempotent: categories and products are matched by slug.

use std::path::Path;

use tracing::{error, info};

use football_shop_storefront::db::seed::{SeedCatalog, seed_catalog};
use football_shop_storefront::services::auth::AuthService;

use super::connect;

/// Display name given to a seeded admin that has none yet.
const SEED_ADMIN_NAME: &str = "Администратор магазина";

/// Admin account to create alongside the catalog.
#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub email: String,
    pub password: String,
}

/// Seed the catalog from a YAML file.
///
/// # Arguments
///
/// * `file_path` - Path to the YAML catalog
/// * `admin` - Admin user to create or promote first
/// * `check_only` - Validate the file and stop
///
/// # Errors
///
/// Returns an error if the file cannot be read or is invalid, or if any
/// database operation fails.
pub async fn catalog(
    file_path: &Path,
    admin: Option<&AdminSeed>,
    check_only: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !file_path.exists() {
        return Err(format!("File not found: {}", file_path.display()).into());
    }

    info!(path = %file_path.display(), "Loading catalog from file");

    // Read and validate YAML before connecting to database
    let content = tokio::fs::read_to_string(file_path).await?;
    let catalog = SeedCatalog::from_yaml(&content)?;

    info!(
        categories = catalog.categories.len(),
        products = catalog.products.len(),
        "Parsed catalog"
    );

    let errors = catalog.validate();
    if !errors.is_empty() {
        error!("Catalog validation failed:");
        for err in &errors {
            error!("  - {err}");
        }
        return Err(format!("{} validation errors found", errors.len()).into());
    }

    info!("Catalog validated successfully");
    if check_only {
        return Ok(());
    }

    let pool = connect().await?;

    if let Some(admin) = admin {
        let user = AuthService::new(&pool)
            .upsert_admin(&admin.email, &admin.password, Some(SEED_ADMIN_NAME))
            .await?;
        info!("Admin: {} (ID {})", user.email, user.id);
    }

    let report = seed_catalog(&pool, &catalog).await?;

    info!("Seeding complete!");
    info!("  Categories: {}", report.categories);
    info!("  Products created: {}", report.products_created);
    info!("  Products updated: {}", report.products_updated);

    Ok(())
}
