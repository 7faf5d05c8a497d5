//! Storefront-side commands: seeding and listing.
//!
//! # Environment Variables
//!
//! - `ECOBLOOM_DATA_DIR` - Store directory (default: ./data)

use std::path::PathBuf;
use std::sync::Arc;

use ecobloom_catalog::LogSurface;
use ecobloom_core::{CatalogQuery, CategoryFilter, SortKey, SystemClock};
use ecobloom_storefront::display::badge_label;
use ecobloom_storefront::{StorefrontConfig, StorefrontContext};
use tracing::info;

use super::{CommandError, open_store};

fn start(data_dir: Option<PathBuf>) -> Result<StorefrontContext<LogSurface>, CommandError> {
    let config = StorefrontConfig::from_env()?;
    let store = open_store(data_dir, config.data_dir.clone())?;
    Ok(StorefrontContext::start(
        store.context(),
        Arc::new(SystemClock),
        &config,
        LogSurface,
    ))
}

/// Load the catalog, seeding the demo products if the store has none.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the store cannot be
/// opened.
pub fn seed(data_dir: Option<PathBuf>) -> Result<(), CommandError> {
    let context = start(data_dir)?;
    let repository = context.repository();
    info!(
        products = repository.products().len(),
        categories = repository.categories().len(),
        reviews = repository.reviews().len(),
        "Catalog ready"
    );
    Ok(())
}

/// Print the products matching a query.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the store cannot be
/// opened.
pub fn list(
    data_dir: Option<PathBuf>,
    search: &str,
    category: &str,
    sort: &str,
) -> Result<(), CommandError> {
    let context = start(data_dir)?;
    let query = CatalogQuery {
        term: search.to_string(),
        category: CategoryFilter::parse(category),
        sort: SortKey::parse(sort),
    };

    let repository = context.repository();
    let products = repository.query(&query);
    info!(
        count = products.len(),
        sort = query.sort.as_str(),
        "Matching products"
    );
    for product in products {
        info!(
            id = %product.id,
            category = %badge_label(&product.category),
            price = %product.price.display(),
            rating = %product.rating.value(),
            reviews = product.review_count,
            "{}",
            product.name
        );
    }
    Ok(())
}
