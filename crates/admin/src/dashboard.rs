//! Dashboard figures.

use ecobloom_catalog::{CatalogRepository, StoreError};
use rust_decimal::{Decimal, RoundingStrategy};

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Counts shown on the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardStats {
    pub products: usize,
    pub categories: usize,
    pub reviews: usize,
    /// Bytes held by the durable store.
    pub storage_bytes: u64,
}

impl DashboardStats {
    /// Gather figures from a loaded repository and its store.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the store cannot report its size.
    pub fn collect(repository: &CatalogRepository) -> Result<Self, StoreError> {
        Ok(Self {
            products: repository.products().len(),
            categories: repository.categories().len(),
            reviews: repository.reviews().len(),
            storage_bytes: repository.store().usage_bytes()?,
        })
    }

    /// Storage used in megabytes, two decimal places.
    #[must_use]
    pub fn storage_mb(&self) -> Decimal {
        (Decimal::from(self.storage_bytes) / Decimal::from(BYTES_PER_MB))
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use ecobloom_catalog::{ContextKind, SharedStore};
    use ecobloom_core::SystemClock;

    use super::*;

    #[test]
    fn test_storage_mb() {
        let stats = DashboardStats {
            products: 0,
            categories: 0,
            reviews: 0,
            storage_bytes: 3 * BYTES_PER_MB / 2,
        };
        assert_eq!(stats.storage_mb(), Decimal::new(15, 1));

        let tiny = DashboardStats {
            storage_bytes: 1000,
            ..stats
        };
        assert_eq!(tiny.storage_mb(), Decimal::ZERO);
    }

    #[test]
    fn test_collect_counts() {
        let shared = SharedStore::in_memory();
        let mut storefront =
            CatalogRepository::new(shared.context(), ContextKind::Storefront, Arc::new(SystemClock));
        storefront.load().unwrap();

        let mut admin =
            CatalogRepository::new(shared.context(), ContextKind::Admin, Arc::new(SystemClock));
        admin.load().unwrap();
        let stats = DashboardStats::collect(&admin).unwrap();

        assert_eq!(stats.products, 4);
        assert_eq!(stats.categories, 5);
        assert_eq!(stats.reviews, 0);
        assert!(stats.storage_bytes > 0);
    }
}
