//! The shopper's wishlist.
//!
//! An ordered set of product IDs persisted under `ecobloom_wishlist`. IDs of
//! products that no longer exist are kept; they simply resolve to nothing.

use ecobloom_catalog::{ContextStore, StoreError, StoreKey};
use ecobloom_core::{Product, ProductId};
use tracing::{debug, instrument, warn};

/// Wishlisted product IDs, in the order they were added.
#[derive(Debug, Clone)]
pub struct Wishlist {
    store: ContextStore,
    items: Vec<ProductId>,
}

impl Wishlist {
    /// Load the stored wishlist. Unreadable values start an empty list.
    #[must_use]
    pub fn load(store: ContextStore) -> Self {
        let mut wishlist = Self {
            store,
            items: Vec::new(),
        };
        wishlist.reload();
        wishlist
    }

    /// Re-read the stored list, dropping duplicate entries.
    pub fn reload(&mut self) {
        let stored: Vec<ProductId> = match self.store.read(StoreKey::Wishlist) {
            Ok(items) => items.unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "ignoring unreadable wishlist");
                Vec::new()
            }
        };

        self.items.clear();
        for id in stored {
            if !self.items.contains(&id) {
                self.items.push(id);
            }
        }
    }

    /// Add `id` if absent, remove it if present. Returns `true` when added.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if persisting fails; the toggle still applies to
    /// this context.
    #[instrument(skip(self), fields(product_id = %id))]
    pub fn toggle(&mut self, id: ProductId) -> Result<bool, StoreError> {
        let added = if let Some(pos) = self.items.iter().position(|item| item == &id) {
            self.items.remove(pos);
            false
        } else {
            self.items.push(id);
            true
        };
        debug!(added, count = self.items.len(), "wishlist toggled");

        self.store.write(StoreKey::Wishlist, &self.items)?;
        Ok(added)
    }

    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.items.contains(id)
    }

    #[must_use]
    pub fn ids(&self) -> &[ProductId] {
        &self.items
    }

    /// Number of wishlisted IDs, including ones whose product is gone.
    #[must_use]
    pub fn count(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The wishlisted products that still exist, in wishlist order.
    #[must_use]
    pub fn resolve<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        self.items
            .iter()
            .filter_map(|id| products.iter().find(|p| &p.id == id))
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use ecobloom_catalog::repository::demo_products;
    use ecobloom_catalog::SharedStore;

    use super::*;

    #[test]
    fn test_toggle_adds_then_removes() {
        let store = SharedStore::in_memory().context();
        let mut wishlist = Wishlist::load(store.clone());

        assert!(wishlist.toggle(ProductId::new("2")).unwrap());
        assert!(wishlist.toggle(ProductId::new("1")).unwrap());
        assert_eq!(wishlist.ids(), &[ProductId::new("2"), ProductId::new("1")]);

        assert!(!wishlist.toggle(ProductId::new("2")).unwrap());
        assert_eq!(wishlist.ids(), &[ProductId::new("1")]);

        let stored: Vec<String> = store.read(StoreKey::Wishlist).unwrap().unwrap();
        assert_eq!(stored, vec!["1"]);
    }

    #[test]
    fn test_load_deduplicates() {
        let store = SharedStore::in_memory().context();
        store.write(StoreKey::Wishlist, &["3", "1", "3"]).unwrap();

        let wishlist = Wishlist::load(store);
        assert_eq!(wishlist.count(), 2);
        assert_eq!(wishlist.ids(), &[ProductId::new("3"), ProductId::new("1")]);
    }

    #[test]
    fn test_corrupt_wishlist_is_empty() {
        let shared = SharedStore::in_memory();
        shared
            .backend()
            .set(StoreKey::Wishlist.as_str(), "{oops")
            .unwrap();
        let wishlist = Wishlist::load(shared.context());
        assert!(wishlist.is_empty());
    }

    #[test]
    fn test_resolve_skips_missing_products() {
        let store = SharedStore::in_memory().context();
        let mut wishlist = Wishlist::load(store);
        wishlist.toggle(ProductId::new("4")).unwrap();
        wishlist.toggle(ProductId::new("gone")).unwrap();
        wishlist.toggle(ProductId::new("1")).unwrap();

        let products = demo_products(Utc::now());
        let resolved: Vec<&str> = wishlist
            .resolve(&products)
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(resolved, vec!["4", "1"]);
        assert_eq!(wishlist.count(), 3);
    }
}
