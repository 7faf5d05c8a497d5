//! Catalog repository: one context's in-memory products, categories and
//! reviews, loaded from and written back to the durable store.
//!
//! Every mutation is a single read-compute-write of the full list. Two
//! contexts writing at the same time can lose one side's update: the last
//! writer wins and nothing is merged.

mod seed;

use std::sync::Arc;

use ecobloom_core::{
    CatalogQuery, Category, CategoryId, Clock, Product, ProductDraft, ProductId, Rating, Review,
    Snapshot, SnapshotImport, ValidReview, ValidationError,
};
use serde::de::DeserializeOwned;
use tracing::{info, instrument, warn};

pub use seed::demo_products;

use crate::error::CatalogError;
use crate::store::{ContextStore, StoreKey};

/// Which front-end a repository serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextKind {
    /// Public storefront. Seeds demo products on first run.
    Storefront,
    /// Admin panel. Never writes as a side effect of loading.
    Admin,
}

/// Collections replaced by an import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub products: Option<usize>,
    pub categories: Option<usize>,
    pub reviews: Option<usize>,
}

/// In-memory catalog state for one context.
#[derive(Debug)]
pub struct CatalogRepository {
    store: ContextStore,
    kind: ContextKind,
    clock: Arc<dyn Clock>,
    products: Vec<Product>,
    categories: Vec<Category>,
    reviews: Vec<Review>,
}

impl CatalogRepository {
    /// Create an empty repository. Call [`load`](Self::load) to populate it.
    #[must_use]
    pub fn new(store: ContextStore, kind: ContextKind, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            kind,
            clock,
            products: Vec::new(),
            categories: Category::defaults(),
            reviews: Vec::new(),
        }
    }

    /// Replace in-memory state with what the durable store holds.
    ///
    /// Unreadable values are logged and treated as absent. Categories fall
    /// back to the five defaults. A storefront finding no products seeds the
    /// demo catalog and persists it.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Storage` if persisting the demo seed fails;
    /// the seed is still loaded in memory.
    #[instrument(skip(self), fields(context = ?self.kind))]
    pub fn load(&mut self) -> Result<(), CatalogError> {
        let products: Vec<Product> = self.read_collection(StoreKey::Products).unwrap_or_default();
        self.categories = self
            .read_collection(StoreKey::Categories)
            .unwrap_or_else(Category::defaults);
        self.reviews = self.read_collection(StoreKey::Reviews).unwrap_or_default();

        if products.is_empty() && self.kind == ContextKind::Storefront {
            info!("no stored products, seeding demo catalog");
            self.products = demo_products(self.clock.now());
            self.persist_products()?;
        } else {
            self.products = products;
        }

        info!(
            products = self.products.len(),
            categories = self.categories.len(),
            reviews = self.reviews.len(),
            "catalog loaded"
        );
        Ok(())
    }

    fn read_collection<T: DeserializeOwned>(&self, key: StoreKey) -> Option<Vec<T>> {
        match self.store.read(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key = key.as_str(), error = %e, "ignoring unreadable stored value");
                None
            }
        }
    }

    /// Create or replace a product.
    ///
    /// With an `id` matching an existing product the record is replaced in
    /// place, keeping its creation time and review aggregates. Otherwise a
    /// new time-derived ID is assigned and the product is appended; its
    /// category must exist.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` (nothing changed) for invalid
    /// drafts, or `CatalogError::Storage` if the write fails (the change is
    /// kept in memory).
    #[instrument(skip(self, draft), fields(context = ?self.kind, name = %draft.name))]
    pub fn upsert(&mut self, draft: ProductDraft) -> Result<ProductId, CatalogError> {
        draft.validate()?;
        let now = self.clock.now();

        let existing = draft
            .id
            .as_ref()
            .and_then(|id| self.products.iter_mut().find(|p| &p.id == id));

        let id = if let Some(product) = existing {
            product.name = draft.name;
            product.price = draft.price;
            product.category = draft.category;
            product.description = draft.description;
            product.images = draft.images;
            product.featured = draft.featured;
            product.updated_at = Some(now);
            info!(product_id = %product.id, "product updated");
            product.id.clone()
        } else {
            if !self.categories.iter().any(|c| c.id == draft.category) {
                return Err(ValidationError::UnknownCategory(draft.category.to_string()).into());
            }
            let id = self.next_id(now.timestamp_millis());
            self.products.push(Product {
                id: id.clone(),
                name: draft.name,
                price: draft.price,
                category: draft.category,
                description: draft.description,
                images: draft.images,
                featured: draft.featured,
                rating: Rating::ZERO,
                review_count: 0,
                created_at: now,
                updated_at: Some(now),
            });
            info!(product_id = %id, "product added");
            id
        };

        self.persist_products()?;
        Ok(id)
    }

    /// Time-derived ID, bumped past any collision.
    fn next_id(&self, mut millis: i64) -> ProductId {
        loop {
            let id = ProductId::from_millis(millis);
            if !self.products.iter().any(|p| p.id == id) {
                return id;
            }
            millis += 1;
        }
    }

    /// Delete a product. Returns whether it existed.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Storage` if the write fails.
    #[instrument(skip(self), fields(context = ?self.kind))]
    pub fn remove(&mut self, id: &ProductId) -> Result<bool, CatalogError> {
        let before = self.products.len();
        self.products.retain(|p| &p.id != id);
        let removed = self.products.len() != before;
        self.persist_products()?;
        if removed {
            info!(product_id = %id, "product deleted");
        }
        Ok(removed)
    }

    /// Record a review and refresh the product's cached rating and count.
    ///
    /// Returns the product's new rating.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ProductNotFound` (nothing changed) for an
    /// unknown product, or `CatalogError::Storage` if a write fails.
    #[instrument(skip(self, review), fields(context = ?self.kind))]
    pub fn add_review(
        &mut self,
        product_id: &ProductId,
        review: ValidReview,
    ) -> Result<Rating, CatalogError> {
        let now = self.clock.now();
        let Some(product) = self.products.iter_mut().find(|p| &p.id == product_id) else {
            return Err(CatalogError::ProductNotFound(product_id.clone()));
        };

        self.reviews.push(review.into_review(product_id.clone(), now));

        let ratings: Vec<_> = self
            .reviews
            .iter()
            .filter(|r| &r.product_id == product_id)
            .map(|r| r.rating)
            .collect();
        product.review_count = u32::try_from(ratings.len()).unwrap_or(u32::MAX);
        product.rating = Rating::mean_of(ratings);
        let rating = product.rating;
        info!(product_id = %product_id, rating = %rating.value(), "review added");

        self.store.write(StoreKey::Reviews, &self.reviews)?;
        self.persist_products()?;
        Ok(rating)
    }

    /// The full catalog as a transportable document.
    #[must_use]
    pub fn export_snapshot(&self) -> Snapshot {
        Snapshot {
            products: self.products.clone(),
            categories: self.categories.clone(),
            reviews: self.reviews.clone(),
            export_date: self.clock.now(),
        }
    }

    /// Restore collections from a backup document.
    ///
    /// Each collection present in the document replaces the current one
    /// wholesale and is persisted; absent collections are left alone.
    /// Products are written last so other contexts reloading on the product
    /// notification see the restored categories and reviews too.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::MalformedImport` (nothing changed) if the
    /// document does not parse, or `CatalogError::Storage` if a write fails.
    #[instrument(skip(self, json), fields(context = ?self.kind))]
    pub fn import_snapshot(&mut self, json: &str) -> Result<ImportSummary, CatalogError> {
        let import = SnapshotImport::parse(json).map_err(CatalogError::MalformedImport)?;
        let mut summary = ImportSummary::default();

        if let Some(categories) = import.categories {
            summary.categories = Some(categories.len());
            self.categories = categories;
            self.store.write(StoreKey::Categories, &self.categories)?;
        }
        if let Some(reviews) = import.reviews {
            summary.reviews = Some(reviews.len());
            self.reviews = reviews;
            self.store.write(StoreKey::Reviews, &self.reviews)?;
        }
        if let Some(products) = import.products {
            summary.products = Some(products.len());
            self.products = products;
            self.persist_products()?;
        }

        info!(?summary, "backup restored");
        Ok(summary)
    }

    fn persist_products(&self) -> Result<(), CatalogError> {
        self.store.write(StoreKey::Products, &self.products)?;
        Ok(())
    }

    /// Filter and order the products for display.
    #[must_use]
    pub fn query(&self, q: &CatalogQuery) -> Vec<&Product> {
        ecobloom_core::query(&self.products, q)
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    #[must_use]
    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    #[must_use]
    pub fn product(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// Reviews for one product, in stored order.
    pub fn reviews_for<'a>(&'a self, id: &'a ProductId) -> impl Iterator<Item = &'a Review> {
        self.reviews.iter().filter(move |r| &r.product_id == id)
    }

    /// Display name of a category; orphaned IDs are shown raw.
    #[must_use]
    pub fn category_name<'a>(&'a self, id: &'a CategoryId) -> &'a str {
        self.categories
            .iter()
            .find(|c| &c.id == id)
            .map_or_else(|| id.as_str(), |c| c.name.as_str())
    }

    #[must_use]
    pub const fn kind(&self) -> ContextKind {
        self.kind
    }

    /// The store handle this repository reads and writes through.
    #[must_use]
    pub const fn store(&self) -> &ContextStore {
        &self.store
    }

    /// The clock stamping this repository's writes.
    #[must_use]
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, TimeZone, Utc};
    use ecobloom_core::{ManualClock, Price, ReviewForm};
    use rust_decimal::Decimal;

    use super::*;
    use crate::store::{MemoryBackend, SharedStore};

    fn clock() -> Arc<ManualClock> {
        Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
        ))
    }

    fn repo(shared: &SharedStore, kind: ContextKind, clock: &Arc<ManualClock>) -> CatalogRepository {
        let mut repo = CatalogRepository::new(shared.context(), kind, clock.clone());
        repo.load().unwrap();
        repo
    }

    fn draft(name: &str) -> ProductDraft {
        ProductDraft {
            id: None,
            name: name.to_owned(),
            price: Price::from_cents(999).unwrap(),
            category: CategoryId::new("tea"),
            description: "leaf".to_owned(),
            images: vec!["https://example.com/tea.jpg".to_owned()],
            featured: false,
        }
    }

    fn review(rating: u8) -> ValidReview {
        ReviewForm {
            name: "Ama".to_owned(),
            rating,
            comment: "Nice".to_owned(),
        }
        .validate()
        .unwrap()
    }

    #[test]
    fn test_storefront_seeds_demo_catalog_once() {
        let shared = SharedStore::in_memory();
        let clock = clock();
        let first = repo(&shared, ContextKind::Storefront, &clock);
        let ids: Vec<_> = first.products().iter().map(|p| p.id.to_string()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4"]);

        clock.advance(Duration::hours(1));
        let mut again = CatalogRepository::new(first.store().clone(), ContextKind::Storefront, clock.clone());
        again.load().unwrap();
        assert_eq!(again.products(), first.products());
    }

    #[test]
    fn test_admin_load_does_not_seed_or_write() {
        let shared = SharedStore::in_memory();
        let admin = repo(&shared, ContextKind::Admin, &clock());
        assert!(admin.products().is_empty());
        assert_eq!(admin.categories().len(), 5);
        assert_eq!(shared.backend().usage_bytes().unwrap(), 0);
    }

    #[test]
    fn test_corrupt_products_fall_back() {
        let shared = SharedStore::in_memory();
        shared
            .backend()
            .set(StoreKey::Products.as_str(), "not json")
            .unwrap();
        let admin = repo(&shared, ContextKind::Admin, &clock());
        assert!(admin.products().is_empty());
    }

    #[test]
    fn test_upsert_new_appends_with_fresh_id() {
        let shared = SharedStore::in_memory();
        let clock = clock();
        let mut admin = repo(&shared, ContextKind::Admin, &clock);

        let a = admin.upsert(draft("Green Tea")).unwrap();
        // same millisecond: the ID must still be unique
        let b = admin.upsert(draft("White Tea")).unwrap();
        assert_ne!(a, b);
        assert_eq!(admin.products().len(), 2);
        assert_eq!(a, ProductId::from_millis(clock.now().timestamp_millis()));

        let stored: Vec<Product> = admin.store().read(StoreKey::Products).unwrap().unwrap();
        assert_eq!(stored, admin.products());
    }

    #[test]
    fn test_upsert_existing_keeps_created_at_and_aggregates() {
        let shared = SharedStore::in_memory();
        let clock = clock();
        let mut admin = repo(&shared, ContextKind::Admin, &clock);
        let id = admin.upsert(draft("Green Tea")).unwrap();
        admin.add_review(&id, review(4)).unwrap();
        let created = admin.product(&id).unwrap().created_at;

        clock.advance(Duration::minutes(5));
        let mut edit = draft("Green Tea (100g)");
        edit.id = Some(id.clone());
        assert_eq!(admin.upsert(edit).unwrap(), id);

        assert_eq!(admin.products().len(), 1);
        let product = admin.product(&id).unwrap();
        assert_eq!(product.name, "Green Tea (100g)");
        assert_eq!(product.created_at, created);
        assert_eq!(product.updated_at, Some(clock.now()));
        assert_eq!(product.review_count, 1);
    }

    #[test]
    fn test_upsert_unknown_id_is_treated_as_new() {
        let shared = SharedStore::in_memory();
        let mut admin = repo(&shared, ContextKind::Admin, &clock());
        let mut d = draft("Green Tea");
        d.id = Some(ProductId::new("missing"));
        let id = admin.upsert(d).unwrap();
        assert_ne!(id, ProductId::new("missing"));
        assert_eq!(admin.products().len(), 1);
    }

    #[test]
    fn test_upsert_validation_leaves_state_untouched() {
        let shared = SharedStore::in_memory();
        let mut admin = repo(&shared, ContextKind::Admin, &clock());

        let mut no_image = draft("Green Tea");
        no_image.images.clear();
        assert!(matches!(
            admin.upsert(no_image),
            Err(CatalogError::Validation(ValidationError::MissingImage))
        ));

        let mut orphan = draft("Green Tea");
        orphan.category = CategoryId::new("jewellery");
        assert!(matches!(
            admin.upsert(orphan),
            Err(CatalogError::Validation(ValidationError::UnknownCategory(_)))
        ));

        assert!(admin.products().is_empty());
        assert_eq!(shared.backend().usage_bytes().unwrap(), 0);
    }

    #[test]
    fn test_storage_failure_keeps_memory_state() {
        let shared = SharedStore::new(Arc::new(MemoryBackend::with_quota(64)));
        let mut admin = repo(&shared, ContextKind::Admin, &clock());
        let result = admin.upsert(draft("Green Tea"));
        assert!(matches!(result, Err(CatalogError::Storage(_))));
        assert_eq!(admin.products().len(), 1);
    }

    #[test]
    fn test_remove() {
        let shared = SharedStore::in_memory();
        let mut store = repo(&shared, ContextKind::Storefront, &clock());
        assert!(store.remove(&ProductId::new("2")).unwrap());
        assert!(!store.remove(&ProductId::new("2")).unwrap());
        assert_eq!(store.products().len(), 3);
    }

    #[test]
    fn test_add_review_recomputes_mean_and_count() {
        let shared = SharedStore::in_memory();
        let mut store = repo(&shared, ContextKind::Storefront, &clock());
        let id = ProductId::new("3");

        assert_eq!(store.add_review(&id, review(5)).unwrap().value(), Decimal::from(5));
        store.add_review(&id, review(4)).unwrap();
        let rating = store.add_review(&id, review(4)).unwrap();

        // (5 + 4 + 4) / 3 = 4.33..
        assert_eq!(rating.value(), Decimal::new(43, 1));
        let product = store.product(&id).unwrap();
        assert_eq!(product.review_count, 3);
        assert_eq!(product.rating, rating);
        assert_eq!(store.reviews_for(&id).count(), 3);

        let stored: Vec<Review> = store.store().read(StoreKey::Reviews).unwrap().unwrap();
        assert_eq!(stored.len(), 3);
    }

    #[test]
    fn test_add_review_unknown_product() {
        let shared = SharedStore::in_memory();
        let mut store = repo(&shared, ContextKind::Storefront, &clock());
        assert!(matches!(
            store.add_review(&ProductId::new("99"), review(3)),
            Err(CatalogError::ProductNotFound(_))
        ));
        assert!(store.reviews().is_empty());
    }

    #[test]
    fn test_export_import_round_trip() {
        let shared = SharedStore::in_memory();
        let clock = clock();
        let mut store = repo(&shared, ContextKind::Storefront, &clock);
        store.add_review(&ProductId::new("1"), review(5)).unwrap();
        let json = store.export_snapshot().to_json().unwrap();

        let other = SharedStore::in_memory();
        let mut admin = repo(&other, ContextKind::Admin, &clock);
        let summary = admin.import_snapshot(&json).unwrap();

        assert_eq!(summary.products, Some(4));
        assert_eq!(admin.products(), store.products());
        assert_eq!(admin.categories(), store.categories());
        assert_eq!(admin.reviews(), store.reviews());
    }

    #[test]
    fn test_import_malformed_leaves_state() {
        let shared = SharedStore::in_memory();
        let mut store = repo(&shared, ContextKind::Storefront, &clock());
        let before = store.products().to_vec();
        assert!(matches!(
            store.import_snapshot("{\"products\": 12"),
            Err(CatalogError::MalformedImport(_))
        ));
        assert_eq!(store.products(), before.as_slice());
    }

    #[test]
    fn test_import_invalid_product_leaves_state() {
        let shared = SharedStore::in_memory();
        let mut store = repo(&shared, ContextKind::Admin, &clock());
        let document = r#"{"categories":[{"id":"gems","name":"Gemstones"}],"products":[{"id":"x","name":"Bad","price":-5,"category":"tea","images":[],"rating":9.7,"reviews":0,"createdAt":"2024-05-01T00:00:00Z"}]}"#;
        assert!(matches!(
            store.import_snapshot(document),
            Err(CatalogError::MalformedImport(_))
        ));
        assert!(store.products().is_empty());
        assert_eq!(store.category_name(&CategoryId::new("gems")), "gems");
        assert!(
            shared
                .context()
                .read::<Vec<Product>>(StoreKey::Products)
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn test_import_partial_document() {
        let shared = SharedStore::in_memory();
        let mut store = repo(&shared, ContextKind::Storefront, &clock());
        let summary = store
            .import_snapshot(r#"{"categories":[{"id":"gems","name":"Gemstones"}]}"#)
            .unwrap();
        assert_eq!(summary.categories, Some(1));
        assert_eq!(summary.products, None);
        assert_eq!(store.products().len(), 4);
        assert_eq!(store.category_name(&CategoryId::new("gems")), "Gemstones");
        // orphaned category shown raw
        assert_eq!(store.category_name(&CategoryId::new("tea")), "tea");
    }
}
