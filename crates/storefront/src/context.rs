//! The storefront context.
//!
//! One [`StorefrontContext`] per open storefront. It owns a storefront-kind
//! [`CatalogRepository`], the shopper's wishlist and preferences, and the
//! active listing query. Shopper intents update that state and re-render;
//! writes made by other contexts arrive through [`SyncTarget::resync`].

use std::sync::Arc;

use ecobloom_catalog::{
    CatalogRepository, ContextKind, ContextStore, Notification, RenderSurface, StoreKey,
    SyncTarget, Synchronizer,
};
use ecobloom_core::{
    CatalogQuery, CategoryFilter, Clock, Product, ProductId, Rating, Review, ReviewForm, SortKey,
};
use tracing::{debug, instrument};
use url::Url;

use crate::config::StorefrontConfig;
use crate::display::badge_label;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::preferences::Preferences;
use crate::purchase::{PurchaseLinks, PurchaseMessage};
use crate::wishlist::Wishlist;

/// Reviews shown when a product is opened.
pub const REVIEWS_SHOWN: usize = 3;

/// Something the shopper did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorefrontIntent {
    SearchChanged(String),
    CategoryChanged(CategoryFilter),
    SortChanged(SortKey),
    /// Open a product's detail view.
    ProductOpened(ProductId),
    ReviewSubmitted {
        product_id: ProductId,
        form: ReviewForm,
    },
    WishlistToggled(ProductId),
    DarkModeToggled,
}

/// Headless storefront state bound to a rendering surface.
#[derive(Debug)]
pub struct StorefrontContext<S> {
    repository: CatalogRepository,
    wishlist: Wishlist,
    preferences: Preferences,
    links: PurchaseLinks,
    query: CatalogQuery,
    surface: S,
}

impl<S: RenderSurface> StorefrontContext<S> {
    /// Load the catalog (seeding it on first run) and render the default
    /// listing.
    #[instrument(skip_all, fields(context = %store.context_id()))]
    pub fn start(
        store: ContextStore,
        clock: Arc<dyn Clock>,
        config: &StorefrontConfig,
        surface: S,
    ) -> Self {
        let mut context = Self {
            repository: CatalogRepository::new(store.clone(), ContextKind::Storefront, clock),
            wishlist: Wishlist::load(store.clone()),
            preferences: Preferences::load(store),
            links: PurchaseLinks::new(config.whatsapp_number.clone()),
            query: CatalogQuery::default(),
            surface,
        };
        context.reload();
        context
    }

    /// A synchronizer for this context's store, watching products and the
    /// wishlist.
    ///
    /// Create it right after [`start`](Self::start) so no remote write is
    /// missed between loading and subscribing.
    #[must_use]
    pub fn synchronizer(&self) -> Synchronizer {
        Synchronizer::new(self.repository.store())
            .watching(StoreKey::Wishlist)
            .watching(StoreKey::DarkMode)
    }

    /// Reload the catalog from the store and re-render with the active query.
    pub fn reload(&mut self) {
        if let Err(e) = self.repository.load() {
            self.report(&e.into());
        }
        self.render();
    }

    /// Render the active query.
    pub fn render(&mut self) {
        let products = self.repository.query(&self.query);
        self.surface.render_products(&products);
    }

    /// Apply a shopper intent, reporting any failure to the surface.
    pub fn handle(&mut self, intent: StorefrontIntent) {
        if let Err(e) = self.dispatch(intent) {
            self.report(&e);
        }
    }

    fn dispatch(&mut self, intent: StorefrontIntent) -> Result<()> {
        match intent {
            StorefrontIntent::SearchChanged(term) => {
                self.query.term = term;
                self.render();
            }
            StorefrontIntent::CategoryChanged(category) => {
                self.query.category = category;
                self.render();
            }
            StorefrontIntent::SortChanged(sort) => {
                self.query.sort = sort;
                self.render();
            }
            StorefrontIntent::ProductOpened(id) => self.open_product(&id)?,
            StorefrontIntent::ReviewSubmitted { product_id, form } => {
                self.submit_review(&product_id, form)?;
            }
            StorefrontIntent::WishlistToggled(id) => {
                self.toggle_wishlist(id)?;
            }
            StorefrontIntent::DarkModeToggled => {
                self.preferences.toggle_dark_mode()?;
            }
        }
        Ok(())
    }

    fn report(&mut self, error: &AppError) {
        self.surface.notify(error.notification());
    }

    /// Show the first reviews of a product.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` for an unknown product.
    pub fn open_product(&mut self, id: &ProductId) -> Result<()> {
        if self.repository.product(id).is_none() {
            return Err(AppError::NotFound(id.to_string()));
        }
        let reviews: Vec<&Review> = self.repository.reviews_for(id).take(REVIEWS_SHOWN).collect();
        self.surface.show_reviews(id, &reviews);
        Ok(())
    }

    /// Validate and record a review, then refresh the listing and the
    /// product's review panel. Returns the product's new rating.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` for an incomplete form, or
    /// `AppError::Catalog` if the product is unknown or saving fails.
    #[instrument(skip(self, form), fields(product_id = %product_id))]
    pub fn submit_review(&mut self, product_id: &ProductId, form: ReviewForm) -> Result<Rating> {
        let review = form.validate()?;
        add_breadcrumb("review", "Submitted review", Some(&[("product_id", product_id.as_str())]));

        let result = self.repository.add_review(product_id, review);
        // A failed write still changed this context's lists
        self.render();
        let rating = result?;

        self.surface
            .notify(Notification::success("Review submitted successfully!"));
        self.open_product(product_id)?;
        Ok(rating)
    }

    /// Add or remove a product from the wishlist. Returns `true` when added.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Storage` if the wishlist could not be saved.
    pub fn toggle_wishlist(&mut self, id: ProductId) -> Result<bool> {
        add_breadcrumb("wishlist", "Toggled wishlist", Some(&[("product_id", id.as_str())]));
        let added = self.wishlist.toggle(id)?;
        let message = if added {
            "Added to wishlist!"
        } else {
            "Removed from wishlist"
        };
        self.surface.notify(Notification::success(message));
        Ok(added)
    }

    /// Wishlisted products that still exist, in wishlist order.
    #[must_use]
    pub fn wishlist_items(&self) -> Vec<&Product> {
        self.wishlist.resolve(self.repository.products())
    }

    /// Number of wishlisted IDs.
    #[must_use]
    pub fn wishlist_count(&self) -> usize {
        self.wishlist.count()
    }

    /// WhatsApp link for buying a product.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` for an unknown product, or
    /// `AppError::Internal` if the configured number yields an invalid URL.
    pub fn purchase_link(&self, id: &ProductId, message: PurchaseMessage) -> Result<Url> {
        let product = self
            .repository
            .product(id)
            .ok_or_else(|| AppError::NotFound(id.to_string()))?;
        self.links
            .link(product, message)
            .map_err(|e| AppError::Internal(format!("purchase link: {e}")))
    }

    /// Badge text for a product's category.
    #[must_use]
    pub fn category_badge(&self, product: &Product) -> String {
        badge_label(&product.category)
    }

    #[must_use]
    pub const fn repository(&self) -> &CatalogRepository {
        &self.repository
    }

    #[must_use]
    pub const fn query(&self) -> &CatalogQuery {
        &self.query
    }

    #[must_use]
    pub const fn wishlist(&self) -> &Wishlist {
        &self.wishlist
    }

    #[must_use]
    pub const fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    #[must_use]
    pub const fn surface(&self) -> &S {
        &self.surface
    }

    pub const fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}

impl<S: RenderSurface> SyncTarget for StorefrontContext<S> {
    fn resync(&mut self, key: StoreKey) {
        debug!(key = key.as_str(), "storefront resync");
        match key {
            StoreKey::Wishlist => self.wishlist.reload(),
            StoreKey::DarkMode => self.preferences.reload(),
            StoreKey::Products | StoreKey::Categories | StoreKey::Reviews => self.reload(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};
    use ecobloom_catalog::{NotificationLevel, RecordingSurface, SharedStore};
    use ecobloom_core::{ManualClock, ProductDraft};

    use super::*;

    fn clock() -> Arc<dyn Clock> {
        Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
        ))
    }

    fn start(shared: &SharedStore) -> StorefrontContext<RecordingSurface> {
        StorefrontContext::start(
            shared.context(),
            clock(),
            &StorefrontConfig::default(),
            RecordingSurface::new(),
        )
    }

    fn ids(list: &[ProductId]) -> Vec<&str> {
        list.iter().map(ProductId::as_str).collect()
    }

    fn review(name: &str, rating: u8) -> ReviewForm {
        ReviewForm {
            name: name.to_string(),
            rating,
            comment: "Lovely".to_string(),
        }
    }

    #[test]
    fn test_start_seeds_and_renders() {
        let shared = SharedStore::in_memory();
        let ctx = start(&shared);
        assert_eq!(ctx.surface().renders.len(), 1);
        assert_eq!(ctx.surface().last_render().unwrap().len(), 4);
    }

    #[test]
    fn test_query_intents_rerender() {
        let shared = SharedStore::in_memory();
        let mut ctx = start(&shared);

        ctx.handle(StorefrontIntent::SearchChanged("coconut".to_string()));
        let mut found = ids(ctx.surface().last_render().unwrap());
        found.sort_unstable();
        assert_eq!(found, vec!["2", "4"]);

        ctx.handle(StorefrontIntent::SortChanged(SortKey::PriceHigh));
        assert_eq!(ids(ctx.surface().last_render().unwrap()), vec!["4", "2"]);

        ctx.handle(StorefrontIntent::CategoryChanged(CategoryFilter::parse("handicraft")));
        assert_eq!(ids(ctx.surface().last_render().unwrap()), vec!["4"]);
        assert_eq!(ctx.surface().renders.len(), 4);
    }

    #[test]
    fn test_open_product_shows_first_three_reviews() {
        let shared = SharedStore::in_memory();
        let mut ctx = start(&shared);
        let id = ProductId::new("1");
        for name in ["Ama", "Bandara", "Chamari", "Dilan"] {
            ctx.submit_review(&id, review(name, 5)).unwrap();
        }

        ctx.handle(StorefrontIntent::ProductOpened(id.clone()));
        let (shown_for, names) = ctx.surface().review_panels.last().unwrap();
        assert_eq!(shown_for, &id);
        assert_eq!(names, &vec!["Ama", "Bandara", "Chamari"]);
    }

    #[test]
    fn test_open_unknown_product_notifies() {
        let shared = SharedStore::in_memory();
        let mut ctx = start(&shared);
        ctx.handle(StorefrontIntent::ProductOpened(ProductId::new("nope")));
        let note = ctx.surface().last_notification().unwrap();
        assert_eq!(note.level, NotificationLevel::Error);
        assert_eq!(note.message, "Product not found");
        assert!(ctx.surface().review_panels.is_empty());
    }

    #[test]
    fn test_review_updates_rating() {
        let shared = SharedStore::in_memory();
        let mut ctx = start(&shared);
        let id = ProductId::new("3");

        ctx.handle(StorefrontIntent::ReviewSubmitted {
            product_id: id.clone(),
            form: review("Nimal", 4),
        });
        assert_eq!(
            ctx.surface().last_notification().unwrap(),
            &Notification::success("Review submitted successfully!")
        );

        let rating = ctx.submit_review(&id, review("Kamala", 5)).unwrap();
        assert_eq!(rating.value().to_string(), "4.5");
        let product = ctx.repository().product(&id).unwrap();
        assert_eq!(product.review_count, 2);
    }

    #[test]
    fn test_invalid_review_is_rejected() {
        let shared = SharedStore::in_memory();
        let mut ctx = start(&shared);

        ctx.handle(StorefrontIntent::ReviewSubmitted {
            product_id: ProductId::new("1"),
            form: review("   ", 4),
        });
        let note = ctx.surface().last_notification().unwrap();
        assert_eq!(note.level, NotificationLevel::Error);
        assert_eq!(note.message, "name cannot be empty");
        assert!(ctx.repository().reviews().is_empty());

        let err = ctx.submit_review(&ProductId::new("1"), review("Nimal", 0));
        assert!(matches!(err, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_wishlist_toggle_notifies() {
        let shared = SharedStore::in_memory();
        let mut ctx = start(&shared);

        ctx.handle(StorefrontIntent::WishlistToggled(ProductId::new("2")));
        assert_eq!(
            ctx.surface().last_notification().unwrap().message,
            "Added to wishlist!"
        );
        assert_eq!(ctx.wishlist_count(), 1);
        assert_eq!(ctx.wishlist_items()[0].name, "Organic Virgin Coconut Oil");

        ctx.handle(StorefrontIntent::WishlistToggled(ProductId::new("2")));
        assert_eq!(
            ctx.surface().last_notification().unwrap().message,
            "Removed from wishlist"
        );
        assert_eq!(ctx.wishlist_count(), 0);
    }

    #[test]
    fn test_resync_reloads_and_keeps_query() {
        let shared = SharedStore::in_memory();
        let mut ctx = start(&shared);
        ctx.handle(StorefrontIntent::CategoryChanged(CategoryFilter::parse("tea")));
        assert_eq!(ids(ctx.surface().last_render().unwrap()), vec!["3"]);

        let mut admin = CatalogRepository::new(shared.context(), ContextKind::Admin, clock());
        admin.load().unwrap();
        admin
            .upsert(ProductDraft {
                id: None,
                name: "Green Tea".to_string(),
                price: "9.50".parse().unwrap(),
                category: "tea".into(),
                description: String::new(),
                images: vec!["https://example.com/green.jpg".to_string()],
                featured: false,
            })
            .unwrap();

        ctx.resync(StoreKey::Products);
        let rendered = ctx.surface().last_render().unwrap();
        assert_eq!(rendered.len(), 2);
        assert_eq!(ctx.repository().products().len(), 5);
    }

    #[test]
    fn test_resync_wishlist_from_other_context() {
        let shared = SharedStore::in_memory();
        let mut ctx = start(&shared);
        let mut other = Wishlist::load(shared.context());
        other.toggle(ProductId::new("4")).unwrap();

        assert_eq!(ctx.wishlist_count(), 0);
        ctx.resync(StoreKey::Wishlist);
        assert_eq!(ctx.wishlist_count(), 1);
    }

    #[test]
    fn test_dark_mode_intent_persists() {
        let shared = SharedStore::in_memory();
        let mut ctx = start(&shared);
        ctx.handle(StorefrontIntent::DarkModeToggled);
        assert!(ctx.preferences().dark_mode());
        assert!(Preferences::load(shared.context()).dark_mode());
    }

    #[test]
    fn test_purchase_link_and_badge() {
        let shared = SharedStore::in_memory();
        let ctx = start(&shared);
        let id = ProductId::new("1");

        let url = ctx.purchase_link(&id, PurchaseMessage::Enquiry).unwrap();
        assert!(url.as_str().starts_with("https://wa.me/94775577148?text="));
        assert!(matches!(
            ctx.purchase_link(&ProductId::new("x"), PurchaseMessage::Order),
            Err(AppError::NotFound(_))
        ));

        let product = ctx.repository().product(&id).unwrap();
        assert_eq!(ctx.category_badge(product), "Spices");
    }
}
