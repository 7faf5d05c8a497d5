//! The rendering surface a context draws on.
//!
//! Markup, theming and toasts live outside this crate. A context calls into
//! a [`RenderSurface`] with the lists to show and the messages to display.

use ecobloom_core::{Product, ProductId, Review};
use tracing::{debug, error, info};

/// Severity of a user-visible notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationLevel {
    Success,
    Error,
    Info,
}

/// A user-visible message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
        }
    }
}

/// Where a context sends what the user should see.
pub trait RenderSurface: Send {
    /// Show this ordered product list (empty means "no results").
    fn render_products(&mut self, products: &[&Product]);

    /// Show the reviews for one product.
    fn show_reviews(&mut self, product_id: &ProductId, reviews: &[&Review]);

    /// Show a notification.
    fn notify(&mut self, notification: Notification);
}

/// Surface that remembers every call. Used for headless runs and tests.
#[derive(Debug, Default, Clone)]
pub struct RecordingSurface {
    /// Each rendered list, as product IDs in display order.
    pub renders: Vec<Vec<ProductId>>,
    /// Each review panel shown, as reviewer names.
    pub review_panels: Vec<(ProductId, Vec<String>)>,
    pub notifications: Vec<Notification>,
}

impl RecordingSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently rendered list.
    #[must_use]
    pub fn last_render(&self) -> Option<&[ProductId]> {
        self.renders.last().map(Vec::as_slice)
    }

    #[must_use]
    pub fn last_notification(&self) -> Option<&Notification> {
        self.notifications.last()
    }
}

impl RenderSurface for RecordingSurface {
    fn render_products(&mut self, products: &[&Product]) {
        self.renders
            .push(products.iter().map(|p| p.id.clone()).collect());
    }

    fn show_reviews(&mut self, product_id: &ProductId, reviews: &[&Review]) {
        self.review_panels.push((
            product_id.clone(),
            reviews.iter().map(|r| r.name.clone()).collect(),
        ));
    }

    fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }
}

/// Surface that writes through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSurface;

impl RenderSurface for LogSurface {
    fn render_products(&mut self, products: &[&Product]) {
        info!(count = products.len(), "render products");
        for product in products {
            debug!(
                id = %product.id,
                name = %product.name,
                price = %product.price.display(),
                rating = %product.rating.value(),
                "product"
            );
        }
    }

    fn show_reviews(&mut self, product_id: &ProductId, reviews: &[&Review]) {
        info!(product_id = %product_id, count = reviews.len(), "show reviews");
        for review in reviews {
            debug!(name = %review.name, stars = review.rating.get(), "review");
        }
    }

    fn notify(&mut self, notification: Notification) {
        match notification.level {
            NotificationLevel::Error => error!(message = %notification.message, "notification"),
            NotificationLevel::Success | NotificationLevel::Info => {
                info!(message = %notification.message, "notification");
            }
        }
    }
}
