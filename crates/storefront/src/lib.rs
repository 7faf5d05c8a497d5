//! Eco Bloom Storefront library.
//!
//! The public-facing context: browsing, searching and sorting the catalog,
//! reviews, the wishlist, the dark-mode preference and the WhatsApp purchase
//! hand-off. The context is headless; it drives a
//! [`RenderSurface`](ecobloom_catalog::RenderSurface) and keeps itself in sync
//! with edits made by other contexts sharing the same store.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod context;
pub mod display;
pub mod error;
pub mod preferences;
pub mod purchase;
pub mod wishlist;

pub use config::{ConfigError, StorefrontConfig};
pub use context::{StorefrontContext, StorefrontIntent};
pub use error::AppError;
pub use preferences::Preferences;
pub use purchase::{PurchaseLinks, PurchaseMessage};
pub use wishlist::Wishlist;
