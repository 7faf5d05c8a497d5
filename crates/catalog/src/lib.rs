//! Eco Bloom Catalog - shared state for the storefront and admin contexts.
//!
//! Each context (one storefront or admin instance) owns its own
//! [`CatalogRepository`]. The durable store is the single source of truth
//! that reconciles them: a write in one context is broadcast to every other
//! context sharing the store, whose [`Synchronizer`] reloads the full lists.
//!
//! # Modules
//!
//! - [`store`] - Durable and ephemeral key-value storage with change notifications
//! - [`repository`] - In-memory product/category/review lists and their mutations
//! - [`sync`] - Reload-on-change wiring between contexts
//! - [`surface`] - The rendering surface a context draws on

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod error;
pub mod repository;
pub mod store;
pub mod surface;
pub mod sync;

pub use error::{CatalogError, StoreError};
pub use repository::{CatalogRepository, ContextKind, ImportSummary};
pub use store::{
    ChangeEvent, ContextStore, Delivery, DurableBackend, FileBackend, MemoryBackend, SharedStore,
    StoreKey, Subscription,
};
pub use surface::{LogSurface, Notification, NotificationLevel, RecordingSurface, RenderSurface};
pub use sync::{SyncTarget, Synchronizer};
