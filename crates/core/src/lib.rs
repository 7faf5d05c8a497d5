//! Eco Bloom Core - Shared catalog types.
//!
//! This crate provides the types used by every Eco Bloom component:
//! - `catalog` - Durable store adapter, repository and cross-context sync
//! - `storefront` - Public storefront context
//! - `admin` - Admin panel context
//! - `cli` - Command-line driver
//!
//! # Architecture
//!
//! The core crate contains only types, traits and pure functions - no I/O,
//! no storage access. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, ratings and the catalog entities
//! - [`query`] - Filtering and sorting of product lists for display
//! - [`clock`] - Injectable time source

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod clock;
pub mod query;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use query::{CatalogQuery, CategoryFilter, SortKey, query};
pub use types::*;
