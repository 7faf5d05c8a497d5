//! Core types for Eco Bloom.
//!
//! This module provides type-safe wrappers for the catalog domain.

pub mod category;
pub mod id;
pub mod price;
pub mod product;
pub mod rating;
pub mod review;
pub mod snapshot;
pub mod validation;

pub use category::Category;
pub use id::*;
pub use price::{CurrencyCode, Price};
pub use product::{Product, ProductDraft};
pub use rating::{Rating, Stars};
pub use review::{Review, ReviewForm, ValidReview};
pub use snapshot::{Snapshot, SnapshotImport};
pub use validation::ValidationError;
