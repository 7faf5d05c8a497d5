//! Eco Bloom Admin library.
//!
//! The admin context: session guard, product add/edit with image intake,
//! deletion, dashboard figures, and backup export/import. Like the
//! storefront it is headless and drives a
//! [`RenderSurface`](ecobloom_catalog::RenderSurface).
//!
//! # Security
//!
//! The session guard only gates what this context offers. Anyone holding a
//! [`CatalogRepository`](ecobloom_catalog::CatalogRepository) on the same
//! store can still write to it.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod context;
pub mod dashboard;
pub mod error;
pub mod form;
pub mod models;
pub mod services;

pub use config::{AdminConfig, AdminCredentials, ConfigError};
pub use context::{AdminContext, ExportDocument};
pub use dashboard::DashboardStats;
pub use error::AppError;
pub use form::ProductForm;
pub use models::SessionState;
pub use services::{AuthError, ImageError, ImageList, IntakeReport, SessionGuard};
