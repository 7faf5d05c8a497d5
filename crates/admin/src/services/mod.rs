//! Admin services.

pub mod auth;
pub mod images;

pub use auth::{AuthError, LIVENESS_INTERVAL, SESSION_TTL_HOURS, SessionGuard};
pub use images::{ImageError, ImageList, IntakeReport};
