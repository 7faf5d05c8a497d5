//! Data held by the admin context.

pub mod session;

pub use session::SessionState;
