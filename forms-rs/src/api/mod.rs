//! REST API module for forms-rs
//!
//! Provides HTTP endpoints for form definition management and previews

pub mod handlers;
pub mod server;

pub use handlers::AppState;
pub use server::{router, ApiServer};
