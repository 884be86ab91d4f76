//! HTTP API layer for beanbook.
//!
//! This crate provides the REST API:
//!
//! - **Endpoints**: auth, profiles, cafes, reviews, friends, messages,
//!   notifications, file uploads
//! - **Extractors**: the authenticated user
//! - **Middleware**: bearer-token authentication
//!
//! Built on Axum 0.8.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::AppState;
