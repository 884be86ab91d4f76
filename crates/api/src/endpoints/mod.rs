//! API endpoints.

mod auth;
mod cafes;
mod files;
mod friends;
mod messages;
mod notifications;
mod profile;
mod reviews;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/cafes", cafes::router())
        .nest("/reviews", reviews::router())
        .nest("/notifications", notifications::router())
        .nest("/profile", profile::router())
        .nest("/friends", friends::router())
        .nest("/messages", messages::router())
        .nest("/files", files::router())
}
