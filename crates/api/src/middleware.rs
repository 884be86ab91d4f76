//! API middleware.

use std::sync::Arc;

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use beanbook_common::{Authenticator, StorageBackend};
use beanbook_core::{
    CafeService, FriendService, MessagingService, NotificationService, ReviewService, UserService,
};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub friend_service: FriendService,
    pub messaging_service: MessagingService,
    pub notification_service: NotificationService,
    pub review_service: ReviewService,
    pub cafe_service: CafeService,
    pub authenticator: Authenticator,
    pub storage: Arc<dyn StorageBackend>,
}

/// Authentication middleware.
///
/// Verifies the bearer token and stashes the resolved user in request
/// extensions; handlers that require identity pull it back out through
/// [`crate::extractors::AuthUser`]. Requests without a valid token pass
/// through anonymously and only fail on protected handlers.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
        && let Ok(user_id) = state.authenticator.verify(token)
        && let Ok(user) = state.user_service.get_user(&user_id).await
    {
        req.extensions_mut().insert(user);
    }

    next.run(req).await
}
