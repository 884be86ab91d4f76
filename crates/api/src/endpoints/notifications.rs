//! Notification endpoints.

use axum::{
    Router,
    extract::{Path, State},
    routing::{delete, get},
};
use beanbook_common::AppResult;
use beanbook_db::entities::notification;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Create notifications router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_notifications))
        .route("/{notification_id}", delete(dismiss_notification))
}

/// Notification response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub id: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl From<notification::Model> for NotificationResponse {
    fn from(n: notification::Model) -> Self {
        Self {
            id: n.id,
            body: n.body,
            created_at: n.created_at.into(),
        }
    }
}

/// List the authenticated user's notifications, newest first.
async fn list_notifications(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<NotificationResponse>>> {
    let notifications = state
        .notification_service
        .list_notifications(&user.id)
        .await?;

    Ok(ApiResponse::ok(
        notifications
            .into_iter()
            .map(NotificationResponse::from)
            .collect(),
    ))
}

/// Dismiss a notification. Dismissal deletes it permanently.
async fn dismiss_notification(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(notification_id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    info!(user = %user.id, notification = %notification_id, "Dismissing notification");

    state
        .notification_service
        .dismiss(&user.id, &notification_id)
        .await?;

    Ok(ApiResponse::ok(()))
}
