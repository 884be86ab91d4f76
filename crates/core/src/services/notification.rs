//! Notification service.
//!
//! Reads and dismissals of the append-only inbox. Writes happen on the
//! fan-out worker in [`crate::services::jobs`].

use beanbook_common::{AppError, AppResult};
use beanbook_db::{entities::notification, repositories::NotificationRepository};

/// Notification service for business logic.
#[derive(Clone)]
pub struct NotificationService {
    notification_repo: NotificationRepository,
}

impl NotificationService {
    /// Create a new notification service.
    #[must_use]
    pub const fn new(notification_repo: NotificationRepository) -> Self {
        Self { notification_repo }
    }

    /// All notifications for a user, newest first.
    pub async fn list_notifications(&self, user_id: &str) -> AppResult<Vec<notification::Model>> {
        self.notification_repo.find_by_user(user_id).await
    }

    /// Dismiss a notification by deleting it.
    ///
    /// Single conditional delete matching id and owner; someone else's
    /// notification is indistinguishable from a missing one.
    pub async fn dismiss(&self, requester_id: &str, notification_id: &str) -> AppResult<()> {
        let removed = self
            .notification_repo
            .delete_owned(notification_id, requester_id)
            .await?;

        if removed == 0 {
            return Err(AppError::NotFound("Notification not found".to_string()));
        }

        Ok(())
    }
}
