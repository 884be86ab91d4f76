//! Notification repository.

use std::sync::Arc;

use crate::entities::{Notification, notification};
use beanbook_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

/// Notification repository for database operations.
#[derive(Clone)]
pub struct NotificationRepository {
    db: Arc<DatabaseConnection>,
}

impl NotificationRepository {
    /// Create a new notification repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Append a notification.
    pub async fn create(&self, model: notification::ActiveModel) -> AppResult<notification::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All notifications for a user, newest first.
    pub async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<notification::Model>> {
        Notification::find()
            .filter(notification::Column::UserId.eq(user_id))
            .order_by_desc(notification::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a notification, but only when `user_id` owns it.
    ///
    /// Returns the rows removed (0 when absent or foreign).
    pub async fn delete_owned(&self, id: &str, user_id: &str) -> AppResult<u64> {
        let result = Notification::delete_many()
            .filter(notification::Column::Id.eq(id))
            .filter(notification::Column::UserId.eq(user_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_notification(id: &str, user_id: &str, body: &str) -> notification::Model {
        notification::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            body: body.to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_user() {
        let n1 = create_test_notification("n2", "u1", "Mina liked your review.");
        let n2 = create_test_notification("n1", "u1", "Theo added you as a friend.");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[n1, n2]])
                .into_connection(),
        );

        let repo = NotificationRepository::new(db);
        let notifications = repo.find_by_user("u1").await.unwrap();

        assert_eq!(notifications.len(), 2);
        assert_eq!(notifications[0].id, "n2");
    }

    #[tokio::test]
    async fn test_delete_owned_foreign_notification() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = NotificationRepository::new(db);
        let removed = repo.delete_owned("n1", "someone-else").await.unwrap();

        assert_eq!(removed, 0);
    }
}
