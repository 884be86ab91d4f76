//! Message repository.

use std::sync::Arc;

use crate::entities::{Message, message};
use beanbook_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, sea_query::Expr,
};

/// Message repository for database operations.
#[derive(Clone)]
pub struct MessageRepository {
    db: Arc<DatabaseConnection>,
}

impl MessageRepository {
    /// Create a new message repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Persist a new message.
    pub async fn create(&self, model: message::ActiveModel) -> AppResult<message::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All messages between two users, oldest first.
    pub async fn find_conversation(
        &self,
        user_id: &str,
        partner_id: &str,
    ) -> AppResult<Vec<message::Model>> {
        Message::find()
            .filter(between_pair(user_id, partner_id))
            .order_by_asc(message::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// The most recent message between two users.
    pub async fn find_latest_between(
        &self,
        user_id: &str,
        partner_id: &str,
    ) -> AppResult<Option<message::Model>> {
        Message::find()
            .filter(between_pair(user_id, partner_id))
            .order_by_desc(message::Column::CreatedAt)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Unread messages sent by `partner_id` to `user_id`.
    pub async fn count_unread_from(&self, user_id: &str, partner_id: &str) -> AppResult<u64> {
        Message::find()
            .filter(message::Column::SenderId.eq(partner_id))
            .filter(message::Column::ReceiverId.eq(user_id))
            .filter(message::Column::IsRead.eq(false))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Flip all unread messages from `partner_id` to `user_id` to read.
    ///
    /// Idempotent: already-read rows are excluded from the update.
    pub async fn mark_read(&self, user_id: &str, partner_id: &str) -> AppResult<u64> {
        let result = Message::update_many()
            .col_expr(message::Column::IsRead, Expr::value(true))
            .filter(message::Column::SenderId.eq(partner_id))
            .filter(message::Column::ReceiverId.eq(user_id))
            .filter(message::Column::IsRead.eq(false))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// Delete a message, but only when `sender_id` is its sender.
    ///
    /// Single conditional statement; returns the rows removed so the caller
    /// can distinguish "deleted" from "not yours / not there".
    pub async fn delete_owned(&self, id: &str, sender_id: &str) -> AppResult<u64> {
        let result = Message::delete_many()
            .filter(message::Column::Id.eq(id))
            .filter(message::Column::SenderId.eq(sender_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }
}

fn between_pair(user_id: &str, partner_id: &str) -> Condition {
    Condition::any()
        .add(
            Condition::all()
                .add(message::Column::SenderId.eq(user_id))
                .add(message::Column::ReceiverId.eq(partner_id)),
        )
        .add(
            Condition::all()
                .add(message::Column::SenderId.eq(partner_id))
                .add(message::Column::ReceiverId.eq(user_id)),
        )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_message(id: &str, sender: &str, receiver: &str, read: bool) -> message::Model {
        message::Model {
            id: id.to_string(),
            sender_id: sender.to_string(),
            receiver_id: receiver.to_string(),
            text: "hi".to_string(),
            is_read: read,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_conversation_returns_both_directions() {
        let m1 = create_test_message("m1", "user1", "user2", true);
        let m2 = create_test_message("m2", "user2", "user1", false);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[m1, m2]])
                .into_connection(),
        );

        let repo = MessageRepository::new(db);
        let messages = repo.find_conversation("user1", "user2").await.unwrap();

        assert_eq!(messages.len(), 2);
    }

    #[tokio::test]
    async fn test_count_unread_from() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(3))
                }]])
                .into_connection(),
        );

        let repo = MessageRepository::new(db);
        let count = repo.count_unread_from("user1", "user2").await.unwrap();

        assert_eq!(count, 3);
    }

    #[tokio::test]
    async fn test_mark_read_reports_flipped_rows() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 2,
                }])
                .into_connection(),
        );

        let repo = MessageRepository::new(db);
        let flipped = repo.mark_read("user1", "user2").await.unwrap();

        assert_eq!(flipped, 2);
    }

    #[tokio::test]
    async fn test_delete_owned_misses_foreign_message() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = MessageRepository::new(db);
        let removed = repo.delete_owned("m1", "not-the-sender").await.unwrap();

        assert_eq!(removed, 0);
    }
}
