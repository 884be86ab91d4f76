//! Messaging service for direct messages between friends.

use beanbook_common::{AppError, AppResult, IdGenerator};
use beanbook_db::{
    entities::{message, user},
    repositories::{FriendshipRepository, MessageRepository, UserRepository},
};
use chrono::Utc;
use sea_orm::Set;
use sea_orm::prelude::DateTimeWithTimeZone;

/// Conversation summary for listing.
#[derive(Debug, Clone)]
pub struct ConversationSummary {
    /// The counterpart in the conversation.
    pub partner: user::Model,
    /// Messages the counterpart sent that are still unread.
    pub unread_count: u64,
    /// When the newest message between the pair was sent, if any.
    pub last_message_at: Option<DateTimeWithTimeZone>,
}

/// Messaging service.
#[derive(Clone)]
pub struct MessagingService {
    message_repo: MessageRepository,
    friendship_repo: FriendshipRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl MessagingService {
    /// Create a new messaging service.
    #[must_use]
    pub const fn new(
        message_repo: MessageRepository,
        friendship_repo: FriendshipRepository,
        user_repo: UserRepository,
    ) -> Self {
        Self {
            message_repo,
            friendship_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Send a message to a friend.
    pub async fn send_message(
        &self,
        sender_id: &str,
        receiver_id: &str,
        text: &str,
    ) -> AppResult<message::Model> {
        let text = text.trim();
        if receiver_id.is_empty() || text.is_empty() {
            return Err(AppError::BadRequest(
                "Receiver and message text required".to_string(),
            ));
        }

        if sender_id == receiver_id {
            return Err(AppError::BadRequest(
                "Cannot message yourself".to_string(),
            ));
        }

        // Check the receiver exists
        if self.user_repo.find_by_id(receiver_id).await?.is_none() {
            return Err(AppError::NotFound(format!("User not found: {receiver_id}")));
        }

        // The friendship check and the insert are deliberately not wrapped
        // in a transaction; an edge removed mid-flight may let an in-flight
        // send through.
        if !self.friendship_repo.are_friends(sender_id, receiver_id).await? {
            return Err(AppError::Forbidden(
                "You can only message friends".to_string(),
            ));
        }

        let model = message::ActiveModel {
            id: Set(self.id_gen.generate()),
            sender_id: Set(sender_id.to_string()),
            receiver_id: Set(receiver_id.to_string()),
            text: Set(text.to_string()),
            is_read: Set(false),
            created_at: Set(Utc::now().into()),
        };

        self.message_repo.create(model).await
    }

    /// Fetch the conversation with a friend, oldest message first.
    ///
    /// Every fetch flips the friend's unread messages to read; fetching an
    /// already-read thread changes nothing.
    pub async fn get_conversation(
        &self,
        user_id: &str,
        friend_id: &str,
    ) -> AppResult<Vec<message::Model>> {
        if !self.friendship_repo.are_friends(user_id, friend_id).await? {
            return Err(AppError::Forbidden("Not friends".to_string()));
        }

        let messages = self.message_repo.find_conversation(user_id, friend_id).await?;

        self.message_repo.mark_read(user_id, friend_id).await?;

        Ok(messages)
    }

    /// One summary per friend, ordered by most recent message.
    ///
    /// Friends without any message sort last.
    pub async fn list_conversations(&self, user_id: &str) -> AppResult<Vec<ConversationSummary>> {
        let edges = self.friendship_repo.find_for_user(user_id).await?;

        let mut summaries = Vec::with_capacity(edges.len());
        for edge in edges {
            let partner_id = edge.counterpart_of(user_id);
            let Some(partner) = self.user_repo.find_by_id(partner_id).await? else {
                continue;
            };

            let unread_count = self
                .message_repo
                .count_unread_from(user_id, &partner.id)
                .await?;

            let last_message_at = self
                .message_repo
                .find_latest_between(user_id, &partner.id)
                .await?
                .map(|m| m.created_at);

            summaries.push(ConversationSummary {
                partner,
                unread_count,
                last_message_at,
            });
        }

        // Descending by timestamp; None is the minimum, so silent threads
        // land at the end.
        summaries.sort_by(|x, y| y.last_message_at.cmp(&x.last_message_at));

        Ok(summaries)
    }

    /// Delete a message. Only the sender may do this.
    ///
    /// Single conditional delete: the receiver (or anyone else) gets
    /// `NotFound`, indistinguishable from a missing message.
    pub async fn delete_message(&self, requester_id: &str, message_id: &str) -> AppResult<()> {
        let removed = self.message_repo.delete_owned(message_id, requester_id).await?;

        if removed == 0 {
            return Err(AppError::NotFound(
                "Message not found or not yours".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use beanbook_db::entities::friendship;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn create_test_user(id: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            name: format!("User {id}"),
            email: format!("{id}@example.com"),
            password_hash: "$argon2id$test".to_string(),
            avatar_url: None,
            bio: None,
            location: None,
            contact: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn create_test_edge(a: &str, b: &str) -> friendship::Model {
        friendship::Model {
            id: format!("f-{a}-{b}"),
            user_a_id: a.to_string(),
            user_b_id: b.to_string(),
            created_at: Utc::now().into(),
        }
    }

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

    fn service(
        message_db: sea_orm::DatabaseConnection,
        friendship_db: sea_orm::DatabaseConnection,
        user_db: sea_orm::DatabaseConnection,
    ) -> MessagingService {
        MessagingService::new(
            MessageRepository::new(Arc::new(message_db)),
            FriendshipRepository::new(Arc::new(friendship_db)),
            UserRepository::new(Arc::new(user_db)),
        )
    }

    #[tokio::test]
    async fn test_send_message_rejects_blank_text() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        );

        let result = service.send_message("user1", "user2", "   ").await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_send_message_rejects_yourself() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        );

        let result = service.send_message("user1", "user1", "hello me").await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_send_message_unknown_receiver_returns_not_found() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );

        let result = service.send_message("user1", "ghost", "hello").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_send_message_between_non_friends_is_forbidden() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<friendship::Model>::new()])
                .into_connection(),
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_user("user2")]])
                .into_connection(),
        );

        // Valid text, valid receiver: the friendship gate alone rejects it.
        let result = service.send_message("user1", "user2", "hello").await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_get_conversation_between_non_friends_is_forbidden() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<friendship::Model>::new()])
                .into_connection(),
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        );

        let result = service.get_conversation("user1", "user2").await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_get_conversation_marks_thread_read() {
        let edge = create_test_edge("user1", "user2");
        let m1 = create_test_message("m1", "user2", "user1", false);

        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[m1]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[edge]])
                .into_connection(),
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        );

        let messages = service.get_conversation("user1", "user2").await.unwrap();

        assert_eq!(messages.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_message_by_non_sender_returns_not_found() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        );

        // The receiver trying to delete gets the same answer as a stranger.
        let result = service.delete_message("receiver", "m1").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_conversations_orders_silent_threads_last() {
        let e1 = create_test_edge("user1", "user2");
        let e2 = create_test_edge("user1", "user3");

        let latest = create_test_message("m9", "user2", "user1", true);

        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                // user2: unread count, latest message
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(0))
                }]])
                .append_query_results([[latest]])
                // user3: unread count, no messages
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(0))
                }]])
                .append_query_results([Vec::<message::Model>::new()])
                .into_connection(),
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[e1, e2]])
                .into_connection(),
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_user("user2")], [create_test_user("user3")]])
                .into_connection(),
        );

        let summaries = service.list_conversations("user1").await.unwrap();

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].partner.id, "user2");
        assert!(summaries[0].last_message_at.is_some());
        assert_eq!(summaries[1].partner.id, "user3");
        assert!(summaries[1].last_message_at.is_none());
    }
}
