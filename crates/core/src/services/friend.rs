//! Social graph service.

use crate::services::jobs::Notifier;
use beanbook_common::{AppError, AppResult, IdGenerator};
use beanbook_db::{
    entities::{friendship, user},
    repositories::{FriendshipRepository, UserRepository, canonical_pair},
};
use chrono::Utc;
use sea_orm::Set;

/// Friend service for business logic.
#[derive(Clone)]
pub struct FriendService {
    friendship_repo: FriendshipRepository,
    user_repo: UserRepository,
    notifier: Option<Notifier>,
    id_gen: IdGenerator,
}

impl FriendService {
    /// Create a new friend service.
    #[must_use]
    pub const fn new(friendship_repo: FriendshipRepository, user_repo: UserRepository) -> Self {
        Self {
            friendship_repo,
            user_repo,
            notifier: None,
            id_gen: IdGenerator::new(),
        }
    }

    /// Set the notification producer.
    pub fn set_notifier(&mut self, notifier: Notifier) {
        self.notifier = Some(notifier);
    }

    /// All friends of a user, newest edge first.
    pub async fn list_friends(&self, user_id: &str) -> AppResult<Vec<user::Model>> {
        let edges = self.friendship_repo.find_for_user(user_id).await?;

        let mut friends = Vec::with_capacity(edges.len());
        for edge in edges {
            let counterpart = edge.counterpart_of(user_id);
            if let Some(friend) = self.user_repo.find_by_id(counterpart).await? {
                friends.push(friend);
            }
        }

        Ok(friends)
    }

    /// Check whether two users are friends.
    ///
    /// Symmetric: the stored edge is undirected, so argument order never
    /// matters.
    pub async fn is_friend(&self, user_id: &str, other_id: &str) -> AppResult<bool> {
        self.friendship_repo.are_friends(user_id, other_id).await
    }

    /// Add a friend.
    ///
    /// Notifies the new friend as a best-effort side effect; a failed
    /// notification never fails the friend-add.
    pub async fn add_friend(
        &self,
        user_id: &str,
        friend_id: &str,
    ) -> AppResult<friendship::Model> {
        if friend_id.is_empty() || friend_id == user_id {
            return Err(AppError::BadRequest("Invalid friend ID".to_string()));
        }

        // Check the friend resolves to a user
        if self.user_repo.find_by_id(friend_id).await?.is_none() {
            return Err(AppError::NotFound(format!("User not found: {friend_id}")));
        }

        if self.friendship_repo.are_friends(user_id, friend_id).await? {
            return Err(AppError::Conflict("Already friends".to_string()));
        }

        let user = self.user_repo.get_by_id(user_id).await?;

        let (a, b) = canonical_pair(user_id, friend_id);
        let model = friendship::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_a_id: Set(a.to_string()),
            user_b_id: Set(b.to_string()),
            created_at: Set(Utc::now().into()),
        };

        // A concurrent add for the same pair loses on the unique index and
        // surfaces as "already friends" rather than a server error.
        let edge = match self.friendship_repo.create(model).await {
            Ok(edge) => edge,
            Err(AppError::Database(msg))
                if msg.contains("duplicate") || msg.contains("unique") =>
            {
                return Err(AppError::Conflict("Already friends".to_string()));
            }
            Err(e) => return Err(e),
        };

        if let Some(ref notifier) = self.notifier
            && let Err(e) = notifier
                .notify(friend_id, format!("{} added you as a friend.", user.name))
                .await
        {
            tracing::warn!(error = %e, "Failed to enqueue friend notification");
        }

        Ok(edge)
    }

    /// Remove a friend. Works from either side of the edge.
    pub async fn remove_friend(&self, user_id: &str, friend_id: &str) -> AppResult<()> {
        let removed = self.friendship_repo.delete_edge(user_id, friend_id).await?;

        if removed == 0 {
            return Err(AppError::NotFound("Friendship not found".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn create_test_user(id: &str, name: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            name: name.to_string(),
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

    fn create_test_edge(id: &str, a: &str, b: &str) -> friendship::Model {
        friendship::Model {
            id: id.to_string(),
            user_a_id: a.to_string(),
            user_b_id: b.to_string(),
            created_at: Utc::now().into(),
        }
    }

    fn service(
        friendship_db: sea_orm::DatabaseConnection,
        user_db: sea_orm::DatabaseConnection,
    ) -> FriendService {
        FriendService::new(
            FriendshipRepository::new(Arc::new(friendship_db)),
            UserRepository::new(Arc::new(user_db)),
        )
    }

    #[tokio::test]
    async fn test_add_friend_yourself_returns_error() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        );

        let result = service.add_friend("user1", "user1").await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_add_friend_empty_id_returns_error() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        );

        let result = service.add_friend("user1", "").await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_add_friend_unknown_user_returns_not_found() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );

        let result = service.add_friend("user1", "ghost").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_add_friend_twice_returns_conflict() {
        let edge = create_test_edge("f1", "user1", "user2");
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[edge]])
                .into_connection(),
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_user("user2", "Mina")]])
                .into_connection(),
        );

        let result = service.add_friend("user1", "user2").await;

        match result {
            Err(AppError::Conflict(msg)) => assert_eq!(msg, "Already friends"),
            other => panic!("Expected Conflict, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_is_friend_symmetric() {
        let edge = create_test_edge("f1", "user1", "user2");
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[edge.clone()], [edge]])
                .into_connection(),
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        );

        assert!(service.is_friend("user1", "user2").await.unwrap());
        assert!(service.is_friend("user2", "user1").await.unwrap());
    }

    #[tokio::test]
    async fn test_remove_friend_missing_edge_returns_not_found() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        );

        let result = service.remove_friend("user1", "user2").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_remove_friend_works_from_either_side() {
        // Edge was added by user1; user2 removes it.
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        );

        assert!(service.remove_friend("user2", "user1").await.is_ok());
    }

    #[tokio::test]
    async fn test_list_friends_maps_counterparts() {
        let e1 = create_test_edge("f1", "user1", "user2");
        let e2 = create_test_edge("f2", "user0", "user1");

        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[e1, e2]])
                .into_connection(),
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([
                    [create_test_user("user2", "Mina")],
                    [create_test_user("user0", "Theo")],
                ])
                .into_connection(),
        );

        let friends = service.list_friends("user1").await.unwrap();

        assert_eq!(friends.len(), 2);
        assert_eq!(friends[0].id, "user2");
        assert_eq!(friends[1].id, "user0");
    }
}
