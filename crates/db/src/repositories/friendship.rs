//! Friendship repository.
//!
//! Edges are stored once per pair in canonical order (see
//! [`crate::entities::friendship`]); every lookup goes through
//! [`canonical_pair`] so callers may pass the two IDs in any order.

use std::sync::Arc;

use crate::entities::{Friendship, friendship};
use beanbook_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};

/// Order two user IDs canonically: smaller first.
#[must_use]
pub fn canonical_pair<'a>(one: &'a str, other: &'a str) -> (&'a str, &'a str) {
    if one <= other { (one, other) } else { (other, one) }
}

/// Friendship repository for database operations.
#[derive(Clone)]
pub struct FriendshipRepository {
    db: Arc<DatabaseConnection>,
}

impl FriendshipRepository {
    /// Create a new friendship repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find the edge between two users, if any.
    pub async fn find_edge(
        &self,
        user_id: &str,
        other_id: &str,
    ) -> AppResult<Option<friendship::Model>> {
        let (a, b) = canonical_pair(user_id, other_id);
        Friendship::find()
            .filter(friendship::Column::UserAId.eq(a))
            .filter(friendship::Column::UserBId.eq(b))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check whether two users are friends, in either direction.
    pub async fn are_friends(&self, user_id: &str, other_id: &str) -> AppResult<bool> {
        Ok(self.find_edge(user_id, other_id).await?.is_some())
    }

    /// Create a new edge. The model must already be in canonical order.
    pub async fn create(&self, model: friendship::ActiveModel) -> AppResult<friendship::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete the edge between two users.
    ///
    /// Returns the number of rows removed (0 when no edge existed).
    pub async fn delete_edge(&self, user_id: &str, other_id: &str) -> AppResult<u64> {
        let (a, b) = canonical_pair(user_id, other_id);
        let result = Friendship::delete_many()
            .filter(friendship::Column::UserAId.eq(a))
            .filter(friendship::Column::UserBId.eq(b))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// All edges touching a user, newest first.
    pub async fn find_for_user(&self, user_id: &str) -> AppResult<Vec<friendship::Model>> {
        Friendship::find()
            .filter(
                Condition::any()
                    .add(friendship::Column::UserAId.eq(user_id))
                    .add(friendship::Column::UserBId.eq(user_id)),
            )
            .order_by_desc(friendship::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
