//! Review like repository.

use std::sync::Arc;

use crate::entities::{ReviewLike, review_like};
use beanbook_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};

/// Review like repository for database operations.
#[derive(Clone)]
pub struct ReviewLikeRepository {
    db: Arc<DatabaseConnection>,
}

impl ReviewLikeRepository {
    /// Create a new review like repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Whether a user already likes a review.
    pub async fn exists(&self, review_id: &str, user_id: &str) -> AppResult<bool> {
        let found = ReviewLike::find()
            .filter(review_like::Column::ReviewId.eq(review_id))
            .filter(review_like::Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(found.is_some())
    }

    /// Persist a new like.
    pub async fn create(&self, model: review_like::ActiveModel) -> AppResult<review_like::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Remove a like. Returns rows removed (0 when the user never liked it).
    pub async fn delete_pair(&self, review_id: &str, user_id: &str) -> AppResult<u64> {
        let result = ReviewLike::delete_many()
            .filter(review_like::Column::ReviewId.eq(review_id))
            .filter(review_like::Column::UserId.eq(user_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// Count likes on a review.
    pub async fn count_by_review(&self, review_id: &str) -> AppResult<u64> {
        ReviewLike::find()
            .filter(review_like::Column::ReviewId.eq(review_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All likes on a review, newest first.
    pub async fn find_by_review(&self, review_id: &str) -> AppResult<Vec<review_like::Model>> {
        ReviewLike::find()
            .filter(review_like::Column::ReviewId.eq(review_id))
            .order_by_desc(review_like::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
