//! Review repository.

use std::sync::Arc;

use crate::entities::{Review, review};
use beanbook_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    sea_query::Expr,
};

/// Partial update for a review. Absent fields keep their stored values.
#[derive(Debug, Default, Clone)]
#[allow(clippy::option_option)]
pub struct ReviewPatch {
    pub text: Option<String>,
    pub rating: Option<i16>,
    /// `Some(None)` clears the photo list, `Some(Some(json))` replaces it.
    pub photos: Option<Option<String>>,
}

impl ReviewPatch {
    /// Whether the patch changes anything at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.text.is_none() && self.rating.is_none() && self.photos.is_none()
    }
}

/// Review repository for database operations.
#[derive(Clone)]
pub struct ReviewRepository {
    db: Arc<DatabaseConnection>,
}

impl ReviewRepository {
    /// Create a new review repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Persist a new review.
    pub async fn create(&self, model: review::ActiveModel) -> AppResult<review::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a review by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<review::Model>> {
        Review::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Reviews for a cafe, newest first.
    pub async fn find_by_cafe(&self, cafe_id: &str) -> AppResult<Vec<review::Model>> {
        Review::find()
            .filter(review::Column::CafeId.eq(cafe_id))
            .order_by_desc(review::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Reviews written by a user, newest first.
    pub async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<review::Model>> {
        Review::find()
            .filter(review::Column::UserId.eq(user_id))
            .order_by_desc(review::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Apply a patch to a review, but only when `author_id` is its author.
    ///
    /// Single conditional statement: the ownership check and the mutation
    /// cannot be interleaved with a concurrent writer. Returns the rows
    /// touched (0 when absent or foreign).
    pub async fn update_owned(
        &self,
        id: &str,
        author_id: &str,
        patch: &ReviewPatch,
    ) -> AppResult<u64> {
        let mut update = Review::update_many()
            .filter(review::Column::Id.eq(id))
            .filter(review::Column::UserId.eq(author_id));

        if let Some(ref text) = patch.text {
            update = update.col_expr(review::Column::Text, Expr::value(text.clone()));
        }
        if let Some(rating) = patch.rating {
            update = update.col_expr(review::Column::Rating, Expr::value(rating));
        }
        if let Some(ref photos) = patch.photos {
            update = update.col_expr(review::Column::Photos, Expr::value(photos.clone()));
        }

        let result = update
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// Delete a review, but only when `author_id` is its author.
    ///
    /// Returns the rows removed (0 when absent or foreign).
    pub async fn delete_owned(&self, id: &str, author_id: &str) -> AppResult<u64> {
        let result = Review::delete_many()
            .filter(review::Column::Id.eq(id))
            .filter(review::Column::UserId.eq(author_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }
}
