//! Review and like service.

use crate::services::jobs::Notifier;
use beanbook_common::{AppError, AppResult, IdGenerator};
use beanbook_db::{
    entities::{cafe, review, review_like, user},
    repositories::{
        CafeRepository, ReviewLikeRepository, ReviewPatch, ReviewRepository, UserRepository,
    },
};
use chrono::Utc;
use sea_orm::Set;
use sea_orm::prelude::DateTimeWithTimeZone;

/// Input for creating a new review.
#[derive(Debug, Clone)]
pub struct CreateReviewInput {
    pub cafe_id: String,
    pub text: String,
    pub rating: i16,
    /// Blob-store URLs, already uploaded.
    pub photos: Vec<String>,
}

/// Partial update for a review.
#[derive(Debug, Default, Clone)]
pub struct UpdateReviewInput {
    pub text: Option<String>,
    pub rating: Option<i16>,
    pub photos: Option<Vec<String>>,
}

/// A review joined with its author's display fields.
#[derive(Debug, Clone)]
pub struct ReviewWithAuthor {
    pub review: review::Model,
    pub author: user::Model,
}

/// A review joined with the cafe it belongs to.
#[derive(Debug, Clone)]
pub struct ReviewWithCafe {
    pub review: review::Model,
    pub cafe: Option<cafe::Model>,
}

/// A user who liked a review.
#[derive(Debug, Clone)]
pub struct Liker {
    pub user: user::Model,
    pub liked_at: DateTimeWithTimeZone,
}

/// Review service for business logic.
#[derive(Clone)]
pub struct ReviewService {
    review_repo: ReviewRepository,
    like_repo: ReviewLikeRepository,
    cafe_repo: CafeRepository,
    user_repo: UserRepository,
    notifier: Option<Notifier>,
    id_gen: IdGenerator,
}

impl ReviewService {
    /// Create a new review service.
    #[must_use]
    pub const fn new(
        review_repo: ReviewRepository,
        like_repo: ReviewLikeRepository,
        cafe_repo: CafeRepository,
        user_repo: UserRepository,
    ) -> Self {
        Self {
            review_repo,
            like_repo,
            cafe_repo,
            user_repo,
            notifier: None,
            id_gen: IdGenerator::new(),
        }
    }

    /// Set the notification producer.
    pub fn set_notifier(&mut self, notifier: Notifier) {
        self.notifier = Some(notifier);
    }

    /// Post a review for a cafe.
    pub async fn create_review(
        &self,
        author_id: &str,
        input: CreateReviewInput,
    ) -> AppResult<review::Model> {
        if input.cafe_id.is_empty() || input.text.trim().is_empty() {
            return Err(AppError::BadRequest("All fields are required.".to_string()));
        }

        if self.cafe_repo.find_by_id(&input.cafe_id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "Cafe not found: {}",
                input.cafe_id
            )));
        }

        let model = review::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(author_id.to_string()),
            cafe_id: Set(input.cafe_id),
            text: Set(input.text.trim().to_string()),
            rating: Set(input.rating),
            photos: Set(serialize_photos(&input.photos)?),
            created_at: Set(Utc::now().into()),
        };

        self.review_repo.create(model).await
    }

    /// Update a review. Only its author may do this.
    pub async fn update_review(
        &self,
        review_id: &str,
        requester_id: &str,
        input: UpdateReviewInput,
    ) -> AppResult<review::Model> {
        let patch = ReviewPatch {
            text: input.text.map(|t| t.trim().to_string()),
            rating: input.rating,
            photos: match input.photos {
                Some(photos) => Some(serialize_photos(&photos)?),
                None => None,
            },
        };

        if !patch.is_empty() {
            let touched = self
                .review_repo
                .update_owned(review_id, requester_id, &patch)
                .await?;

            if touched == 0 {
                return Err(self.ownership_failure(review_id, "edit").await?);
            }
        }

        self.review_repo
            .find_by_id(review_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Review not found: {review_id}")))
    }

    /// Delete a review. Only its author may do this.
    pub async fn delete_review(&self, review_id: &str, requester_id: &str) -> AppResult<()> {
        let removed = self
            .review_repo
            .delete_owned(review_id, requester_id)
            .await?;

        if removed == 0 {
            return Err(self.ownership_failure(review_id, "delete").await?);
        }

        Ok(())
    }

    /// Resolve a zero-row conditional mutation into the right error.
    ///
    /// The mutation itself cannot tell "absent" from "not yours"; one
    /// follow-up read after the fact can, without reopening the
    /// check-then-act window for the success path.
    async fn ownership_failure(&self, review_id: &str, verb: &str) -> AppResult<AppError> {
        Ok(match self.review_repo.find_by_id(review_id).await? {
            Some(_) => AppError::Forbidden(format!("Not authorized to {verb} this review.")),
            None => AppError::NotFound(format!("Review not found: {review_id}")),
        })
    }

    /// Reviews for a cafe with author display fields, newest first.
    pub async fn reviews_by_cafe(&self, cafe_id: &str) -> AppResult<Vec<ReviewWithAuthor>> {
        let reviews = self.review_repo.find_by_cafe(cafe_id).await?;

        let mut rows = Vec::with_capacity(reviews.len());
        for review in reviews {
            if let Some(author) = self.user_repo.find_by_id(&review.user_id).await? {
                rows.push(ReviewWithAuthor { review, author });
            }
        }

        Ok(rows)
    }

    /// Reviews written by a user with cafe names, newest first.
    pub async fn reviews_by_user(&self, user_id: &str) -> AppResult<Vec<ReviewWithCafe>> {
        let reviews = self.review_repo.find_by_user(user_id).await?;

        let mut rows = Vec::with_capacity(reviews.len());
        for review in reviews {
            let cafe = self.cafe_repo.find_by_id(&review.cafe_id).await?;
            rows.push(ReviewWithCafe { review, cafe });
        }

        Ok(rows)
    }

    /// Like a review and return the resulting like count.
    ///
    /// Notifies the review's author as a best-effort side effect, except on
    /// a self-like.
    pub async fn like_review(&self, review_id: &str, user_id: &str) -> AppResult<u64> {
        let review = self
            .review_repo
            .find_by_id(review_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Review not found: {review_id}")))?;

        if self.like_repo.exists(review_id, user_id).await? {
            return Err(AppError::Conflict("Already liked".to_string()));
        }

        let model = review_like::ActiveModel {
            id: Set(self.id_gen.generate()),
            review_id: Set(review_id.to_string()),
            user_id: Set(user_id.to_string()),
            created_at: Set(Utc::now().into()),
        };

        // A concurrent duplicate like loses on the unique index.
        if let Err(e) = self.like_repo.create(model).await {
            return Err(match e {
                AppError::Database(msg) if msg.contains("duplicate") || msg.contains("unique") => {
                    AppError::Conflict("Already liked".to_string())
                }
                other => other,
            });
        }

        if review.user_id != user_id {
            let liker_name = self
                .user_repo
                .find_by_id(user_id)
                .await
                .ok()
                .flatten()
                .map_or_else(|| "Someone".to_string(), |u| u.name);

            if let Some(ref notifier) = self.notifier
                && let Err(e) = notifier
                    .notify(&review.user_id, format!("{liker_name} liked your review."))
                    .await
            {
                tracing::warn!(error = %e, "Failed to enqueue like notification");
            }
        }

        self.like_repo.count_by_review(review_id).await
    }

    /// Remove a like and return the resulting count.
    ///
    /// Idempotent: unliking something never liked is not an error.
    pub async fn unlike_review(&self, review_id: &str, user_id: &str) -> AppResult<u64> {
        self.like_repo.delete_pair(review_id, user_id).await?;
        self.like_repo.count_by_review(review_id).await
    }

    /// Users who liked a review, newest first.
    pub async fn list_likers(&self, review_id: &str) -> AppResult<Vec<Liker>> {
        let likes = self.like_repo.find_by_review(review_id).await?;

        let mut likers = Vec::with_capacity(likes.len());
        for like in likes {
            if let Some(user) = self.user_repo.find_by_id(&like.user_id).await? {
                likers.push(Liker {
                    user,
                    liked_at: like.created_at,
                });
            }
        }

        Ok(likers)
    }
}

fn serialize_photos(photos: &[String]) -> AppResult<Option<String>> {
    if photos.is_empty() {
        return Ok(None);
    }

    serde_json::to_string(photos)
        .map(Some)
        .map_err(|e| AppError::Internal(format!("Failed to serialize photos: {e}")))
}
