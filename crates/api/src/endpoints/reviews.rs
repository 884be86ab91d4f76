//! Review and like endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, post, put},
};
use beanbook_common::{AppError, AppResult};
use beanbook_core::{Liker, ReviewWithAuthor, ReviewWithCafe};
use beanbook_db::entities::review;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Create reviews router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_review))
        .route("/my", get(my_reviews))
        .route("/cafe/{cafe_id}", get(cafe_reviews))
        .route("/user/{user_id}", get(user_reviews))
        .route("/{review_id}", put(update_review))
        .route("/{review_id}", delete(delete_review))
        .route("/{review_id}/like", post(like_review))
        .route("/{review_id}/like", delete(unlike_review))
        .route("/{review_id}/likes", get(list_likers))
}

/// Review response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    pub id: String,
    pub user_id: String,
    pub cafe_id: String,
    pub text: String,
    pub rating: i16,
    pub photos: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<review::Model> for ReviewResponse {
    fn from(r: review::Model) -> Self {
        let photos = r.photo_urls();
        Self {
            id: r.id,
            user_id: r.user_id,
            cafe_id: r.cafe_id,
            text: r.text,
            rating: r.rating,
            photos,
            created_at: r.created_at.into(),
        }
    }
}

/// Create review request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    #[serde(default)]
    pub cafe_id: String,
    #[serde(default)]
    pub text: String,
    pub rating: Option<i16>,
    #[serde(default)]
    pub photos: Vec<String>,
}

/// Post a review.
async fn create_review(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateReviewRequest>,
) -> AppResult<ApiResponse<ReviewResponse>> {
    let rating = req
        .rating
        .ok_or_else(|| AppError::BadRequest("All fields are required.".to_string()))?;

    let input = beanbook_core::CreateReviewInput {
        cafe_id: req.cafe_id,
        text: req.text,
        rating,
        photos: req.photos,
    };

    let review = state.review_service.create_review(&user.id, input).await?;
    info!(review_id = %review.id, user_id = %user.id, "Posted review");

    Ok(ApiResponse::ok(review.into()))
}

/// Review with author display fields.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CafeReviewResponse {
    #[serde(flatten)]
    pub review: ReviewResponse,
    pub author_name: String,
    pub author_avatar_url: Option<String>,
}

impl From<ReviewWithAuthor> for CafeReviewResponse {
    fn from(row: ReviewWithAuthor) -> Self {
        Self {
            review: row.review.into(),
            author_name: row.author.name,
            author_avatar_url: row.author.avatar_url,
        }
    }
}

/// Reviews for a cafe, newest first.
async fn cafe_reviews(
    State(state): State<AppState>,
    Path(cafe_id): Path<String>,
) -> AppResult<ApiResponse<Vec<CafeReviewResponse>>> {
    let rows = state.review_service.reviews_by_cafe(&cafe_id).await?;

    Ok(ApiResponse::ok(
        rows.into_iter().map(CafeReviewResponse::from).collect(),
    ))
}

/// Review with the cafe it belongs to.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserReviewResponse {
    #[serde(flatten)]
    pub review: ReviewResponse,
    pub cafe_name: Option<String>,
}

impl From<ReviewWithCafe> for UserReviewResponse {
    fn from(row: ReviewWithCafe) -> Self {
        Self {
            review: row.review.into(),
            cafe_name: row.cafe.map(|c| c.name),
        }
    }
}

/// Reviews written by a user, newest first.
async fn user_reviews(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<ApiResponse<Vec<UserReviewResponse>>> {
    let rows = state.review_service.reviews_by_user(&user_id).await?;

    Ok(ApiResponse::ok(
        rows.into_iter().map(UserReviewResponse::from).collect(),
    ))
}

/// Reviews written by the authenticated user.
async fn my_reviews(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<UserReviewResponse>>> {
    let rows = state.review_service.reviews_by_user(&user.id).await?;

    Ok(ApiResponse::ok(
        rows.into_iter().map(UserReviewResponse::from).collect(),
    ))
}

/// Update review request. Absent fields keep stored values.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReviewRequest {
    pub text: Option<String>,
    pub rating: Option<i16>,
    pub photos: Option<Vec<String>>,
}

/// Update a review. Only its author may do this.
async fn update_review(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(review_id): Path<String>,
    Json(req): Json<UpdateReviewRequest>,
) -> AppResult<ApiResponse<ReviewResponse>> {
    let input = beanbook_core::UpdateReviewInput {
        text: req.text,
        rating: req.rating,
        photos: req.photos,
    };

    let updated = state
        .review_service
        .update_review(&review_id, &user.id, input)
        .await?;

    Ok(ApiResponse::ok(updated.into()))
}

/// Delete a review. Only its author may do this.
async fn delete_review(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(review_id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    info!(review_id = %review_id, user_id = %user.id, "Deleting review");

    state
        .review_service
        .delete_review(&review_id, &user.id)
        .await?;

    Ok(ApiResponse::ok(()))
}

/// Like count after a like or unlike.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeCountResponse {
    pub likes: u64,
}

/// Like a review.
async fn like_review(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(review_id): Path<String>,
) -> AppResult<ApiResponse<LikeCountResponse>> {
    let likes = state.review_service.like_review(&review_id, &user.id).await?;

    Ok(ApiResponse::ok(LikeCountResponse { likes }))
}

/// Remove a like. Idempotent.
async fn unlike_review(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(review_id): Path<String>,
) -> AppResult<ApiResponse<LikeCountResponse>> {
    let likes = state
        .review_service
        .unlike_review(&review_id, &user.id)
        .await?;

    Ok(ApiResponse::ok(LikeCountResponse { likes }))
}

/// A user who liked a review.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikerResponse {
    pub id: String,
    pub name: String,
    pub avatar_url: Option<String>,
    pub liked_at: DateTime<Utc>,
}

impl From<Liker> for LikerResponse {
    fn from(liker: Liker) -> Self {
        Self {
            id: liker.user.id,
            name: liker.user.name,
            avatar_url: liker.user.avatar_url,
            liked_at: liker.liked_at.into(),
        }
    }
}

/// Users who liked a review, newest first.
async fn list_likers(
    State(state): State<AppState>,
    Path(review_id): Path<String>,
) -> AppResult<ApiResponse<Vec<LikerResponse>>> {
    let likers = state.review_service.list_likers(&review_id).await?;

    Ok(ApiResponse::ok(
        likers.into_iter().map(LikerResponse::from).collect(),
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_review_response_flattens_into_cafe_row() {
        let response = CafeReviewResponse {
            review: ReviewResponse {
                id: "r1".to_string(),
                user_id: "u1".to_string(),
                cafe_id: "c1".to_string(),
                text: "Proper crema".to_string(),
                rating: 5,
                photos: vec!["/uploads/a.jpg".to_string()],
                created_at: Utc::now(),
            },
            author_name: "Mina".to_string(),
            author_avatar_url: None,
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"rating\":5"));
        assert!(json.contains("\"authorName\":\"Mina\""));
        assert!(json.contains("\"photos\":[\"/uploads/a.jpg\"]"));
    }

    #[test]
    fn test_create_review_request_defaults() {
        let req: CreateReviewRequest = serde_json::from_str("{}").unwrap();
        assert!(req.cafe_id.is_empty());
        assert!(req.rating.is_none());
        assert!(req.photos.is_empty());
    }
}
