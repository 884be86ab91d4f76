//! Friend endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, post},
};
use beanbook_common::AppResult;
use beanbook_db::entities::{friendship, user};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Create friends router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_friends))
        .route("/", post(add_friend))
        .route("/check/{friend_id}", get(check_friend))
        .route("/{friend_id}", delete(remove_friend))
}

/// Friend list entry.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub contact: Option<String>,
}

impl From<user::Model> for FriendResponse {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            avatar_url: u.avatar_url,
            bio: u.bio,
            location: u.location,
            contact: u.contact,
        }
    }
}

/// List the authenticated user's friends, newest first.
async fn list_friends(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<FriendResponse>>> {
    let friends = state.friend_service.list_friends(&user.id).await?;

    Ok(ApiResponse::ok(
        friends.into_iter().map(FriendResponse::from).collect(),
    ))
}

/// Friend check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckFriendResponse {
    pub is_friend: bool,
}

/// Check whether the authenticated user is friends with another user.
async fn check_friend(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(friend_id): Path<String>,
) -> AppResult<ApiResponse<CheckFriendResponse>> {
    let is_friend = state.friend_service.is_friend(&user.id, &friend_id).await?;

    Ok(ApiResponse::ok(CheckFriendResponse { is_friend }))
}

/// Add friend request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddFriendRequest {
    #[serde(default)]
    pub friend_id: String,
}

/// New friendship edge.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendshipResponse {
    pub id: String,
    pub user_a_id: String,
    pub user_b_id: String,
    pub created_at: DateTime<Utc>,
}

impl From<friendship::Model> for FriendshipResponse {
    fn from(f: friendship::Model) -> Self {
        Self {
            id: f.id,
            user_a_id: f.user_a_id,
            user_b_id: f.user_b_id,
            created_at: f.created_at.into(),
        }
    }
}

/// Add a friend.
async fn add_friend(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<AddFriendRequest>,
) -> AppResult<ApiResponse<FriendshipResponse>> {
    info!(user = %user.id, friend = %req.friend_id, "Adding friend");

    let edge = state
        .friend_service
        .add_friend(&user.id, &req.friend_id)
        .await?;

    Ok(ApiResponse::ok(edge.into()))
}

/// Remove a friend.
async fn remove_friend(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(friend_id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    info!(user = %user.id, friend = %friend_id, "Removing friend");

    state
        .friend_service
        .remove_friend(&user.id, &friend_id)
        .await?;

    Ok(ApiResponse::ok(()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_check_friend_response_field_name() {
        let json = serde_json::to_string(&CheckFriendResponse { is_friend: true }).unwrap();
        assert!(json.contains("\"isFriend\":true"));
    }

    #[test]
    fn test_add_friend_request_tolerates_missing_field() {
        let req: AddFriendRequest = serde_json::from_str("{}").unwrap();
        assert!(req.friend_id.is_empty());
    }
}
