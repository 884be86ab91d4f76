//! Profile endpoints.

use axum::{
    Router,
    extract::{Path, State},
    routing::get,
};
use beanbook_common::AppResult;
use beanbook_db::entities::user;
use serde::Serialize;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Create profile router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(my_profile))
        .route("/{user_id}", get(public_profile))
}

/// Public profile fields.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub contact: Option<String>,
}

impl From<user::Model> for ProfileResponse {
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

/// The authenticated user's profile.
async fn my_profile(AuthUser(user): AuthUser) -> AppResult<ApiResponse<ProfileResponse>> {
    Ok(ApiResponse::ok(user.into()))
}

/// Another user's profile. Public.
async fn public_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<ApiResponse<ProfileResponse>> {
    let user = state.user_service.get_user(&user_id).await?;

    Ok(ApiResponse::ok(user.into()))
}
