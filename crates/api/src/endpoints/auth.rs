//! Authentication and account endpoints.

use axum::{
    Json, Router,
    extract::{Multipart, State},
    routing::{get, post, put},
};
use beanbook_common::{AppError, AppResult, generate_storage_key};
use beanbook_db::entities::user;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Create auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me))
        .route("/update", put(update_profile))
        .route("/upload-pic", post(upload_profile_pic))
}

/// Account fields returned to clients. The password hash never leaves the
/// service layer.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub contact: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<user::Model> for AccountResponse {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            avatar_url: u.avatar_url,
            bio: u.bio,
            location: u.location,
            contact: u.contact,
            created_at: u.created_at.into(),
        }
    }
}

/// Register request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Create a new account.
async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<ApiResponse<AccountResponse>> {
    let input = beanbook_core::RegisterInput {
        name: req.name,
        email: req.email,
        password: req.password,
    };

    let user = state.user_service.register(input).await?;
    info!(user_id = %user.id, "Registered new user");

    Ok(ApiResponse::ok(user.into()))
}

/// Login request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user: AccountResponse,
}

/// Sign in with email and password.
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<ApiResponse<LoginResponse>> {
    let user = state
        .user_service
        .authenticate(&req.email, &req.password)
        .await?;

    let token = state.authenticator.issue(&user.id)?;

    Ok(ApiResponse::ok(LoginResponse {
        token,
        user: user.into(),
    }))
}

/// Get the current account.
async fn me(AuthUser(user): AuthUser) -> AppResult<ApiResponse<AccountResponse>> {
    Ok(ApiResponse::ok(user.into()))
}

/// Update profile request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub contact: Option<String>,
}

/// Update profile fields.
async fn update_profile(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<UpdateProfileRequest>,
) -> AppResult<ApiResponse<AccountResponse>> {
    let input = beanbook_core::UpdateProfileInput {
        name: req.name,
        bio: req.bio,
        location: req.location,
        contact: req.contact,
    };

    let updated = state.user_service.update_profile(&user.id, input).await?;

    Ok(ApiResponse::ok(updated.into()))
}

/// Upload response for a new profile picture.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadPicResponse {
    pub url: String,
    pub user: AccountResponse,
}

/// Upload a profile picture and set it as the account avatar.
async fn upload_profile_pic(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<ApiResponse<UploadPicResponse>> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut file_name = String::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() == Some("profile_pic") {
            file_name = field.file_name().unwrap_or("upload").to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            file_data = Some(bytes.to_vec());
        }
    }

    let data = file_data.ok_or_else(|| AppError::BadRequest("No file uploaded".to_string()))?;

    let key = format!("profile_pics/{}", generate_storage_key(&file_name));
    let stored = state.storage.store(&key, &data).await?;

    let updated = state.user_service.set_avatar(&user.id, &stored.url).await?;
    info!(user_id = %updated.id, url = %stored.url, "Updated profile picture");

    Ok(ApiResponse::ok(UploadPicResponse {
        url: stored.url,
        user: updated.into(),
    }))
}
