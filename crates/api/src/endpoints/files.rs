//! File upload endpoint.
//!
//! Accepts an image and returns the blob-store URL. Clients upload review
//! photos here first, then pass the returned URLs when posting the review.

use axum::{
    Router,
    extract::{Multipart, State},
    routing::post,
};
use beanbook_common::{AppError, AppResult, generate_storage_key};
use serde::Serialize;
use tracing::info;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Create files router.
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(upload_file))
}

/// Upload response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub url: String,
}

/// Upload a file via multipart form.
async fn upload_file(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<ApiResponse<UploadResponse>> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut file_name = String::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() == Some("file") {
            file_name = field.file_name().unwrap_or("upload").to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            file_data = Some(bytes.to_vec());
        }
    }

    let data = file_data.ok_or_else(|| AppError::BadRequest("No file uploaded".to_string()))?;

    let key = generate_storage_key(&file_name);
    let stored = state.storage.store(&key, &data).await?;
    info!(user_id = %user.id, key = %stored.key, size = stored.size, "Stored upload");

    Ok(ApiResponse::ok(UploadResponse { url: stored.url }))
}
