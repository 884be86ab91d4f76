//! API response types.

use axum::{
    Json,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Success envelope for API responses.
///
/// Failures never pass through here; they are rendered by
/// [`beanbook_common::AppError`] as `{error: {code, message}}` with the
/// matching status code, so the two shapes are mutually exclusive on the
/// wire.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Wrap a successful payload.
    pub const fn ok(data: T) -> Self {
        Self { data }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
