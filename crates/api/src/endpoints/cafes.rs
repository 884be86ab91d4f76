//! Cafe catalog endpoints.

use axum::{
    Router,
    extract::{Path, State},
    routing::get,
};
use beanbook_common::AppResult;
use beanbook_db::entities::cafe;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{middleware::AppState, response::ApiResponse};

/// Create cafes router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_cafes))
        .route("/{cafe_id}", get(get_cafe))
}

/// Cafe response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CafeResponse {
    pub id: String,
    pub name: String,
    pub location: Option<String>,
    pub description: Option<String>,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<cafe::Model> for CafeResponse {
    fn from(c: cafe::Model) -> Self {
        let images = c
            .images
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_default();
        Self {
            id: c.id,
            name: c.name,
            location: c.location,
            description: c.description,
            images,
            created_at: c.created_at.into(),
        }
    }
}

/// List all cafes.
async fn list_cafes(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<CafeResponse>>> {
    let cafes = state.cafe_service.list_cafes().await?;

    Ok(ApiResponse::ok(
        cafes.into_iter().map(CafeResponse::from).collect(),
    ))
}

/// Fetch a single cafe.
async fn get_cafe(
    State(state): State<AppState>,
    Path(cafe_id): Path<String>,
) -> AppResult<ApiResponse<CafeResponse>> {
    let cafe = state.cafe_service.get_cafe(&cafe_id).await?;

    Ok(ApiResponse::ok(cafe.into()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cafe_response_defaults_missing_images_to_empty_list() {
        let model = cafe::Model {
            id: "c1".to_string(),
            name: "Grind House".to_string(),
            location: Some("Shoreditch".to_string()),
            description: None,
            images: None,
            created_at: Utc::now().into(),
        };

        let response = CafeResponse::from(model);
        let json = serde_json::to_string(&response).unwrap();

        assert!(json.contains("\"images\":[]"));
    }
}
