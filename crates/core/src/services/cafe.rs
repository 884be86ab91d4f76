//! Cafe catalog service.

use beanbook_common::{AppError, AppResult};
use beanbook_db::{entities::cafe, repositories::CafeRepository};

/// Cafe service for business logic.
#[derive(Clone)]
pub struct CafeService {
    cafe_repo: CafeRepository,
}

impl CafeService {
    /// Create a new cafe service.
    #[must_use]
    pub const fn new(cafe_repo: CafeRepository) -> Self {
        Self { cafe_repo }
    }

    /// All cafes in stable ID order.
    pub async fn list_cafes(&self) -> AppResult<Vec<cafe::Model>> {
        self.cafe_repo.find_all().await
    }

    /// Fetch a cafe by ID.
    pub async fn get_cafe(&self, cafe_id: &str) -> AppResult<cafe::Model> {
        self.cafe_repo
            .find_by_id(cafe_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Cafe not found: {cafe_id}")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_get_cafe_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<cafe::Model>::new()])
                .into_connection(),
        );

        let service = CafeService::new(CafeRepository::new(db));
        let result = service.get_cafe("nope").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_get_cafe_found() {
        let model = cafe::Model {
            id: "c1".to_string(),
            name: "Grind House".to_string(),
            location: None,
            description: None,
            images: None,
            created_at: Utc::now().into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[model]])
                .into_connection(),
        );

        let service = CafeService::new(CafeRepository::new(db));
        let cafe = service.get_cafe("c1").await.unwrap();

        assert_eq!(cafe.name, "Grind House");
    }
}
