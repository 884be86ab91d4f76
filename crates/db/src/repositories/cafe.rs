//! Cafe repository.

use std::sync::Arc;

use crate::entities::{Cafe, cafe};
use beanbook_common::{AppError, AppResult};
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};

/// Cafe repository for database operations.
#[derive(Clone)]
pub struct CafeRepository {
    db: Arc<DatabaseConnection>,
}

impl CafeRepository {
    /// Create a new cafe repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// All cafes in stable ID order.
    pub async fn find_all(&self) -> AppResult<Vec<cafe::Model>> {
        Cafe::find()
            .order_by_asc(cafe::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a cafe by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<cafe::Model>> {
        Cafe::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_cafe(id: &str, name: &str) -> cafe::Model {
        cafe::Model {
            id: id.to_string(),
            name: name.to_string(),
            location: Some("Shoreditch".to_string()),
            description: None,
            images: None,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_all() {
        let c1 = create_test_cafe("c1", "Grind House");
        let c2 = create_test_cafe("c2", "The Percolator");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[c1, c2]])
                .into_connection(),
        );

        let repo = CafeRepository::new(db);
        let cafes = repo.find_all().await.unwrap();

        assert_eq!(cafes.len(), 2);
        assert_eq!(cafes[0].name, "Grind House");
    }

    #[tokio::test]
    async fn test_find_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<cafe::Model>::new()])
                .into_connection(),
        );

        let repo = CafeRepository::new(db);
        assert!(repo.find_by_id("nope").await.unwrap().is_none());
    }
}
