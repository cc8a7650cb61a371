//! Lecture hall repository.

use std::sync::Arc;

use crate::entities::{LectureHall, lecture_hall};
use lectro_common::{AppError, AppResult};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait};

/// Lecture hall repository for database operations.
#[derive(Clone)]
pub struct LectureHallRepository {
    db: Arc<DatabaseConnection>,
}

impl LectureHallRepository {
    /// Create a new lecture hall repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a hall by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<lecture_hall::Model>> {
        LectureHall::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a hall by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<lecture_hall::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Lecture hall {id}")))
    }

    /// Create a new hall.
    pub async fn create(&self, model: lecture_hall::ActiveModel) -> AppResult<lecture_hall::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<lecture_hall::Model>::new()])
                .into_connection(),
        );

        let repo = LectureHallRepository::new(db);
        let result = repo.get_by_id("h9").await;

        assert!(matches!(result, Err(AppError::NotFound(msg)) if msg.contains("h9")));
    }

    #[tokio::test]
    async fn test_get_by_id_found() {
        let hall = lecture_hall::Model {
            id: "h2".to_string(),
            name: "Main Auditorium".to_string(),
            capacity: 250,
            has_projector: true,
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[hall]])
                .into_connection(),
        );

        let repo = LectureHallRepository::new(db);
        let found = repo.get_by_id("h2").await.unwrap();

        assert_eq!(found.capacity, 250);
    }
}
