//! Subject repository.

use std::sync::Arc;

use crate::entities::subject;
use lectro_common::{AppError, AppResult};
use sea_orm::{ActiveModelTrait, DatabaseConnection};

/// Subject repository for database operations.
#[derive(Clone)]
pub struct SubjectRepository {
    db: Arc<DatabaseConnection>,
}

impl SubjectRepository {
    /// Create a new subject repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Create a new subject.
    pub async fn create(&self, model: subject::ActiveModel) -> AppResult<subject::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, Set};

    #[tokio::test]
    async fn test_create() {
        let subject = subject::Model {
            id: "s1".to_string(),
            subject_code: "CS2012".to_string(),
            subject_name: "Data Structures".to_string(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[subject]])
                .into_connection(),
        );

        let repo = SubjectRepository::new(db);
        let created = repo
            .create(subject::ActiveModel {
                id: Set("s1".to_string()),
                subject_code: Set("CS2012".to_string()),
                subject_name: Set("Data Structures".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(created.subject_code, "CS2012");
    }
}
