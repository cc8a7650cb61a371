//! Enrollment repository.

use std::sync::Arc;

use crate::entities::{Enrollment, User, enrollment, user};
use lectro_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait,
};

/// Enrollment repository for database operations.
#[derive(Clone)]
pub struct EnrollmentRepository {
    db: Arc<DatabaseConnection>,
}

impl EnrollmentRepository {
    /// Create a new enrollment repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// IDs of every student enrolled in a subject.
    ///
    /// Runs on the given connection so the lookup can join a surrounding
    /// transaction.
    pub async fn student_ids_for_subject_in<C>(
        &self,
        conn: &C,
        subject_id: &str,
    ) -> AppResult<Vec<String>>
    where
        C: ConnectionTrait,
    {
        let rows = Enrollment::find()
            .filter(enrollment::Column::SubjectId.eq(subject_id))
            .order_by_asc(enrollment::Column::StudentId)
            .all(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(|row| row.student_id).collect())
    }

    /// Students enrolled in a subject, ordered by name.
    pub async fn find_students_for_subject(&self, subject_id: &str) -> AppResult<Vec<user::Model>> {
        User::find()
            .join(JoinType::InnerJoin, enrollment::Relation::Student.def().rev())
            .filter(enrollment::Column::SubjectId.eq(subject_id))
            .order_by_asc(user::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Enroll a student in a subject.
    pub async fn create(&self, model: enrollment::ActiveModel) -> AppResult<enrollment::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::user::UserRole;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_enrollment(student_id: &str, subject_id: &str) -> enrollment::Model {
        enrollment::Model {
            student_id: student_id.to_string(),
            subject_id: subject_id.to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_student_ids_for_subject() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    create_test_enrollment("st1", "sub1"),
                    create_test_enrollment("st2", "sub1"),
                ]])
                .into_connection(),
        );

        let repo = EnrollmentRepository::new(Arc::clone(&db));
        let ids = repo
            .student_ids_for_subject_in(db.as_ref(), "sub1")
            .await
            .unwrap();

        assert_eq!(ids, vec!["st1".to_string(), "st2".to_string()]);
    }

    #[tokio::test]
    async fn test_student_ids_for_subject_empty() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<enrollment::Model>::new()])
                .into_connection(),
        );

        let repo = EnrollmentRepository::new(Arc::clone(&db));
        let ids = repo
            .student_ids_for_subject_in(db.as_ref(), "sub1")
            .await
            .unwrap();

        assert!(ids.is_empty());
    }

    #[tokio::test]
    async fn test_find_students_for_subject() {
        let student = user::Model {
            id: "st1".to_string(),
            name: "Nimal".to_string(),
            email: "nimal@uni.lk".to_string(),
            university_id: "2021CS001".to_string(),
            role: UserRole::Student,
            batch: Some("2021".to_string()),
            password_hash: "hash".to_string(),
            created_at: Utc::now().into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[student]])
                .into_connection(),
        );

        let repo = EnrollmentRepository::new(db);
        let students = repo.find_students_for_subject("sub1").await.unwrap();

        assert_eq!(students.len(), 1);
        assert_eq!(students[0].university_id, "2021CS001");
    }
}
