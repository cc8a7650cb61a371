//! Throwaway `PostgreSQL` databases for integration tests.
//!
//! Each [`TestDatabase`] lives in its own freshly created database with
//! every migration applied, and can be seeded with a small department:
//! two lecturers, one enrolled student, two halls, one subject and one
//! scheduled class.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime, Utc};
use lectro_common::{AppError, AppResult};
use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, DbErr, Set, Statement};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use crate::entities::{enrollment, lecture_hall, subject, timetable, user};
use crate::migrations::Migrator;
use crate::repositories::{
    EnrollmentRepository, LectureHallRepository, SubjectRepository, TimetableRepository,
    UserRepository,
};

/// Where the test server lives. Read from `TEST_DB_*` variables.
#[derive(Debug, Clone)]
pub struct TestDbConfig {
    /// Server host.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Role with `CREATEDB`.
    pub username: String,
    /// Password for `username`.
    pub password: String,
    /// Name of the database to connect to.
    pub database: String,
}

impl Default for TestDbConfig {
    fn default() -> Self {
        let var = |key: &str, fallback: &str| std::env::var(key).unwrap_or_else(|_| fallback.into());

        Self {
            host: var("TEST_DB_HOST", "localhost"),
            port: std::env::var("TEST_DB_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5433),
            username: var("TEST_DB_USER", "lectro_test"),
            password: var("TEST_DB_PASSWORD", "lectro_test"),
            database: var("TEST_DB_NAME", "lectro_test"),
        }
    }
}

impl TestDbConfig {
    /// URL of the configured database.
    #[must_use]
    pub fn database_url(&self) -> String {
        self.url_for(&self.database)
    }

    /// URL of the maintenance database, used to create and drop test databases.
    #[must_use]
    pub fn postgres_url(&self) -> String {
        self.url_for("postgres")
    }

    fn url_for(&self, database: &str) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{database}",
            self.username, self.password, self.host, self.port
        )
    }
}

/// IDs of the rows written by [`TestDatabase::seed_department`].
#[derive(Debug, Clone)]
pub struct SeededDepartment {
    /// Lecturer who owns the class.
    pub requester_id: String,
    /// Lecturer the class can be handed to.
    pub target_id: String,
    /// Student enrolled in the subject.
    pub student_id: String,
    /// Hall the class is held in.
    pub hall_id: String,
    /// A second, free hall.
    pub spare_hall_id: String,
    /// Subject of the class.
    pub subject_id: String,
    /// The scheduled class.
    pub timetable_id: String,
}

/// A migrated database that exists only for one test.
pub struct TestDatabase {
    /// Connection to the test database.
    pub conn: Arc<DatabaseConnection>,
    /// Settings the database was created with.
    pub config: TestDbConfig,
}

impl TestDatabase {
    /// Create a uniquely named database and apply every migration.
    pub async fn create_unique() -> Result<Self, DbErr> {
        let mut config = TestDbConfig::default();
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        config.database = format!("lectro_test_{}", &suffix[..8]);

        let admin = Database::connect(&config.postgres_url()).await?;
        admin
            .execute(Statement::from_string(
                DatabaseBackend::Postgres,
                format!("CREATE DATABASE \"{}\"", config.database),
            ))
            .await?;
        admin.close().await?;

        let conn = Database::connect(&config.database_url()).await?;
        Migrator::up(&conn, None).await?;

        info!(database = %config.database, "Created test database");
        Ok(Self { conn: Arc::new(conn), config })
    }

    /// Insert a minimal department through the repositories.
    ///
    /// The class runs on 2025-02-20 from 08:00 to 10:00 in the first hall,
    /// taught by the requester; the student is enrolled in its subject.
    pub async fn seed_department(&self) -> AppResult<SeededDepartment> {
        let db = Arc::clone(&self.conn);
        let seeded = SeededDepartment {
            requester_id: "leca".to_string(),
            target_id: "lecb".to_string(),
            student_id: "st1".to_string(),
            hall_id: "h1".to_string(),
            spare_hall_id: "h2".to_string(),
            subject_id: "sub1".to_string(),
            timetable_id: "t1".to_string(),
        };

        let users = UserRepository::new(Arc::clone(&db));
        for (id, name, role) in [
            (&seeded.requester_id, "Dr. Perera", user::UserRole::Lecturer),
            (&seeded.target_id, "Dr. Silva", user::UserRole::Lecturer),
            (&seeded.student_id, "Nimal", user::UserRole::Student),
        ] {
            users
                .create(user::ActiveModel {
                    id: Set(id.clone()),
                    name: Set(name.to_string()),
                    email: Set(format!("{id}@uni.test")),
                    university_id: Set(id.to_uppercase()),
                    role: Set(role),
                    batch: Set(None),
                    password_hash: Set("unused".to_string()),
                    created_at: Set(Utc::now().into()),
                })
                .await?;
        }

        let halls = LectureHallRepository::new(Arc::clone(&db));
        for (id, name, capacity) in [
            (&seeded.hall_id, "Hall A", 120),
            (&seeded.spare_hall_id, "Hall B", 80),
        ] {
            halls
                .create(lecture_hall::ActiveModel {
                    id: Set(id.clone()),
                    name: Set(name.to_string()),
                    capacity: Set(capacity),
                    has_projector: Set(true),
                })
                .await?;
        }

        SubjectRepository::new(Arc::clone(&db))
            .create(subject::ActiveModel {
                id: Set(seeded.subject_id.clone()),
                subject_code: Set("CS2012".to_string()),
                subject_name: Set("Data Structures".to_string()),
            })
            .await?;

        EnrollmentRepository::new(Arc::clone(&db))
            .create(enrollment::ActiveModel {
                student_id: Set(seeded.student_id.clone()),
                subject_id: Set(seeded.subject_id.clone()),
                created_at: Set(Utc::now().into()),
            })
            .await?;

        let slot = |h: u32| {
            NaiveTime::from_hms_opt(h, 0, 0)
                .ok_or_else(|| AppError::Internal(format!("Invalid hour {h}")))
        };
        TimetableRepository::new(db)
            .create(timetable::ActiveModel {
                id: Set(seeded.timetable_id.clone()),
                date: Set(NaiveDate::from_ymd_opt(2025, 2, 20)
                    .ok_or_else(|| AppError::Internal("Invalid seed date".into()))?),
                start_time: Set(slot(8)?),
                end_time: Set(slot(10)?),
                subject_id: Set(seeded.subject_id.clone()),
                hall_id: Set(seeded.hall_id.clone()),
                lecturer_id: Set(seeded.requester_id.clone()),
            })
            .await?;

        Ok(seeded)
    }

    /// Close the connection and drop the database.
    pub async fn drop_database(self) -> Result<(), DbErr> {
        self.conn.close_by_ref().await?;

        let admin = Database::connect(&self.config.postgres_url()).await?;

        // Stray pool connections would block the drop.
        admin
            .execute(Statement::from_string(
                DatabaseBackend::Postgres,
                format!(
                    "SELECT pg_terminate_backend(pid) FROM pg_stat_activity WHERE datname = '{}'",
                    self.config.database
                ),
            ))
            .await
            .ok();

        admin
            .execute(Statement::from_string(
                DatabaseBackend::Postgres,
                format!("DROP DATABASE IF EXISTS \"{}\"", self.config.database),
            ))
            .await?;
        admin.close().await?;

        info!(database = %self.config.database, "Dropped test database");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let config = TestDbConfig {
            host: "db".to_string(),
            port: 5433,
            username: "user".to_string(),
            password: "pass".to_string(),
            database: "lectro_test_ab12cd34".to_string(),
        };

        assert_eq!(
            config.database_url(),
            "postgres://user:pass@db:5433/lectro_test_ab12cd34"
        );
        assert_eq!(config.postgres_url(), "postgres://user:pass@db:5433/postgres");
    }
}
