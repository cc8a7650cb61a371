//! Timetable repository.

use std::sync::Arc;

use crate::entities::{Timetable, enrollment, lecture_hall, subject, timetable, user};
use chrono::{NaiveDate, NaiveTime};
use lectro_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    FromQueryResult, JoinType, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select,
    sea_query::{Expr, Query},
};
use serde::Serialize;

/// New placement of a class. Applied in place, keeping id and subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reschedule {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub hall_id: String,
    pub lecturer_id: String,
}

/// A timetable entry joined with its display fields.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult, Serialize)]
pub struct ScheduleRow {
    pub timetable_id: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub subject_code: String,
    pub subject_name: String,
    pub hall_name: String,
    pub lecturer_name: String,
}

/// Timetable repository for database operations.
#[derive(Clone)]
pub struct TimetableRepository {
    db: Arc<DatabaseConnection>,
}

impl TimetableRepository {
    /// Create a new timetable repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an entry by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<timetable::Model>> {
        Timetable::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find an entry by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<timetable::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Timetable entry {id}")))
    }

    /// Create a new entry.
    pub async fn create(&self, model: timetable::ActiveModel) -> AppResult<timetable::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete an entry. Returns the number of rows removed.
    pub async fn delete(&self, id: &str) -> AppResult<u64> {
        let result = Timetable::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// Move an entry to a new date, time, hall and lecturer.
    pub async fn reschedule_in<C>(&self, conn: &C, id: &str, change: &Reschedule) -> AppResult<()>
    where
        C: ConnectionTrait,
    {
        let result = Timetable::update_many()
            .col_expr(timetable::Column::Date, Expr::value(change.date))
            .col_expr(timetable::Column::StartTime, Expr::value(change.start_time))
            .col_expr(timetable::Column::EndTime, Expr::value(change.end_time))
            .col_expr(timetable::Column::HallId, Expr::value(change.hall_id.clone()))
            .col_expr(
                timetable::Column::LecturerId,
                Expr::value(change.lecturer_id.clone()),
            )
            .filter(timetable::Column::Id.eq(id))
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Timetable entry {id}")));
        }

        Ok(())
    }

    /// Classes of every subject a student is enrolled in.
    pub async fn schedule_for_student(&self, student_id: &str) -> AppResult<Vec<ScheduleRow>> {
        let enrolled_subjects = Query::select()
            .column(enrollment::Column::SubjectId)
            .from(enrollment::Entity)
            .and_where(enrollment::Column::StudentId.eq(student_id))
            .to_owned();

        Self::schedule_query()
            .filter(timetable::Column::SubjectId.in_subquery(enrolled_subjects))
            .into_model::<ScheduleRow>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Classes taught by a lecturer.
    pub async fn schedule_for_lecturer(&self, lecturer_id: &str) -> AppResult<Vec<ScheduleRow>> {
        Self::schedule_query()
            .filter(timetable::Column::LecturerId.eq(lecturer_id))
            .into_model::<ScheduleRow>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Every class in the department.
    pub async fn schedule_all(&self) -> AppResult<Vec<ScheduleRow>> {
        Self::schedule_query()
            .into_model::<ScheduleRow>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    fn schedule_query() -> Select<Timetable> {
        Timetable::find()
            .select_only()
            .column_as(timetable::Column::Id, "timetable_id")
            .column(timetable::Column::Date)
            .column(timetable::Column::StartTime)
            .column(timetable::Column::EndTime)
            .column(subject::Column::SubjectCode)
            .column(subject::Column::SubjectName)
            .column_as(lecture_hall::Column::Name, "hall_name")
            .column_as(user::Column::Name, "lecturer_name")
            .join(JoinType::InnerJoin, timetable::Relation::Subject.def())
            .join(JoinType::InnerJoin, timetable::Relation::Hall.def())
            .join(JoinType::InnerJoin, timetable::Relation::Lecturer.def())
            .order_by_asc(timetable::Column::Date)
            .order_by_asc(timetable::Column::StartTime)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn create_test_entry(id: &str, lecturer_id: &str) -> timetable::Model {
        timetable::Model {
            id: id.to_string(),
            date: date(2025, 2, 20),
            start_time: time(8, 0),
            end_time: time(10, 0),
            subject_id: "sub1".to_string(),
            hall_id: "h1".to_string(),
            lecturer_id: lecturer_id.to_string(),
        }
    }

    fn reschedule() -> Reschedule {
        Reschedule {
            date: date(2025, 3, 1),
            start_time: time(9, 0),
            end_time: time(11, 0),
            hall_id: "h2".to_string(),
            lecturer_id: "lecB".to_string(),
        }
    }

    #[tokio::test]
    async fn test_get_by_id_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_entry("t1", "lecA")]])
                .into_connection(),
        );

        let repo = TimetableRepository::new(db);
        let entry = repo.get_by_id("t1").await.unwrap();

        assert_eq!(entry.lecturer_id, "lecA");
    }

    #[tokio::test]
    async fn test_reschedule_updates_row() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = TimetableRepository::new(Arc::clone(&db));
        let result = repo.reschedule_in(db.as_ref(), "t1", &reschedule()).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_reschedule_missing_entry() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = TimetableRepository::new(Arc::clone(&db));
        let result = repo.reschedule_in(db.as_ref(), "gone", &reschedule()).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_returns_rows_affected() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = TimetableRepository::new(db);
        assert_eq!(repo.delete("t1").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_schedule_for_lecturer_maps_rows() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "timetable_id" => Value::from("t1"),
                    "date" => Value::from(date(2025, 3, 1)),
                    "start_time" => Value::from(time(9, 0)),
                    "end_time" => Value::from(time(11, 0)),
                    "subject_code" => Value::from("CS2012"),
                    "subject_name" => Value::from("Data Structures"),
                    "hall_name" => Value::from("Hall B"),
                    "lecturer_name" => Value::from("Dr. Silva"),
                }]])
                .into_connection(),
        );

        let repo = TimetableRepository::new(db);
        let rows = repo.schedule_for_lecturer("lecB").await.unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].timetable_id, "t1");
        assert_eq!(rows[0].start_time, time(9, 0));
        assert_eq!(rows[0].hall_name, "Hall B");
    }
}
