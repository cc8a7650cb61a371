//! Swap request repository.

use std::sync::Arc;

use crate::entities::{
    SwapRequest, subject,
    swap_request::{self, ApprovalStatus},
    timetable, user,
};
use chrono::{NaiveDate, NaiveTime};
use lectro_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    FromQueryResult, JoinType, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select,
    sea_query::Expr,
};
use serde::Serialize;

/// A swap request joined with the subject of the class it moves.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct SwapDetails {
    pub swap_id: String,
    pub timetable_id: String,
    pub requesting_lecturer_id: String,
    pub target_lecturer_id: String,
    pub proposed_date: NaiveDate,
    pub proposed_start_time: NaiveTime,
    pub proposed_end_time: NaiveTime,
    pub proposed_hall_id: String,
    pub subject_id: String,
    pub subject_code: String,
    pub subject_name: String,
}

/// Summary of a swap awaiting someone's answer.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult, Serialize)]
pub struct PendingSwapRow {
    pub swap_id: String,
    pub requesting_lecturer: String,
    pub subject_code: String,
    pub subject_name: String,
    pub original_date: NaiveDate,
    pub original_start_time: NaiveTime,
    pub proposed_date: NaiveDate,
    pub proposed_start_time: NaiveTime,
    pub proposed_end_time: NaiveTime,
    pub proposed_hall_id: String,
}

/// Swap request repository for database operations.
#[derive(Clone)]
pub struct SwapRequestRepository {
    db: Arc<DatabaseConnection>,
}

impl SwapRequestRepository {
    /// Create a new swap request repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a swap request by ID on the given connection.
    pub async fn find_by_id_in<C>(
        &self,
        conn: &C,
        id: &str,
    ) -> AppResult<Option<swap_request::Model>>
    where
        C: ConnectionTrait,
    {
        SwapRequest::find_by_id(id)
            .one(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a swap request on the given connection.
    pub async fn create_in<C>(
        &self,
        conn: &C,
        model: swap_request::ActiveModel,
    ) -> AppResult<swap_request::Model>
    where
        C: ConnectionTrait,
    {
        model
            .insert(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Record the target lecturer's answer.
    ///
    /// Only a request still pending with its target is touched. Returns the
    /// number of rows updated, so zero means someone answered first.
    pub async fn set_target_status_in<C>(
        &self,
        conn: &C,
        id: &str,
        status: ApprovalStatus,
    ) -> AppResult<u64>
    where
        C: ConnectionTrait,
    {
        let result = SwapRequest::update_many()
            .col_expr(
                swap_request::Column::TargetLecturerStatus,
                Expr::value(status.as_str()),
            )
            .filter(swap_request::Column::Id.eq(id))
            .filter(swap_request::Column::TargetLecturerStatus.eq(ApprovalStatus::Pending))
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// Record the head of department's answer.
    ///
    /// Only a request the target accepted and the HOD has not yet answered
    /// is touched. Returns the number of rows updated.
    pub async fn set_hod_status_in<C>(
        &self,
        conn: &C,
        id: &str,
        status: ApprovalStatus,
    ) -> AppResult<u64>
    where
        C: ConnectionTrait,
    {
        let result = SwapRequest::update_many()
            .col_expr(swap_request::Column::HodStatus, Expr::value(status.as_str()))
            .filter(swap_request::Column::Id.eq(id))
            .filter(swap_request::Column::TargetLecturerStatus.eq(ApprovalStatus::Accepted))
            .filter(swap_request::Column::HodStatus.eq(ApprovalStatus::Pending))
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// Load a swap request with the subject of its class.
    pub async fn find_details_in<C>(&self, conn: &C, id: &str) -> AppResult<SwapDetails>
    where
        C: ConnectionTrait,
    {
        SwapRequest::find_by_id(id)
            .select_only()
            .column_as(swap_request::Column::Id, "swap_id")
            .columns([
                swap_request::Column::TimetableId,
                swap_request::Column::RequestingLecturerId,
                swap_request::Column::TargetLecturerId,
                swap_request::Column::ProposedDate,
                swap_request::Column::ProposedStartTime,
                swap_request::Column::ProposedEndTime,
                swap_request::Column::ProposedHallId,
            ])
            .column(timetable::Column::SubjectId)
            .column(subject::Column::SubjectCode)
            .column(subject::Column::SubjectName)
            .join(JoinType::InnerJoin, swap_request::Relation::Timetable.def())
            .join(JoinType::InnerJoin, timetable::Relation::Subject.def())
            .into_model::<SwapDetails>()
            .one(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound(format!("Swap request {id}")))
    }

    /// Requests waiting on a lecturer's answer.
    pub async fn list_pending_for_lecturer(
        &self,
        lecturer_id: &str,
    ) -> AppResult<Vec<PendingSwapRow>> {
        Self::pending_query()
            .filter(swap_request::Column::TargetLecturerId.eq(lecturer_id))
            .filter(swap_request::Column::TargetLecturerStatus.eq(ApprovalStatus::Pending))
            .into_model::<PendingSwapRow>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Requests accepted by their target and waiting on the HOD.
    pub async fn list_pending_for_hod(&self) -> AppResult<Vec<PendingSwapRow>> {
        Self::pending_query()
            .filter(swap_request::Column::TargetLecturerStatus.eq(ApprovalStatus::Accepted))
            .filter(swap_request::Column::HodStatus.eq(ApprovalStatus::Pending))
            .into_model::<PendingSwapRow>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    fn pending_query() -> Select<SwapRequest> {
        SwapRequest::find()
            .select_only()
            .column_as(swap_request::Column::Id, "swap_id")
            .column_as(user::Column::Name, "requesting_lecturer")
            .column(subject::Column::SubjectCode)
            .column(subject::Column::SubjectName)
            .column_as(timetable::Column::Date, "original_date")
            .column_as(timetable::Column::StartTime, "original_start_time")
            .columns([
                swap_request::Column::ProposedDate,
                swap_request::Column::ProposedStartTime,
                swap_request::Column::ProposedEndTime,
                swap_request::Column::ProposedHallId,
            ])
            .join(JoinType::InnerJoin, swap_request::Relation::Timetable.def())
            .join(JoinType::InnerJoin, timetable::Relation::Subject.def())
            .join(JoinType::InnerJoin, swap_request::Relation::Requester.def())
            .order_by_desc(swap_request::Column::CreatedAt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn create_test_swap(id: &str) -> swap_request::Model {
        swap_request::Model {
            id: id.to_string(),
            timetable_id: "t1".to_string(),
            requesting_lecturer_id: "lecA".to_string(),
            target_lecturer_id: "lecB".to_string(),
            proposed_date: date(2025, 3, 1),
            proposed_start_time: time(9, 0),
            proposed_end_time: time(11, 0),
            proposed_hall_id: "h2".to_string(),
            target_lecturer_status: ApprovalStatus::Pending,
            hod_status: ApprovalStatus::Pending,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_id_in() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_swap("s1")]])
                .into_connection(),
        );

        let repo = SwapRequestRepository::new(Arc::clone(&db));
        let swap = repo.find_by_id_in(db.as_ref(), "s1").await.unwrap().unwrap();

        assert_eq!(swap.target_lecturer_id, "lecB");
        assert_eq!(swap.hod_status, ApprovalStatus::Pending);
    }

    #[tokio::test]
    async fn test_set_target_status_is_conditional() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = SwapRequestRepository::new(Arc::clone(&db));
        let updated = repo
            .set_target_status_in(db.as_ref(), "s1", ApprovalStatus::Accepted)
            .await
            .unwrap();

        assert_eq!(updated, 1);
        drop(repo);

        let log = Arc::try_unwrap(db).unwrap().into_transaction_log();
        assert_eq!(log.len(), 1);
        let sql = &log[0].statements()[0].sql;
        assert!(sql.starts_with(r#"UPDATE "swap_requests" SET "target_lecturer_status""#));
        assert!(sql.contains(r#""swap_requests"."target_lecturer_status" = $3"#));
    }

    #[tokio::test]
    async fn test_set_hod_status_reports_lost_race() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = SwapRequestRepository::new(Arc::clone(&db));
        let updated = repo
            .set_hod_status_in(db.as_ref(), "s1", ApprovalStatus::Accepted)
            .await
            .unwrap();

        assert_eq!(updated, 0);
    }

    #[tokio::test]
    async fn test_find_details_missing() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<std::collections::BTreeMap<&str, Value>>::new()])
                .into_connection(),
        );

        let repo = SwapRequestRepository::new(Arc::clone(&db));
        let result = repo.find_details_in(db.as_ref(), "nope").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_pending_for_lecturer() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "swap_id" => Value::from("s1"),
                    "requesting_lecturer" => Value::from("Dr. Perera"),
                    "subject_code" => Value::from("CS2012"),
                    "subject_name" => Value::from("Data Structures"),
                    "original_date" => Value::from(date(2025, 2, 20)),
                    "original_start_time" => Value::from(time(8, 0)),
                    "proposed_date" => Value::from(date(2025, 3, 1)),
                    "proposed_start_time" => Value::from(time(9, 0)),
                    "proposed_end_time" => Value::from(time(11, 0)),
                    "proposed_hall_id" => Value::from("h2"),
                }]])
                .into_connection(),
        );

        let repo = SwapRequestRepository::new(db);
        let rows = repo.list_pending_for_lecturer("lecB").await.unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].requesting_lecturer, "Dr. Perera");
        assert_eq!(rows[0].original_date, date(2025, 2, 20));
    }
}
