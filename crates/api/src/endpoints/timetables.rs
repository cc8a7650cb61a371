//! Timetable endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
};
use lectro_common::AppResult;
use lectro_core::CreateTimetableInput;
use lectro_db::{
    entities::{
        timetable,
        user::{self, UserRole},
    },
    repositories::ScheduleRow,
};
use serde::Serialize;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

const DEPARTMENT_ROLES: &[UserRole] = &[UserRole::Hod, UserRole::Admin];

/// Delete response.
#[derive(Serialize)]
pub struct DeleteEntryResponse {
    pub success: bool,
    pub message: String,
}

/// The caller's own classes.
async fn my_schedule(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<ScheduleRow>>> {
    user.require_role(&[UserRole::Student, UserRole::Lecturer])?;

    let rows = state
        .timetable_service
        .schedule_for(user.id(), user.role())
        .await?;

    Ok(ApiResponse::ok(rows))
}

/// Students enrolled in a class.
async fn class_students(
    user: AuthUser,
    State(state): State<AppState>,
    Path(timetable_id): Path<String>,
) -> AppResult<ApiResponse<Vec<user::Model>>> {
    user.require_role(&[UserRole::Hod])?;

    let students = state.timetable_service.class_roster(&timetable_id).await?;

    Ok(ApiResponse::ok(students))
}

/// Every class in the department.
async fn department_schedule(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<ScheduleRow>>> {
    user.require_role(DEPARTMENT_ROLES)?;

    let rows = state.timetable_service.department_schedule().await?;

    Ok(ApiResponse::ok(rows))
}

/// Schedule a class.
async fn create_entry(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateTimetableInput>,
) -> AppResult<(StatusCode, ApiResponse<timetable::Model>)> {
    user.require_role(DEPARTMENT_ROLES)?;

    let entry = state.timetable_service.create_entry(input).await?;

    Ok(ApiResponse::created(entry))
}

/// Remove a class.
async fn delete_entry(
    user: AuthUser,
    State(state): State<AppState>,
    Path(timetable_id): Path<String>,
) -> AppResult<ApiResponse<DeleteEntryResponse>> {
    user.require_role(DEPARTMENT_ROLES)?;

    state.timetable_service.delete_entry(&timetable_id).await?;

    Ok(ApiResponse::ok(DeleteEntryResponse {
        success: true,
        message: "Timetable entry deleted successfully.".to_string(),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/my-schedule", get(my_schedule))
        .route("/{timetable_id}/students", get(class_students))
        .route("/department/all", get(department_schedule))
        .route("/department/new", post(create_entry))
        .route("/department/{timetable_id}", delete(delete_entry))
}
