//! Timetable service.

use chrono::{NaiveDate, NaiveTime};
use lectro_common::{AppError, AppResult, IdGenerator};
use lectro_db::{
    entities::{
        timetable,
        user::{self, UserRole},
    },
    repositories::{EnrollmentRepository, ScheduleRow, TimetableRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Input for scheduling a single class.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTimetableInput {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[validate(length(min = 1, max = 64))]
    pub subject_id: String,
    #[validate(length(min = 1, max = 64))]
    pub hall_id: String,
    #[validate(length(min = 1, max = 64))]
    pub lecturer_id: String,
}

/// Timetable service for business logic.
#[derive(Clone)]
pub struct TimetableService {
    timetable_repo: TimetableRepository,
    enrollment_repo: EnrollmentRepository,
    id_gen: IdGenerator,
}

impl TimetableService {
    /// Create a new timetable service.
    #[must_use]
    pub const fn new(
        timetable_repo: TimetableRepository,
        enrollment_repo: EnrollmentRepository,
    ) -> Self {
        Self {
            timetable_repo,
            enrollment_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Personal schedule: enrolled classes for a student, taught classes
    /// for a lecturer.
    pub async fn schedule_for(&self, user_id: &str, role: UserRole) -> AppResult<Vec<ScheduleRow>> {
        match role {
            UserRole::Student => self.schedule_for_student(user_id).await,
            UserRole::Lecturer => self.schedule_for_lecturer(user_id).await,
            UserRole::Hod | UserRole::TechnicalOfficer | UserRole::Admin => Err(
                AppError::Forbidden("Only students and lecturers have a personal schedule".into()),
            ),
        }
    }

    pub async fn schedule_for_student(&self, student_id: &str) -> AppResult<Vec<ScheduleRow>> {
        self.timetable_repo.schedule_for_student(student_id).await
    }

    pub async fn schedule_for_lecturer(&self, lecturer_id: &str) -> AppResult<Vec<ScheduleRow>> {
        self.timetable_repo.schedule_for_lecturer(lecturer_id).await
    }

    /// Every class in the department.
    pub async fn department_schedule(&self) -> AppResult<Vec<ScheduleRow>> {
        self.timetable_repo.schedule_all().await
    }

    /// Students expected at a class.
    pub async fn class_roster(&self, timetable_id: &str) -> AppResult<Vec<user::Model>> {
        let entry = self.timetable_repo.get_by_id(timetable_id).await?;
        self.enrollment_repo
            .find_students_for_subject(&entry.subject_id)
            .await
    }

    /// Schedule a class.
    pub async fn create_entry(&self, input: CreateTimetableInput) -> AppResult<timetable::Model> {
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if input.end_time <= input.start_time {
            return Err(AppError::Validation(
                "End time must be after the start time".into(),
            ));
        }

        let model = timetable::ActiveModel {
            id: Set(self.id_gen.generate()),
            date: Set(input.date),
            start_time: Set(input.start_time),
            end_time: Set(input.end_time),
            subject_id: Set(input.subject_id),
            hall_id: Set(input.hall_id),
            lecturer_id: Set(input.lecturer_id),
        };

        let entry = self.timetable_repo.create(model).await?;
        tracing::info!(timetable_id = %entry.id, date = %entry.date, "Timetable entry created");

        Ok(entry)
    }

    /// Remove a scheduled class.
    pub async fn delete_entry(&self, timetable_id: &str) -> AppResult<()> {
        let deleted = self.timetable_repo.delete(timetable_id).await?;
        if deleted == 0 {
            return Err(AppError::NotFound(format!("Timetable entry {timetable_id}")));
        }

        tracing::info!(timetable_id, "Timetable entry deleted");
        Ok(())
    }
}
