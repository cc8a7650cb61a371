//! Swap request workflow.
//!
//! A lecturer proposes handing a class to a colleague at a new date, time
//! and hall. The colleague answers first; the head of department answers
//! second. A final approval moves the timetable entry and tells every
//! enrolled student.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime, Utc};
use lectro_common::{AppError, AppResult, IdGenerator};
use lectro_db::{
    entities::{
        swap_request::{self, ApprovalStatus},
        user::UserRole,
    },
    repositories::{
        EnrollmentRepository, LectureHallRepository, PendingSwapRow, Reschedule, SwapDetails,
        SwapRequestRepository, TimetableRepository, UserRepository,
    },
};
use sea_orm::{DatabaseConnection, Set, TransactionTrait};
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use super::notification::{NotificationDraft, NotificationService};

/// Input for proposing a swap.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSwapInput {
    #[validate(length(min = 1, max = 64))]
    pub timetable_id: String,
    #[validate(length(min = 1, max = 64))]
    pub target_lecturer_id: String,
    pub proposed_date: NaiveDate,
    pub proposed_start_time: NaiveTime,
    pub proposed_end_time: NaiveTime,
    #[validate(length(min = 1, max = 64))]
    pub proposed_hall_id: String,
}

/// Answer given to a swap request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SwapDecision {
    Accepted,
    Rejected,
}

impl SwapDecision {
    /// The status recorded for this answer.
    #[must_use]
    pub const fn status(self) -> ApprovalStatus {
        match self {
            Self::Accepted => ApprovalStatus::Accepted,
            Self::Rejected => ApprovalStatus::Rejected,
        }
    }

    /// Lowercase form used in messages and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }
}

/// Who is answering a swap request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwapResponder {
    /// A lecturer answering a request addressed to them.
    Lecturer { lecturer_id: String },
    /// The head of department giving the final answer.
    Hod { hod_id: String },
}

impl SwapResponder {
    /// Build a responder from an authenticated user's role.
    ///
    /// Only lecturers and heads of department take part in the workflow.
    pub fn from_role(user_id: &str, role: UserRole) -> AppResult<Self> {
        match role {
            UserRole::Lecturer => Ok(Self::Lecturer {
                lecturer_id: user_id.to_string(),
            }),
            UserRole::Hod => Ok(Self::Hod {
                hod_id: user_id.to_string(),
            }),
            UserRole::Student | UserRole::TechnicalOfficer | UserRole::Admin => Err(
                AppError::Forbidden("Only lecturers and the HOD can answer swap requests".into()),
            ),
        }
    }
}

/// Approval stage a response is written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalStage {
    /// `target_lecturer_status`
    Lecturer,
    /// `hod_status`
    Hod,
}

impl ApprovalStage {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Lecturer => "lecturer",
            Self::Hod => "hod",
        }
    }
}

/// Result of answering a swap request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwapOutcome {
    pub success: bool,
    pub message: String,
}

/// Decide which stage a responder may answer, given the request's state.
///
/// Pure: reads only the two statuses and the target lecturer.
pub fn check_transition(
    swap: &swap_request::Model,
    responder: &SwapResponder,
) -> AppResult<ApprovalStage> {
    match responder {
        SwapResponder::Lecturer { lecturer_id } => {
            if *lecturer_id != swap.target_lecturer_id {
                return Err(AppError::Forbidden(
                    "Only the target lecturer can answer this swap request".into(),
                ));
            }
            match swap.target_lecturer_status {
                ApprovalStatus::Pending => Ok(ApprovalStage::Lecturer),
                answered => Err(AppError::Conflict(format!(
                    "Swap request was already {answered} by the target lecturer"
                ))),
            }
        }
        SwapResponder::Hod { .. } => match (swap.target_lecturer_status, swap.hod_status) {
            (ApprovalStatus::Accepted, ApprovalStatus::Pending) => Ok(ApprovalStage::Hod),
            (ApprovalStatus::Accepted, answered) => Err(AppError::Conflict(format!(
                "Swap request was already {answered} by the HOD"
            ))),
            (ApprovalStatus::Pending, _) => Err(AppError::Conflict(
                "Swap request has not been accepted by the target lecturer yet".into(),
            )),
            (ApprovalStatus::Rejected, _) => Err(AppError::Conflict(
                "Swap request was rejected by the target lecturer".into(),
            )),
        },
    }
}

/// Notice sent to the target lecturer when a swap is proposed.
#[must_use]
pub fn new_request_notice(requester_name: &str, swap: &swap_request::Model) -> NotificationDraft {
    NotificationDraft::new(
        swap.target_lecturer_id.clone(),
        "New Swap Request",
        format!(
            "{requester_name} has requested to swap a lecture with you on {}. Please review in your pending requests.",
            swap.proposed_date
        ),
    )
}

/// Notices sent after an answer is recorded.
#[must_use]
pub fn stage_notices(
    stage: ApprovalStage,
    decision: SwapDecision,
    details: &SwapDetails,
) -> Vec<NotificationDraft> {
    let code = &details.subject_code;
    let date = details.proposed_date;

    match stage {
        ApprovalStage::Lecturer => {
            let title = match decision {
                SwapDecision::Accepted => "Swap Request Accepted",
                SwapDecision::Rejected => "Swap Request Rejected",
            };
            let mut message = format!(
                "Your swap request for {code} on {date} was {} by the target lecturer.",
                decision.as_str()
            );
            if decision == SwapDecision::Accepted {
                message.push_str(" It is now awaiting final HOD approval.");
            }

            vec![NotificationDraft::new(
                details.requesting_lecturer_id.clone(),
                title,
                message,
            )]
        }
        ApprovalStage::Hod => {
            let (title, message) = match decision {
                SwapDecision::Accepted => (
                    "Swap Approved by HOD",
                    format!(
                        "The HOD has APPROVED the swap for {code} on {date}. The timetable is now updated."
                    ),
                ),
                SwapDecision::Rejected => (
                    "Swap Rejected by HOD",
                    format!("The HOD has REJECTED the swap for {code} on {date}."),
                ),
            };

            [&details.requesting_lecturer_id, &details.target_lecturer_id]
                .into_iter()
                .map(|user_id| NotificationDraft::new(user_id.clone(), title, message.clone()))
                .collect()
        }
    }
}

/// Notices sent to enrolled students once a class has moved.
#[must_use]
pub fn student_notices(details: &SwapDetails, student_ids: &[String]) -> Vec<NotificationDraft> {
    let message = format!(
        "Your class has been moved to {} at {}.",
        details.proposed_date,
        details.proposed_start_time.format("%H:%M")
    );

    student_ids
        .iter()
        .map(|student_id| {
            NotificationDraft::new(student_id.clone(), "Class Rescheduled", message.clone())
        })
        .collect()
}

/// Swap request service.
#[derive(Clone)]
pub struct SwapService {
    db: Arc<DatabaseConnection>,
    swap_repo: SwapRequestRepository,
    timetable_repo: TimetableRepository,
    user_repo: UserRepository,
    hall_repo: LectureHallRepository,
    enrollment_repo: EnrollmentRepository,
    notification_service: NotificationService,
    id_gen: IdGenerator,
}

impl SwapService {
    /// Create a new swap service.
    #[must_use]
    pub const fn new(
        db: Arc<DatabaseConnection>,
        swap_repo: SwapRequestRepository,
        timetable_repo: TimetableRepository,
        user_repo: UserRepository,
        hall_repo: LectureHallRepository,
        enrollment_repo: EnrollmentRepository,
        notification_service: NotificationService,
    ) -> Self {
        Self {
            db,
            swap_repo,
            timetable_repo,
            user_repo,
            hall_repo,
            enrollment_repo,
            notification_service,
            id_gen: IdGenerator::new(),
        }
    }

    /// Propose moving one of the requester's classes to another lecturer.
    pub async fn create(
        &self,
        requester_id: &str,
        input: CreateSwapInput,
    ) -> AppResult<swap_request::Model> {
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if input.proposed_end_time <= input.proposed_start_time {
            return Err(AppError::Validation(
                "Proposed end time must be after the start time".into(),
            ));
        }

        if input.target_lecturer_id == requester_id {
            return Err(AppError::BadRequest(
                "Cannot request a swap with yourself".into(),
            ));
        }

        let entry = self.timetable_repo.get_by_id(&input.timetable_id).await?;
        if entry.lecturer_id != requester_id {
            return Err(AppError::Forbidden(
                "You can only request swaps for your own classes".into(),
            ));
        }

        let target = self.user_repo.get_by_id(&input.target_lecturer_id).await?;
        if target.role != UserRole::Lecturer {
            return Err(AppError::BadRequest(
                "Swap target must be a lecturer".into(),
            ));
        }

        self.hall_repo.get_by_id(&input.proposed_hall_id).await?;
        let requester = self.user_repo.get_by_id(requester_id).await?;

        let model = swap_request::ActiveModel {
            id: Set(self.id_gen.generate()),
            timetable_id: Set(input.timetable_id),
            requesting_lecturer_id: Set(requester_id.to_string()),
            target_lecturer_id: Set(input.target_lecturer_id),
            proposed_date: Set(input.proposed_date),
            proposed_start_time: Set(input.proposed_start_time),
            proposed_end_time: Set(input.proposed_end_time),
            proposed_hall_id: Set(input.proposed_hall_id),
            target_lecturer_status: Set(ApprovalStatus::Pending),
            hod_status: Set(ApprovalStatus::Pending),
            created_at: Set(Utc::now().into()),
        };

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let swap = self.swap_repo.create_in(&txn, model).await?;
        self.notification_service
            .emit(&txn, vec![new_request_notice(&requester.name, &swap)])
            .await?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        info!(
            swap_id = %swap.id,
            timetable_id = %swap.timetable_id,
            requester_id,
            target_id = %swap.target_lecturer_id,
            "Swap request created"
        );

        Ok(swap)
    }

    /// Record an answer and carry out its consequences.
    ///
    /// Everything happens in one transaction: the status write, the
    /// notifications and, on final approval, the timetable change.
    pub async fn respond(
        &self,
        swap_id: &str,
        responder: &SwapResponder,
        decision: SwapDecision,
    ) -> AppResult<SwapOutcome> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let swap = self
            .swap_repo
            .find_by_id_in(&txn, swap_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Swap request {swap_id}")))?;

        let stage = check_transition(&swap, responder)?;

        let updated = match stage {
            ApprovalStage::Lecturer => {
                self.swap_repo
                    .set_target_status_in(&txn, swap_id, decision.status())
                    .await?
            }
            ApprovalStage::Hod => {
                self.swap_repo
                    .set_hod_status_in(&txn, swap_id, decision.status())
                    .await?
            }
        };
        if updated == 0 {
            return Err(AppError::Conflict(format!(
                "Swap request {swap_id} was answered concurrently"
            )));
        }

        let details = self.swap_repo.find_details_in(&txn, swap_id).await?;
        let mut notified = self
            .notification_service
            .emit(&txn, stage_notices(stage, decision, &details))
            .await?;

        if stage == ApprovalStage::Hod && decision == SwapDecision::Accepted {
            let change = Reschedule {
                date: details.proposed_date,
                start_time: details.proposed_start_time,
                end_time: details.proposed_end_time,
                hall_id: details.proposed_hall_id.clone(),
                lecturer_id: details.target_lecturer_id.clone(),
            };
            self.timetable_repo
                .reschedule_in(&txn, &details.timetable_id, &change)
                .await?;

            let students = self
                .enrollment_repo
                .student_ids_for_subject_in(&txn, &details.subject_id)
                .await?;
            notified += self
                .notification_service
                .emit(&txn, student_notices(&details, &students))
                .await?;
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        info!(
            swap_id,
            stage = stage.as_str(),
            decision = decision.as_str(),
            notified,
            "Swap request answered"
        );

        Ok(SwapOutcome {
            success: true,
            message: format!("Swap request {} successfully.", decision.as_str()),
        })
    }

    /// Requests waiting on the responder's answer.
    pub async fn list_pending(&self, responder: &SwapResponder) -> AppResult<Vec<PendingSwapRow>> {
        match responder {
            SwapResponder::Lecturer { lecturer_id } => {
                self.swap_repo.list_pending_for_lecturer(lecturer_id).await
            }
            SwapResponder::Hod { .. } => self.swap_repo.list_pending_for_hod().await,
        }
    }
}
