//! Swap request entity.
//!
//! A lecturer proposes handing one timetable entry to another lecturer at a
//! new date, time and hall. The target lecturer answers first, the head of
//! department second.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Answer recorded for one approval stage.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "accepted")]
    Accepted,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

impl ApprovalStatus {
    /// Wire/database representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "swap_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// The class being moved
    pub timetable_id: String,

    /// Lecturer who proposed the swap
    pub requesting_lecturer_id: String,

    /// Lecturer asked to take over the class
    pub target_lecturer_id: String,

    pub proposed_date: Date,

    pub proposed_start_time: Time,

    pub proposed_end_time: Time,

    pub proposed_hall_id: String,

    /// Set by the target lecturer
    pub target_lecturer_status: ApprovalStatus,

    /// Set by the head of department, only after the target accepted
    pub hod_status: ApprovalStatus,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::timetable::Entity",
        from = "Column::TimetableId",
        to = "super::timetable::Column::Id",
        on_delete = "Cascade"
    )]
    Timetable,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::RequestingLecturerId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Requester,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::TargetLecturerId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Target,

    #[sea_orm(
        belongs_to = "super::lecture_hall::Entity",
        from = "Column::ProposedHallId",
        to = "super::lecture_hall::Column::Id",
        on_delete = "Cascade"
    )]
    ProposedHall,
}

impl ActiveModelBehavior for ActiveModel {}
