//! Timetable entity (one scheduled class occurrence).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "timetables")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub date: Date,

    pub start_time: Time,

    pub end_time: Time,

    pub subject_id: String,

    pub hall_id: String,

    /// Lecturer currently teaching this class
    pub lecturer_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::subject::Entity",
        from = "Column::SubjectId",
        to = "super::subject::Column::Id",
        on_delete = "Cascade"
    )]
    Subject,

    #[sea_orm(
        belongs_to = "super::lecture_hall::Entity",
        from = "Column::HallId",
        to = "super::lecture_hall::Column::Id",
        on_delete = "Cascade"
    )]
    Hall,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::LecturerId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Lecturer,
}

impl ActiveModelBehavior for ActiveModel {}
