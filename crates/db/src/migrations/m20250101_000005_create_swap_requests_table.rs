//! Create swap requests table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SwapRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SwapRequests::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SwapRequests::TimetableId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(SwapRequests::RequestingLecturerId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SwapRequests::TargetLecturerId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(SwapRequests::ProposedDate).date().not_null())
                    .col(ColumnDef::new(SwapRequests::ProposedStartTime).time().not_null())
                    .col(ColumnDef::new(SwapRequests::ProposedEndTime).time().not_null())
                    .col(
                        ColumnDef::new(SwapRequests::ProposedHallId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SwapRequests::TargetLecturerStatus)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(SwapRequests::HodStatus)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(SwapRequests::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_swap_requests_timetable")
                            .from(SwapRequests::Table, SwapRequests::TimetableId)
                            .to(Timetables::Table, Timetables::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_swap_requests_requester")
                            .from(SwapRequests::Table, SwapRequests::RequestingLecturerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_swap_requests_target")
                            .from(SwapRequests::Table, SwapRequests::TargetLecturerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_swap_requests_hall")
                            .from(SwapRequests::Table, SwapRequests::ProposedHallId)
                            .to(LectureHalls::Table, LectureHalls::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (target_lecturer_id, target_lecturer_status) (lecturer inbox)
        manager
            .create_index(
                Index::create()
                    .name("idx_swap_requests_target_status")
                    .table(SwapRequests::Table)
                    .col(SwapRequests::TargetLecturerId)
                    .col(SwapRequests::TargetLecturerStatus)
                    .to_owned(),
            )
            .await?;

        // Index: (target_lecturer_status, hod_status) (HOD inbox)
        manager
            .create_index(
                Index::create()
                    .name("idx_swap_requests_stage")
                    .table(SwapRequests::Table)
                    .col(SwapRequests::TargetLecturerStatus)
                    .col(SwapRequests::HodStatus)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SwapRequests::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum SwapRequests {
    Table,
    Id,
    TimetableId,
    RequestingLecturerId,
    TargetLecturerId,
    ProposedDate,
    ProposedStartTime,
    ProposedEndTime,
    ProposedHallId,
    TargetLecturerStatus,
    HodStatus,
    CreatedAt,
}

#[derive(Iden)]
enum Timetables {
    Table,
    Id,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}

#[derive(Iden)]
enum LectureHalls {
    Table,
    Id,
}
