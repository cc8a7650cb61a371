//! Create timetables table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Timetables::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Timetables::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Timetables::Date).date().not_null())
                    .col(ColumnDef::new(Timetables::StartTime).time().not_null())
                    .col(ColumnDef::new(Timetables::EndTime).time().not_null())
                    .col(ColumnDef::new(Timetables::SubjectId).string_len(32).not_null())
                    .col(ColumnDef::new(Timetables::HallId).string_len(32).not_null())
                    .col(ColumnDef::new(Timetables::LecturerId).string_len(32).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_timetables_subject")
                            .from(Timetables::Table, Timetables::SubjectId)
                            .to(Subjects::Table, Subjects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_timetables_hall")
                            .from(Timetables::Table, Timetables::HallId)
                            .to(LectureHalls::Table, LectureHalls::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_timetables_lecturer")
                            .from(Timetables::Table, Timetables::LecturerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: lecturer_id (for a lecturer's own schedule)
        manager
            .create_index(
                Index::create()
                    .name("idx_timetables_lecturer_id")
                    .table(Timetables::Table)
                    .col(Timetables::LecturerId)
                    .to_owned(),
            )
            .await?;

        // Index: (date, start_time) (for ordered schedule listings)
        manager
            .create_index(
                Index::create()
                    .name("idx_timetables_date_start")
                    .table(Timetables::Table)
                    .col(Timetables::Date)
                    .col(Timetables::StartTime)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Timetables::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Timetables {
    Table,
    Id,
    Date,
    StartTime,
    EndTime,
    SubjectId,
    HallId,
    LecturerId,
}

#[derive(Iden)]
enum Subjects {
    Table,
    Id,
}

#[derive(Iden)]
enum LectureHalls {
    Table,
    Id,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
