//! Create lecture halls table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LectureHalls::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LectureHalls::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LectureHalls::Name).string_len(128).not_null())
                    .col(ColumnDef::new(LectureHalls::Capacity).integer().not_null())
                    .col(
                        ColumnDef::new(LectureHalls::HasProjector)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LectureHalls::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum LectureHalls {
    Table,
    Id,
    Name,
    Capacity,
    HasProjector,
}
