//! Create cafe table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Cafe::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Cafe::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Cafe::Name).string_len(256).not_null())
                    .col(ColumnDef::new(Cafe::Location).string_len(512))
                    .col(ColumnDef::new(Cafe::Description).text())
                    .col(ColumnDef::new(Cafe::Images).json_binary())
                    .col(
                        ColumnDef::new(Cafe::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Cafe::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Cafe {
    Table,
    Id,
    Name,
    Location,
    Description,
    Images,
    CreatedAt,
}
