//! Create review table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Review::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Review::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Review::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(Review::CafeId).string_len(32).not_null())
                    .col(ColumnDef::new(Review::Text).text().not_null())
                    .col(ColumnDef::new(Review::Rating).small_integer().not_null())
                    .col(ColumnDef::new(Review::Photos).text())
                    .col(
                        ColumnDef::new(Review::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_review_user")
                            .from(Review::Table, Review::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_review_cafe")
                            .from(Review::Table, Review::CafeId)
                            .to(Cafe::Table, Cafe::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: cafe_id (for listing a cafe's reviews)
        manager
            .create_index(
                Index::create()
                    .name("idx_review_cafe_id")
                    .table(Review::Table)
                    .col(Review::CafeId)
                    .to_owned(),
            )
            .await?;

        // Index: user_id (for listing a user's reviews)
        manager
            .create_index(
                Index::create()
                    .name("idx_review_user_id")
                    .table(Review::Table)
                    .col(Review::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Review::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Review {
    Table,
    Id,
    UserId,
    CafeId,
    Text,
    Rating,
    Photos,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}

#[derive(Iden)]
enum Cafe {
    Table,
    Id,
}
