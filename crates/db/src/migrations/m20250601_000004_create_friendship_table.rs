//! Create friendship table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Friendship::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Friendship::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Friendship::UserAId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Friendship::UserBId)
                            .string_len(32)
                            .not_null()
                            // Edges are stored in canonical order, so no
                            // self-edge can satisfy this.
                            .check(
                                Expr::col(Friendship::UserAId)
                                    .lt(Expr::col(Friendship::UserBId)),
                            ),
                    )
                    .col(
                        ColumnDef::new(Friendship::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_friendship_user_a")
                            .from(Friendship::Table, Friendship::UserAId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_friendship_user_b")
                            .from(Friendship::Table, Friendship::UserBId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: one edge per unordered pair
        manager
            .create_index(
                Index::create()
                    .name("idx_friendship_pair")
                    .table(Friendship::Table)
                    .col(Friendship::UserAId)
                    .col(Friendship::UserBId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: user_b_id (pair lookups from either side)
        manager
            .create_index(
                Index::create()
                    .name("idx_friendship_user_b_id")
                    .table(Friendship::Table)
                    .col(Friendship::UserBId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Friendship::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Friendship {
    Table,
    Id,
    UserAId,
    UserBId,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
