//! Create `post` table.
//!
//! `slug`, `created_at` and `updated_at` are filled by the post service hooks,
//! so every column is NOT NULL.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Post::Table)
                    .if_not_exists()
                    .col(integer(Post::Id).auto_increment().primary_key())
                    .col(string_len(Post::Title, 200))
                    .col(string_len(Post::Slug, 220))
                    .col(text(Post::Body))
                    .col(boolean(Post::Published).default(false))
                    .col(timestamp_with_time_zone(Post::CreatedAt))
                    .col(timestamp_with_time_zone(Post::UpdatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Post::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Post { Table, Id, Title, Slug, Body, Published, CreatedAt, UpdatedAt }
