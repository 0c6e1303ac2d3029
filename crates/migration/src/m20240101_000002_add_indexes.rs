use sea_orm_migration::prelude::*;

use crate::m20240101_000001_create_post::Post;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Post: lookup by slug
        manager
            .create_index(
                Index::create()
                    .name("idx_post_slug")
                    .table(Post::Table)
                    .col(Post::Slug)
                    .to_owned(),
            )
            .await?;

        // Post: published listings
        manager
            .create_index(
                Index::create()
                    .name("idx_post_published")
                    .table(Post::Table)
                    .col(Post::Published)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_post_published").table(Post::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_post_slug").table(Post::Table).to_owned())
            .await
    }
}
