//! Create announcement table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Announcement::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Announcement::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Announcement::Title).string_len(256).not_null())
                    .col(ColumnDef::new(Announcement::Content).text().not_null())
                    .col(
                        ColumnDef::new(Announcement::Category)
                            .string_len(16)
                            .not_null()
                            .default("content"),
                    )
                    .col(ColumnDef::new(Announcement::ImageUrl).string_len(1024))
                    .col(ColumnDef::new(Announcement::VideoUrl).string_len(1024))
                    .col(
                        ColumnDef::new(Announcement::IsPinned)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Announcement::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Announcement::PublishAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Announcement::CreatedById).string_len(32))
                    .col(
                        ColumnDef::new(Announcement::CreatedByName)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Announcement::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Announcement::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Index: is_active (for filtering active announcements)
        manager
            .create_index(
                Index::create()
                    .name("idx_announcement_is_active")
                    .table(Announcement::Table)
                    .col(Announcement::IsActive)
                    .to_owned(),
            )
            .await?;

        // Index: category
        manager
            .create_index(
                Index::create()
                    .name("idx_announcement_category")
                    .table(Announcement::Table)
                    .col(Announcement::Category)
                    .to_owned(),
            )
            .await?;

        // Index: (is_pinned, publish_at) covers the default list ordering
        manager
            .create_index(
                Index::create()
                    .name("idx_announcement_pinned_publish_at")
                    .table(Announcement::Table)
                    .col(Announcement::IsPinned)
                    .col(Announcement::PublishAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Announcement::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Announcement {
    Table,
    Id,
    Title,
    Content,
    Category,
    ImageUrl,
    VideoUrl,
    IsPinned,
    IsActive,
    PublishAt,
    CreatedById,
    CreatedByName,
    CreatedAt,
    UpdatedAt,
}
