//! Create faq and feedback tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create faq table
        manager
            .create_table(
                Table::create()
                    .table(Faq::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Faq::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Faq::Question).text().not_null())
                    .col(ColumnDef::new(Faq::Answer).text().not_null())
                    .col(ColumnDef::new(Faq::Category).string_len(64).not_null())
                    .col(
                        ColumnDef::new(Faq::IsPublished)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Faq::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Faq::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Index: category
        manager
            .create_index(
                Index::create()
                    .name("idx_faq_category")
                    .table(Faq::Table)
                    .col(Faq::Category)
                    .to_owned(),
            )
            .await?;

        // Create feedback table
        manager
            .create_table(
                Table::create()
                    .table(Feedback::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Feedback::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Feedback::Subject).string_len(256).not_null())
                    .col(ColumnDef::new(Feedback::Message).text().not_null())
                    .col(
                        ColumnDef::new(Feedback::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Feedback::UserId).string_len(32))
                    .col(
                        ColumnDef::new(Feedback::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Feedback::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Index: status (triage filter)
        manager
            .create_index(
                Index::create()
                    .name("idx_feedback_status")
                    .table(Feedback::Table)
                    .col(Feedback::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Feedback::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Faq::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Faq {
    Table,
    Id,
    Question,
    Answer,
    Category,
    IsPublished,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Feedback {
    Table,
    Id,
    Subject,
    Message,
    Status,
    UserId,
    CreatedAt,
    UpdatedAt,
}
