//! Create `learning_module` and lesson tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create learning_module table
        manager
            .create_table(
                Table::create()
                    .table(LearningModule::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LearningModule::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LearningModule::Title).string_len(256).not_null())
                    .col(ColumnDef::new(LearningModule::Description).text().not_null())
                    .col(
                        ColumnDef::new(LearningModule::DifficultyLevel)
                            .string_len(16)
                            .not_null()
                            .default("beginner"),
                    )
                    .col(
                        ColumnDef::new(LearningModule::IsPremium)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(LearningModule::IsPublished)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(LearningModule::OrderIndex)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(LearningModule::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(LearningModule::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Index: order_index
        manager
            .create_index(
                Index::create()
                    .name("idx_learning_module_order_index")
                    .table(LearningModule::Table)
                    .col(LearningModule::OrderIndex)
                    .to_owned(),
            )
            .await?;

        // Create lesson table
        manager
            .create_table(
                Table::create()
                    .table(Lesson::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Lesson::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Lesson::ModuleId).string_len(32).not_null())
                    .col(ColumnDef::new(Lesson::Title).string_len(256).not_null())
                    .col(
                        ColumnDef::new(Lesson::LessonType)
                            .string_len(32)
                            .not_null()
                            .default("video"),
                    )
                    .col(ColumnDef::new(Lesson::ContentUrl).string_len(1024))
                    .col(ColumnDef::new(Lesson::XpReward).integer().not_null().default(0))
                    .col(ColumnDef::new(Lesson::GestureTarget).string_len(128))
                    .col(ColumnDef::new(Lesson::OrderIndex).integer().not_null().default(0))
                    .col(
                        ColumnDef::new(Lesson::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Lesson::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_lesson_module")
                            .from(Lesson::Table, Lesson::ModuleId)
                            .to(LearningModule::Table, LearningModule::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (module_id, order_index) covers the per-module lesson list
        manager
            .create_index(
                Index::create()
                    .name("idx_lesson_module_order")
                    .table(Lesson::Table)
                    .col(Lesson::ModuleId)
                    .col(Lesson::OrderIndex)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Lesson::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(LearningModule::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum LearningModule {
    Table,
    Id,
    Title,
    Description,
    DifficultyLevel,
    IsPremium,
    IsPublished,
    OrderIndex,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Lesson {
    Table,
    Id,
    ModuleId,
    Title,
    LessonType,
    ContentUrl,
    XpReward,
    GestureTarget,
    OrderIndex,
    CreatedAt,
    UpdatedAt,
}
