//! Create level and badge tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create level table
        manager
            .create_table(
                Table::create()
                    .table(Level::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Level::Id).string_len(32).not_null().primary_key())
                    .col(
                        ColumnDef::new(Level::LevelNumber)
                            .integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Level::Name).string_len(128).not_null())
                    .col(ColumnDef::new(Level::MinScore).integer().not_null().default(0))
                    .col(ColumnDef::new(Level::IconUrl).string_len(1024))
                    .col(
                        ColumnDef::new(Level::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Level::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Create badge table
        manager
            .create_table(
                Table::create()
                    .table(Badge::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Badge::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Badge::Name).string_len(128).not_null())
                    .col(ColumnDef::new(Badge::Description).text().not_null())
                    .col(
                        ColumnDef::new(Badge::Tier)
                            .string_len(16)
                            .not_null()
                            .default("bronze"),
                    )
                    .col(ColumnDef::new(Badge::TargetValue).integer().not_null().default(1))
                    .col(ColumnDef::new(Badge::ActivityId).string_len(32))
                    .col(ColumnDef::new(Badge::ImageUrl).string_len(1024))
                    .col(
                        ColumnDef::new(Badge::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Badge::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Index: tier (badge list filter)
        manager
            .create_index(
                Index::create()
                    .name("idx_badge_tier")
                    .table(Badge::Table)
                    .col(Badge::Tier)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Badge::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Level::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Level {
    Table,
    Id,
    LevelNumber,
    Name,
    MinScore,
    IconUrl,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Badge {
    Table,
    Id,
    Name,
    Description,
    Tier,
    TargetValue,
    ActivityId,
    ImageUrl,
    CreatedAt,
    UpdatedAt,
}
