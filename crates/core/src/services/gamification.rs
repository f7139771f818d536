//! Gamification service: levels and badges.

use chrono::Utc;
use lisan_common::{AppError, AppResult, IdGenerator, Page, PageRequest};
use lisan_db::{
    entities::badge::{self, BadgeTier},
    entities::level,
    repositories::{BadgeFilter, BadgeRepository, LevelRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

use super::events::{EventAction, EventBus, ResourceKind};

/// Service for managing player levels and achievement badges.
#[derive(Clone)]
pub struct GamificationService {
    level_repo: LevelRepository,
    badge_repo: BadgeRepository,
    events: EventBus,
    id_gen: IdGenerator,
}

/// Input for creating a level.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLevelInput {
    #[validate(range(min = 1))]
    pub level_number: i32,

    #[validate(length(min = 1, max = 128))]
    pub name: String,

    #[validate(range(min = 0))]
    pub min_score: i32,

    #[validate(url)]
    pub icon_url: Option<String>,
}

/// Input for updating a level.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateLevelInput {
    #[validate(range(min = 1))]
    pub level_number: Option<i32>,

    #[validate(length(min = 1, max = 128))]
    pub name: Option<String>,

    #[validate(range(min = 0))]
    pub min_score: Option<i32>,

    #[validate(url)]
    pub icon_url: Option<String>,
}

/// Input for creating a badge.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBadgeInput {
    #[validate(length(min = 1, max = 128))]
    pub name: String,

    #[validate(length(min = 1, max = 1024))]
    pub description: String,

    pub tier: BadgeTier,

    #[validate(range(min = 1))]
    pub target_value: i32,

    pub activity_id: Option<String>,

    #[validate(url)]
    pub image_url: Option<String>,
}

/// Input for updating a badge.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateBadgeInput {
    #[validate(length(min = 1, max = 128))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 1024))]
    pub description: Option<String>,

    pub tier: Option<BadgeTier>,

    #[validate(range(min = 1))]
    pub target_value: Option<i32>,

    pub activity_id: Option<String>,

    #[validate(url)]
    pub image_url: Option<String>,
}

impl GamificationService {
    /// Create a new gamification service.
    #[must_use]
    pub const fn new(
        level_repo: LevelRepository,
        badge_repo: BadgeRepository,
        events: EventBus,
    ) -> Self {
        Self {
            level_repo,
            badge_repo,
            events,
            id_gen: IdGenerator::new(),
        }
    }

    /// List levels ordered by level number.
    pub async fn list_levels(&self, page: PageRequest) -> AppResult<Page<level::Model>> {
        self.level_repo.list(page).await
    }

    /// Get a level by ID.
    pub async fn get_level(&self, id: &str) -> AppResult<level::Model> {
        self.level_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Level not found: {id}")))
    }

    /// Create a level.
    pub async fn create_level(&self, input: CreateLevelInput) -> AppResult<level::Model> {
        input.validate()?;

        let model = level::ActiveModel {
            id: Set(self.id_gen.generate()),
            level_number: Set(input.level_number),
            name: Set(input.name),
            min_score: Set(input.min_score),
            icon_url: Set(input.icon_url),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        };

        let created = self.level_repo.create(model).await?;

        self.events
            .publish(ResourceKind::Level, &created.id, EventAction::Created);

        Ok(created)
    }

    /// Update a level.
    pub async fn update_level(&self, id: &str, input: UpdateLevelInput) -> AppResult<level::Model> {
        input.validate()?;

        let existing = self.get_level(id).await?;
        let mut active: level::ActiveModel = existing.into();

        if let Some(level_number) = input.level_number {
            active.level_number = Set(level_number);
        }
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(min_score) = input.min_score {
            active.min_score = Set(min_score);
        }
        if let Some(icon_url) = input.icon_url {
            active.icon_url = Set(Some(icon_url));
        }

        active.updated_at = Set(Some(Utc::now()));

        let updated = self.level_repo.update(active).await?;

        self.events
            .publish(ResourceKind::Level, id, EventAction::Updated);

        Ok(updated)
    }

    /// Delete a level.
    pub async fn delete_level(&self, id: &str) -> AppResult<()> {
        self.level_repo.delete(id).await?;
        self.events
            .publish(ResourceKind::Level, id, EventAction::Deleted);
        Ok(())
    }

    /// List badges with search and tier filters.
    pub async fn list_badges(
        &self,
        filter: &BadgeFilter,
        page: PageRequest,
    ) -> AppResult<Page<badge::Model>> {
        self.badge_repo.list(filter, page).await
    }

    /// Get a badge by ID.
    pub async fn get_badge(&self, id: &str) -> AppResult<badge::Model> {
        self.badge_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Badge not found: {id}")))
    }

    /// Create a badge.
    pub async fn create_badge(&self, input: CreateBadgeInput) -> AppResult<badge::Model> {
        input.validate()?;

        let model = badge::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(input.name),
            description: Set(input.description),
            tier: Set(input.tier),
            target_value: Set(input.target_value),
            activity_id: Set(input.activity_id),
            image_url: Set(input.image_url),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        };

        let created = self.badge_repo.create(model).await?;

        self.events
            .publish(ResourceKind::Badge, &created.id, EventAction::Created);

        Ok(created)
    }

    /// Update a badge.
    pub async fn update_badge(&self, id: &str, input: UpdateBadgeInput) -> AppResult<badge::Model> {
        input.validate()?;

        let existing = self.get_badge(id).await?;
        let mut active: badge::ActiveModel = existing.into();

        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(tier) = input.tier {
            active.tier = Set(tier);
        }
        if let Some(target_value) = input.target_value {
            active.target_value = Set(target_value);
        }
        if let Some(activity_id) = input.activity_id {
            active.activity_id = Set(Some(activity_id));
        }
        if let Some(image_url) = input.image_url {
            active.image_url = Set(Some(image_url));
        }

        active.updated_at = Set(Some(Utc::now()));

        let updated = self.badge_repo.update(active).await?;

        self.events
            .publish(ResourceKind::Badge, id, EventAction::Updated);

        Ok(updated)
    }

    /// Delete a badge.
    pub async fn delete_badge(&self, id: &str) -> AppResult<()> {
        self.badge_repo.delete(id).await?;
        self.events
            .publish(ResourceKind::Badge, id, EventAction::Deleted);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn mock_level(id: &str, number: i32) -> level::Model {
        level::Model {
            id: id.to_string(),
            level_number: number,
            name: format!("Level {number}"),
            min_score: number * 100,
            icon_url: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    fn service_with(db: sea_orm::DatabaseConnection) -> GamificationService {
        let db = Arc::new(db);
        GamificationService::new(
            LevelRepository::new(db.clone()),
            BadgeRepository::new(db),
            EventBus::new(),
        )
    }

    #[tokio::test]
    async fn test_create_level_rejects_zero_level_number() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = service_with(db);

        let result = service
            .create_level(CreateLevelInput {
                level_number: 0,
                name: "Pemula".to_string(),
                min_score: 0,
                icon_url: None,
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_get_level_missing_returns_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<level::Model>::new()])
            .into_connection();

        let service = service_with(db);

        let result = service.get_level("nonexistent").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_create_level_returns_created_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[mock_level("lvl1", 1)]])
            .into_connection();

        let service = service_with(db);

        let created = service
            .create_level(CreateLevelInput {
                level_number: 1,
                name: "Level 1".to_string(),
                min_score: 100,
                icon_url: None,
            })
            .await
            .unwrap();

        assert_eq!(created.level_number, 1);
    }

    #[tokio::test]
    async fn test_create_badge_rejects_zero_target() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = service_with(db);

        let result = service
            .create_badge(CreateBadgeInput {
                name: "Rajin Belajar".to_string(),
                description: "Selesaikan 10 pelajaran".to_string(),
                tier: BadgeTier::Bronze,
                target_value: 0,
                activity_id: None,
                image_url: None,
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
