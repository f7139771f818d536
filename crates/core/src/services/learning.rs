//! Learning content service: modules and their lessons.

use chrono::Utc;
use lisan_common::{AppError, AppResult, IdGenerator, Page, PageRequest};
use lisan_db::{
    entities::learning_module::{self, DifficultyLevel},
    entities::lesson::{self, LessonType},
    repositories::{LearningModuleFilter, LearningModuleRepository, LessonRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

use super::events::{EventAction, EventBus, ResourceKind};

/// Service for managing learning modules and lessons.
#[derive(Clone)]
pub struct LearningService {
    module_repo: LearningModuleRepository,
    lesson_repo: LessonRepository,
    events: EventBus,
    id_gen: IdGenerator,
}

/// Input for creating a learning module.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateModuleInput {
    #[validate(length(min = 1, max = 256))]
    pub title: String,

    #[validate(length(min = 1))]
    pub description: String,

    pub difficulty_level: DifficultyLevel,

    #[serde(default)]
    pub is_premium: bool,

    /// New modules default to unpublished.
    #[serde(default)]
    pub is_published: bool,

    #[validate(range(min = 0))]
    #[serde(default)]
    pub order_index: i32,
}

/// Input for updating a learning module.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateModuleInput {
    #[validate(length(min = 1, max = 256))]
    pub title: Option<String>,

    #[validate(length(min = 1))]
    pub description: Option<String>,

    pub difficulty_level: Option<DifficultyLevel>,
    pub is_premium: Option<bool>,
    pub is_published: Option<bool>,

    #[validate(range(min = 0))]
    pub order_index: Option<i32>,
}

/// Input for creating a lesson inside a module.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLessonInput {
    #[validate(length(min = 1, max = 256))]
    pub title: String,

    pub lesson_type: LessonType,

    #[validate(url)]
    pub content_url: Option<String>,

    #[validate(range(min = 0))]
    #[serde(default)]
    pub xp_reward: i32,

    /// Required when `lesson_type` is gesture practice.
    pub gesture_target: Option<String>,

    #[validate(range(min = 0))]
    #[serde(default)]
    pub order_index: i32,
}

/// Input for updating a lesson.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateLessonInput {
    #[validate(length(min = 1, max = 256))]
    pub title: Option<String>,

    pub lesson_type: Option<LessonType>,

    #[validate(url)]
    pub content_url: Option<String>,

    #[validate(range(min = 0))]
    pub xp_reward: Option<i32>,

    pub gesture_target: Option<String>,

    #[validate(range(min = 0))]
    pub order_index: Option<i32>,
}

impl LearningService {
    /// Create a new learning service.
    #[must_use]
    pub const fn new(
        module_repo: LearningModuleRepository,
        lesson_repo: LessonRepository,
        events: EventBus,
    ) -> Self {
        Self {
            module_repo,
            lesson_repo,
            events,
            id_gen: IdGenerator::new(),
        }
    }

    /// List modules ordered by their display order.
    pub async fn list_modules(
        &self,
        filter: &LearningModuleFilter,
        page: PageRequest,
    ) -> AppResult<Page<learning_module::Model>> {
        self.module_repo.list(filter, page).await
    }

    /// Get a module by ID.
    pub async fn get_module(&self, id: &str) -> AppResult<learning_module::Model> {
        self.module_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Learning module not found: {id}")))
    }

    /// Create a module.
    pub async fn create_module(&self, input: CreateModuleInput) -> AppResult<learning_module::Model> {
        input.validate()?;

        let model = learning_module::ActiveModel {
            id: Set(self.id_gen.generate()),
            title: Set(input.title),
            description: Set(input.description),
            difficulty_level: Set(input.difficulty_level),
            is_premium: Set(input.is_premium),
            is_published: Set(input.is_published),
            order_index: Set(input.order_index),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        };

        let created = self.module_repo.create(model).await?;

        self.events.publish(
            ResourceKind::LearningModule,
            &created.id,
            EventAction::Created,
        );

        Ok(created)
    }

    /// Update a module.
    pub async fn update_module(
        &self,
        id: &str,
        input: UpdateModuleInput,
    ) -> AppResult<learning_module::Model> {
        input.validate()?;

        let existing = self.get_module(id).await?;
        let mut active: learning_module::ActiveModel = existing.into();

        if let Some(title) = input.title {
            active.title = Set(title);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(difficulty_level) = input.difficulty_level {
            active.difficulty_level = Set(difficulty_level);
        }
        if let Some(is_premium) = input.is_premium {
            active.is_premium = Set(is_premium);
        }
        if let Some(is_published) = input.is_published {
            active.is_published = Set(is_published);
        }
        if let Some(order_index) = input.order_index {
            active.order_index = Set(order_index);
        }

        active.updated_at = Set(Some(Utc::now()));

        let updated = self.module_repo.update(active).await?;

        self.events
            .publish(ResourceKind::LearningModule, id, EventAction::Updated);

        Ok(updated)
    }

    /// Publish or unpublish a module. Idempotent.
    pub async fn set_module_published(
        &self,
        id: &str,
        value: bool,
    ) -> AppResult<learning_module::Model> {
        let updated = self.module_repo.set_published(id, value).await?;
        self.events
            .publish(ResourceKind::LearningModule, id, EventAction::Toggled);
        Ok(updated)
    }

    /// Delete a module and all of its lessons.
    pub async fn delete_module(&self, id: &str) -> AppResult<()> {
        self.module_repo.delete(id).await?;
        self.events
            .publish(ResourceKind::LearningModule, id, EventAction::Deleted);
        Ok(())
    }

    /// List lessons of a module, in lesson order.
    pub async fn list_lessons(&self, module_id: &str) -> AppResult<Vec<lesson::Model>> {
        // 404 for unknown modules rather than an empty list
        self.get_module(module_id).await?;
        self.lesson_repo.find_by_module(module_id).await
    }

    /// Get a lesson by ID.
    pub async fn get_lesson(&self, id: &str) -> AppResult<lesson::Model> {
        self.lesson_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Lesson not found: {id}")))
    }

    /// Create a lesson inside a module.
    pub async fn create_lesson(
        &self,
        module_id: &str,
        input: CreateLessonInput,
    ) -> AppResult<lesson::Model> {
        input.validate()?;
        validate_gesture_target(input.lesson_type, input.gesture_target.as_deref())?;

        self.get_module(module_id).await?;

        let model = lesson::ActiveModel {
            id: Set(self.id_gen.generate()),
            module_id: Set(module_id.to_string()),
            title: Set(input.title),
            lesson_type: Set(input.lesson_type),
            content_url: Set(input.content_url),
            xp_reward: Set(input.xp_reward),
            gesture_target: Set(input.gesture_target),
            order_index: Set(input.order_index),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        };

        let created = self.lesson_repo.create(model).await?;

        self.events
            .publish(ResourceKind::Lesson, &created.id, EventAction::Created);

        Ok(created)
    }

    /// Update a lesson.
    pub async fn update_lesson(&self, id: &str, input: UpdateLessonInput) -> AppResult<lesson::Model> {
        input.validate()?;

        let existing = self.get_lesson(id).await?;

        let effective_type = input.lesson_type.unwrap_or(existing.lesson_type);
        let effective_target = input
            .gesture_target
            .as_deref()
            .or(existing.gesture_target.as_deref());
        validate_gesture_target(effective_type, effective_target)?;

        let mut active: lesson::ActiveModel = existing.into();

        if let Some(title) = input.title {
            active.title = Set(title);
        }
        if let Some(lesson_type) = input.lesson_type {
            active.lesson_type = Set(lesson_type);
        }
        if let Some(content_url) = input.content_url {
            active.content_url = Set(Some(content_url));
        }
        if let Some(xp_reward) = input.xp_reward {
            active.xp_reward = Set(xp_reward);
        }
        if let Some(gesture_target) = input.gesture_target {
            active.gesture_target = Set(Some(gesture_target));
        }
        if let Some(order_index) = input.order_index {
            active.order_index = Set(order_index);
        }

        active.updated_at = Set(Some(Utc::now()));

        let updated = self.lesson_repo.update(active).await?;

        self.events
            .publish(ResourceKind::Lesson, id, EventAction::Updated);

        Ok(updated)
    }

    /// Delete a lesson.
    pub async fn delete_lesson(&self, id: &str) -> AppResult<()> {
        self.lesson_repo.delete(id).await?;
        self.events
            .publish(ResourceKind::Lesson, id, EventAction::Deleted);
        Ok(())
    }
}

/// Gesture practice lessons must name the gesture to recognize.
fn validate_gesture_target(lesson_type: LessonType, target: Option<&str>) -> AppResult<()> {
    if lesson_type == LessonType::GesturePractice && target.is_none_or(str::is_empty) {
        return Err(AppError::BadRequest(
            "Gesture practice lessons require a gesture target".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn mock_module(id: &str, title: &str) -> learning_module::Model {
        learning_module::Model {
            id: id.to_string(),
            title: title.to_string(),
            description: "Deskripsi modul".to_string(),
            difficulty_level: DifficultyLevel::Beginner,
            is_premium: false,
            is_published: false,
            order_index: 0,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    fn mock_lesson(id: &str, module_id: &str, lesson_type: LessonType) -> lesson::Model {
        lesson::Model {
            id: id.to_string(),
            module_id: module_id.to_string(),
            title: "Huruf A".to_string(),
            lesson_type,
            content_url: None,
            xp_reward: 10,
            gesture_target: matches!(lesson_type, LessonType::GesturePractice)
                .then(|| "A".to_string()),
            order_index: 0,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    fn service_with(db: sea_orm::DatabaseConnection) -> LearningService {
        let db = Arc::new(db);
        LearningService::new(
            LearningModuleRepository::new(db.clone()),
            LessonRepository::new(db),
            EventBus::new(),
        )
    }

    #[test]
    fn test_gesture_practice_requires_target() {
        let result = validate_gesture_target(LessonType::GesturePractice, None);
        assert!(matches!(result, Err(AppError::BadRequest(_))));

        let result = validate_gesture_target(LessonType::GesturePractice, Some(""));
        assert!(matches!(result, Err(AppError::BadRequest(_))));

        assert!(validate_gesture_target(LessonType::GesturePractice, Some("A")).is_ok());
        assert!(validate_gesture_target(LessonType::Video, None).is_ok());
        assert!(validate_gesture_target(LessonType::Quiz, None).is_ok());
    }

    #[tokio::test]
    async fn test_create_lesson_in_missing_module_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<learning_module::Model>::new()])
            .into_connection();

        let service = service_with(db);

        let result = service
            .create_lesson(
                "nonexistent",
                CreateLessonInput {
                    title: "Huruf A".to_string(),
                    lesson_type: LessonType::Video,
                    content_url: None,
                    xp_reward: 10,
                    gesture_target: None,
                    order_index: 0,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_create_gesture_lesson_without_target_is_rejected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = service_with(db);

        let result = service
            .create_lesson(
                "mod1",
                CreateLessonInput {
                    title: "Praktik Huruf A".to_string(),
                    lesson_type: LessonType::GesturePractice,
                    content_url: None,
                    xp_reward: 10,
                    gesture_target: None,
                    order_index: 0,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_update_lesson_keeps_existing_gesture_target() {
        let existing = mock_lesson("lesson1", "mod1", LessonType::GesturePractice);
        let mut updated = existing.clone();
        updated.xp_reward = 25;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[existing], [updated]])
            .into_connection();

        let service = service_with(db);

        let result = service
            .update_lesson(
                "lesson1",
                UpdateLessonInput {
                    title: None,
                    lesson_type: None,
                    content_url: None,
                    xp_reward: Some(25),
                    gesture_target: None,
                    order_index: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(result.xp_reward, 25);
        assert_eq!(result.gesture_target.as_deref(), Some("A"));
    }

    #[tokio::test]
    async fn test_list_lessons_checks_module_exists() {
        let module = mock_module("mod1", "Alfabet Dasar");
        let lesson = mock_lesson("lesson1", "mod1", LessonType::Video);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[module]])
            .append_query_results([[lesson]])
            .into_connection();

        let service = service_with(db);

        let lessons = service.list_lessons("mod1").await.unwrap();

        assert_eq!(lessons.len(), 1);
        assert_eq!(lessons[0].module_id, "mod1");
    }
}
