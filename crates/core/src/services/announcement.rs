//! Announcement service.

use chrono::{DateTime, Utc};
use lisan_common::{AppResult, IdGenerator, Page, PageRequest};
use lisan_db::{
    entities::announcement::{self, AnnouncementCategory},
    entities::user,
    repositories::{AnnouncementFilter, AnnouncementRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

use super::events::{EventAction, EventBus, ResourceKind};

/// Service for managing announcements.
#[derive(Clone)]
pub struct AnnouncementService {
    announcement_repo: AnnouncementRepository,
    events: EventBus,
    id_gen: IdGenerator,
}

/// Input for creating an announcement.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAnnouncementInput {
    #[validate(length(min = 1, max = 256))]
    pub title: String,

    #[validate(length(min = 1))]
    pub content: String,

    pub category: AnnouncementCategory,

    #[validate(url)]
    pub image_url: Option<String>,

    #[validate(url)]
    pub video_url: Option<String>,

    #[serde(default)]
    pub is_pinned: bool,

    /// Defaults to active when omitted.
    pub is_active: Option<bool>,

    /// Defaults to now when omitted.
    pub publish_at: Option<DateTime<Utc>>,
}

/// Input for updating an announcement.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateAnnouncementInput {
    #[validate(length(min = 1, max = 256))]
    pub title: Option<String>,

    #[validate(length(min = 1))]
    pub content: Option<String>,

    pub category: Option<AnnouncementCategory>,

    #[validate(url)]
    pub image_url: Option<String>,

    #[validate(url)]
    pub video_url: Option<String>,

    pub is_pinned: Option<bool>,
    pub is_active: Option<bool>,
    pub publish_at: Option<DateTime<Utc>>,
}

impl AnnouncementService {
    /// Create a new announcement service.
    #[must_use]
    pub const fn new(announcement_repo: AnnouncementRepository, events: EventBus) -> Self {
        Self {
            announcement_repo,
            events,
            id_gen: IdGenerator::new(),
        }
    }

    /// List announcements. Pinned ones come first, then newest publish date.
    pub async fn list(
        &self,
        filter: &AnnouncementFilter,
        page: PageRequest,
    ) -> AppResult<Page<announcement::Model>> {
        self.announcement_repo.list(filter, page).await
    }

    /// Get an announcement by ID.
    pub async fn get(&self, id: &str) -> AppResult<announcement::Model> {
        self.announcement_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| lisan_common::AppError::NotFound(format!("Announcement not found: {id}")))
    }

    /// Create a new announcement authored by `author`.
    pub async fn create(
        &self,
        input: CreateAnnouncementInput,
        author: &user::Model,
    ) -> AppResult<announcement::Model> {
        input.validate()?;

        let id = self.id_gen.generate();
        let now = Utc::now();

        let model = announcement::ActiveModel {
            id: Set(id),
            title: Set(input.title),
            content: Set(input.content),
            category: Set(input.category),
            image_url: Set(input.image_url),
            video_url: Set(input.video_url),
            is_pinned: Set(input.is_pinned),
            is_active: Set(input.is_active.unwrap_or(true)),
            publish_at: Set(input.publish_at.unwrap_or(now)),
            created_by_id: Set(Some(author.id.clone())),
            created_by_name: Set(author.name.clone()),
            created_at: Set(now),
            updated_at: Set(None),
        };

        let created = self.announcement_repo.create(model).await?;

        self.events
            .publish(ResourceKind::Announcement, &created.id, EventAction::Created);

        Ok(created)
    }

    /// Update an announcement.
    pub async fn update(
        &self,
        id: &str,
        input: UpdateAnnouncementInput,
    ) -> AppResult<announcement::Model> {
        input.validate()?;

        let existing = self.get(id).await?;
        let mut active: announcement::ActiveModel = existing.into();

        if let Some(title) = input.title {
            active.title = Set(title);
        }
        if let Some(content) = input.content {
            active.content = Set(content);
        }
        if let Some(category) = input.category {
            active.category = Set(category);
        }
        if let Some(image_url) = input.image_url {
            active.image_url = Set(Some(image_url));
        }
        if let Some(video_url) = input.video_url {
            active.video_url = Set(Some(video_url));
        }
        if let Some(is_pinned) = input.is_pinned {
            active.is_pinned = Set(is_pinned);
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        if let Some(publish_at) = input.publish_at {
            active.publish_at = Set(publish_at);
        }

        active.updated_at = Set(Some(Utc::now()));

        let updated = self.announcement_repo.update(active).await?;

        self.events
            .publish(ResourceKind::Announcement, id, EventAction::Updated);

        Ok(updated)
    }

    /// Pin or unpin an announcement. Idempotent.
    pub async fn set_pinned(&self, id: &str, value: bool) -> AppResult<announcement::Model> {
        let updated = self.announcement_repo.set_pinned(id, value).await?;
        self.events
            .publish(ResourceKind::Announcement, id, EventAction::Toggled);
        Ok(updated)
    }

    /// Activate or deactivate an announcement. Idempotent.
    pub async fn set_active(&self, id: &str, value: bool) -> AppResult<announcement::Model> {
        let updated = self.announcement_repo.set_active(id, value).await?;
        self.events
            .publish(ResourceKind::Announcement, id, EventAction::Toggled);
        Ok(updated)
    }

    /// Delete an announcement.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.announcement_repo.delete(id).await?;
        self.events
            .publish(ResourceKind::Announcement, id, EventAction::Deleted);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use lisan_common::AppError;
    use lisan_db::entities::user::{LearningLevel, UserRole, UserStatus};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn mock_announcement(id: &str, title: &str) -> announcement::Model {
        announcement::Model {
            id: id.to_string(),
            title: title.to_string(),
            content: "Isi pengumuman".to_string(),
            category: AnnouncementCategory::Content,
            image_url: None,
            video_url: None,
            is_pinned: false,
            is_active: true,
            publish_at: Utc::now(),
            created_by_id: Some("admin1".to_string()),
            created_by_name: "Admin".to_string(),
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    fn mock_admin() -> user::Model {
        user::Model {
            id: "admin1".to_string(),
            name: "Admin".to_string(),
            username: "admin".to_string(),
            email: "admin@example.com".to_string(),
            password_hash: String::new(),
            token: None,
            role: UserRole::Admin,
            status: UserStatus::Active,
            is_verified: true,
            is_premium: false,
            avatar_url: None,
            learning_level: LearningLevel::Advanced,
            lessons_completed: 0,
            last_active_at: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    fn service_with(db: sea_orm::DatabaseConnection) -> AnnouncementService {
        AnnouncementService::new(
            AnnouncementRepository::new(Arc::new(db)),
            EventBus::new(),
        )
    }

    #[tokio::test]
    async fn test_get_missing_returns_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<announcement::Model>::new()])
            .into_connection();

        let service = service_with(db);

        let result = service.get("nonexistent").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_empty_title() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = service_with(db);

        let result = service
            .create(
                CreateAnnouncementInput {
                    title: String::new(),
                    content: "Isi".to_string(),
                    category: AnnouncementCategory::Update,
                    image_url: None,
                    video_url: None,
                    is_pinned: false,
                    is_active: None,
                    publish_at: None,
                },
                &mock_admin(),
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_defaults_active_and_records_author() {
        let expected = mock_announcement("ann1", "Fitur baru");

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[expected.clone()]])
            .into_connection();

        let service = service_with(db);

        let created = service
            .create(
                CreateAnnouncementInput {
                    title: "Fitur baru".to_string(),
                    content: "Isi pengumuman".to_string(),
                    category: AnnouncementCategory::Content,
                    image_url: None,
                    video_url: None,
                    is_pinned: false,
                    is_active: None,
                    publish_at: None,
                },
                &mock_admin(),
            )
            .await
            .unwrap();

        assert!(created.is_active);
        assert_eq!(created.created_by_name, "Admin");
    }

    #[tokio::test]
    async fn test_double_toggle_restores_original_state() {
        let original = mock_announcement("ann1", "Penting");
        let mut pinned = original.clone();
        pinned.is_pinned = true;

        // Two toggles, each a fetch followed by an update.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([
                vec![original.clone()],
                vec![pinned.clone()],
                vec![pinned],
                vec![original.clone()],
            ])
            .into_connection();

        let service = service_with(db);

        let after_first = service.set_pinned("ann1", true).await.unwrap();
        assert!(after_first.is_pinned);

        let after_second = service.set_pinned("ann1", false).await.unwrap();
        assert_eq!(after_second.is_pinned, original.is_pinned);
    }

    #[tokio::test]
    async fn test_set_pinned_publishes_event() {
        let mut pinned = mock_announcement("ann1", "Penting");
        pinned.is_pinned = true;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[mock_announcement("ann1", "Penting")], [pinned]])
            .into_connection();

        let bus = EventBus::new();
        let mut rx = bus.subscribe();
        let service = AnnouncementService::new(AnnouncementRepository::new(Arc::new(db)), bus);

        let updated = service.set_pinned("ann1", true).await.unwrap();

        assert!(updated.is_pinned);
        let event = rx.recv().await.unwrap();
        assert_eq!(event.resource, ResourceKind::Announcement);
        assert_eq!(event.action, EventAction::Toggled);
    }
}
