//! Announcement repository.

use std::sync::Arc;

use chrono::Utc;
use lisan_common::{AppError, AppResult, Page, PageRequest};
use sea_orm::sea_query::{Expr, extension::postgres::PgExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use super::{map_read_err, map_write_err};
use crate::entities::{
    Announcement,
    announcement::{self, AnnouncementCategory},
};

/// List filters for the announcement table.
#[derive(Debug, Clone, Default)]
pub struct AnnouncementFilter {
    /// Case-insensitive substring match over title and content.
    pub search: Option<String>,
    pub category: Option<AnnouncementCategory>,
    pub active: Option<bool>,
}

/// Repository for announcement operations.
#[derive(Clone)]
pub struct AnnouncementRepository {
    db: Arc<DatabaseConnection>,
}

impl AnnouncementRepository {
    /// Create a new announcement repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find announcement by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<announcement::Model>> {
        Announcement::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(map_read_err)
    }

    /// List announcements, pinned first, then newest publish date.
    pub async fn list(
        &self,
        filter: &AnnouncementFilter,
        page: PageRequest,
    ) -> AppResult<Page<announcement::Model>> {
        let mut query = Announcement::find();

        if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = format!("%{search}%");
            query = query.filter(
                Condition::any()
                    .add(Expr::col(announcement::Column::Title).ilike(pattern.clone()))
                    .add(Expr::col(announcement::Column::Content).ilike(pattern)),
            );
        }
        if let Some(category) = filter.category {
            query = query.filter(announcement::Column::Category.eq(category));
        }
        if let Some(active) = filter.active {
            query = query.filter(announcement::Column::IsActive.eq(active));
        }

        let total = query
            .clone()
            .count(self.db.as_ref())
            .await
            .map_err(map_read_err)?;

        let items = query
            .order_by_desc(announcement::Column::IsPinned)
            .order_by_desc(announcement::Column::PublishAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(self.db.as_ref())
            .await
            .map_err(map_read_err)?;

        Ok(Page::new(items, total, page))
    }

    /// Create a new announcement.
    pub async fn create(&self, model: announcement::ActiveModel) -> AppResult<announcement::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| map_write_err(e, "Announcement already exists"))
    }

    /// Update an announcement.
    pub async fn update(&self, model: announcement::ActiveModel) -> AppResult<announcement::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| map_write_err(e, "Announcement already exists"))
    }

    /// Set the pinned flag.
    pub async fn set_pinned(&self, id: &str, value: bool) -> AppResult<announcement::Model> {
        let announcement = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Announcement not found: {id}")))?;

        let mut active: announcement::ActiveModel = announcement.into();
        active.is_pinned = Set(value);
        active.updated_at = Set(Some(Utc::now()));
        self.update(active).await
    }

    /// Set the active flag.
    pub async fn set_active(&self, id: &str, value: bool) -> AppResult<announcement::Model> {
        let announcement = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Announcement not found: {id}")))?;

        let mut active: announcement::ActiveModel = announcement.into();
        active.is_active = Set(value);
        active.updated_at = Set(Some(Utc::now()));
        self.update(active).await
    }

    /// Delete an announcement. Missing IDs are reported as not found.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let result = Announcement::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(map_read_err)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Announcement not found: {id}")));
        }
        Ok(())
    }

    /// Count active announcements.
    pub async fn count_active(&self) -> AppResult<u64> {
        Announcement::find()
            .filter(announcement::Column::IsActive.eq(true))
            .count(self.db.as_ref())
            .await
            .map_err(map_read_err)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_announcement(id: &str, title: &str, is_pinned: bool) -> announcement::Model {
        announcement::Model {
            id: id.to_string(),
            title: title.to_string(),
            content: "Test announcement content".to_string(),
            category: AnnouncementCategory::Content,
            image_url: None,
            video_url: None,
            is_pinned,
            is_active: true,
            publish_at: Utc::now(),
            created_by_id: Some("admin1".to_string()),
            created_by_name: "Admin".to_string(),
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_by_id_returns_announcement() {
        let announcement = create_test_announcement("ann1", "Judul Test", false);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[announcement.clone()]])
                .into_connection(),
        );

        let repo = AnnouncementRepository::new(db);
        let result = repo.find_by_id("ann1").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().title, "Judul Test");
    }

    #[tokio::test]
    async fn test_list_returns_page() {
        let pinned = create_test_announcement("ann1", "Pinned", true);
        let regular = create_test_announcement("ann2", "Regular", false);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(2))
                }]])
                .append_query_results([[pinned, regular]])
                .into_connection(),
        );

        let repo = AnnouncementRepository::new(db);
        let page = repo
            .list(&AnnouncementFilter::default(), PageRequest::new(1, 10))
            .await
            .unwrap();

        assert_eq!(page.total, 2);
        assert!(page.items[0].is_pinned);
    }

    #[tokio::test]
    async fn test_set_pinned_missing_is_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<announcement::Model>::new()])
                .into_connection(),
        );

        let repo = AnnouncementRepository::new(db);
        let err = repo.set_pinned("nope", true).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = AnnouncementRepository::new(db);
        let err = repo.delete("nope").await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }
}
