//! Lesson repository.

use std::sync::Arc;

use lisan_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};

use super::{map_read_err, map_write_err};
use crate::entities::{Lesson, lesson};

/// Repository for lesson operations.
#[derive(Clone)]
pub struct LessonRepository {
    db: Arc<DatabaseConnection>,
}

impl LessonRepository {
    /// Create a new lesson repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find lesson by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<lesson::Model>> {
        Lesson::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(map_read_err)
    }

    /// List all lessons of a module in display order.
    pub async fn find_by_module(&self, module_id: &str) -> AppResult<Vec<lesson::Model>> {
        Lesson::find()
            .filter(lesson::Column::ModuleId.eq(module_id))
            .order_by_asc(lesson::Column::OrderIndex)
            .all(self.db.as_ref())
            .await
            .map_err(map_read_err)
    }

    /// Create a new lesson.
    pub async fn create(&self, model: lesson::ActiveModel) -> AppResult<lesson::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| map_write_err(e, "Lesson already exists"))
    }

    /// Update a lesson.
    pub async fn update(&self, model: lesson::ActiveModel) -> AppResult<lesson::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| map_write_err(e, "Lesson already exists"))
    }

    /// Delete a lesson. Missing IDs are reported as not found.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let result = Lesson::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(map_read_err)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Lesson not found: {id}")));
        }
        Ok(())
    }

    /// Count all lessons.
    pub async fn count(&self) -> AppResult<u64> {
        Lesson::find()
            .count(self.db.as_ref())
            .await
            .map_err(map_read_err)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::lesson::LessonType;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_find_by_module_in_order() {
        let l1 = lesson::Model {
            id: "les1".to_string(),
            module_id: "mod1".to_string(),
            title: "Alphabet A-F".to_string(),
            lesson_type: LessonType::Video,
            content_url: Some("https://cdn.example/a-f.mp4".to_string()),
            xp_reward: 10,
            gesture_target: None,
            order_index: 0,
            created_at: Utc::now(),
            updated_at: None,
        };
        let l2 = lesson::Model {
            id: "les2".to_string(),
            title: "Practice: letter A".to_string(),
            lesson_type: LessonType::GesturePractice,
            content_url: None,
            gesture_target: Some("A".to_string()),
            order_index: 1,
            ..l1.clone()
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[l1, l2]])
                .into_connection(),
        );

        let repo = LessonRepository::new(db);
        let lessons = repo.find_by_module("mod1").await.unwrap();

        assert_eq!(lessons.len(), 2);
        assert_eq!(lessons[0].order_index, 0);
        assert_eq!(lessons[1].gesture_target.as_deref(), Some("A"));
    }
}
