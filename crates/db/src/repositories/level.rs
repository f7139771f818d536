//! Level repository.

use std::sync::Arc;

use lisan_common::{AppError, AppResult, Page, PageRequest};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder, QuerySelect,
};

use super::{map_read_err, map_write_err};
use crate::entities::{Level, level};

/// Repository for gamification level operations.
#[derive(Clone)]
pub struct LevelRepository {
    db: Arc<DatabaseConnection>,
}

impl LevelRepository {
    /// Create a new level repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find level by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<level::Model>> {
        Level::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(map_read_err)
    }

    /// List levels ordered by their level number.
    pub async fn list(&self, page: PageRequest) -> AppResult<Page<level::Model>> {
        let total = Level::find()
            .count(self.db.as_ref())
            .await
            .map_err(map_read_err)?;

        let items = Level::find()
            .order_by_asc(level::Column::LevelNumber)
            .offset(page.offset())
            .limit(page.limit())
            .all(self.db.as_ref())
            .await
            .map_err(map_read_err)?;

        Ok(Page::new(items, total, page))
    }

    /// Create a new level.
    ///
    /// A duplicate `level_number` surfaces as [`AppError::Conflict`].
    pub async fn create(&self, model: level::ActiveModel) -> AppResult<level::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| map_write_err(e, "Level number already exists"))
    }

    /// Update a level.
    pub async fn update(&self, model: level::ActiveModel) -> AppResult<level::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| map_write_err(e, "Level number already exists"))
    }

    /// Delete a level. Missing IDs are reported as not found.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let result = Level::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(map_read_err)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Level not found: {id}")));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_list_orders_by_level_number() {
        let l1 = level::Model {
            id: "lvl1".to_string(),
            level_number: 1,
            name: "Rookie".to_string(),
            min_score: 0,
            icon_url: None,
            created_at: Utc::now(),
            updated_at: None,
        };
        let l2 = level::Model {
            level_number: 2,
            id: "lvl2".to_string(),
            name: "Explorer".to_string(),
            min_score: 100,
            ..l1.clone()
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(2))
                }]])
                .append_query_results([[l1, l2]])
                .into_connection(),
        );

        let repo = LevelRepository::new(db);
        let page = repo.list(PageRequest::new(1, 50)).await.unwrap();

        assert_eq!(page.items[0].level_number, 1);
        assert_eq!(page.items[1].level_number, 2);
    }
}
