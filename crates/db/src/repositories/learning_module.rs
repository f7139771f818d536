//! Learning module repository.

use std::sync::Arc;

use chrono::Utc;
use lisan_common::{AppError, AppResult, Page, PageRequest};
use sea_orm::sea_query::{Expr, extension::postgres::PgExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use super::{map_read_err, map_write_err};
use crate::entities::{
    LearningModule, Lesson,
    learning_module::{self, DifficultyLevel},
    lesson,
};

/// List filters for the learning module table.
#[derive(Debug, Clone, Default)]
pub struct LearningModuleFilter {
    /// Case-insensitive substring match over the module title.
    pub search: Option<String>,
    pub difficulty: Option<DifficultyLevel>,
    pub published: Option<bool>,
}

/// Repository for learning module operations.
#[derive(Clone)]
pub struct LearningModuleRepository {
    db: Arc<DatabaseConnection>,
}

impl LearningModuleRepository {
    /// Create a new learning module repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find module by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<learning_module::Model>> {
        LearningModule::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(map_read_err)
    }

    /// List modules matching the filter, in display order.
    pub async fn list(
        &self,
        filter: &LearningModuleFilter,
        page: PageRequest,
    ) -> AppResult<Page<learning_module::Model>> {
        let mut query = LearningModule::find();

        if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = format!("%{search}%");
            query = query.filter(Expr::col(learning_module::Column::Title).ilike(pattern));
        }
        if let Some(difficulty) = filter.difficulty {
            query = query.filter(learning_module::Column::DifficultyLevel.eq(difficulty));
        }
        if let Some(published) = filter.published {
            query = query.filter(learning_module::Column::IsPublished.eq(published));
        }

        let total = query
            .clone()
            .count(self.db.as_ref())
            .await
            .map_err(map_read_err)?;

        let items = query
            .order_by_asc(learning_module::Column::OrderIndex)
            .order_by_desc(learning_module::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(self.db.as_ref())
            .await
            .map_err(map_read_err)?;

        Ok(Page::new(items, total, page))
    }

    /// Create a new module.
    pub async fn create(
        &self,
        model: learning_module::ActiveModel,
    ) -> AppResult<learning_module::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| map_write_err(e, "Module already exists"))
    }

    /// Update a module.
    pub async fn update(
        &self,
        model: learning_module::ActiveModel,
    ) -> AppResult<learning_module::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| map_write_err(e, "Module already exists"))
    }

    /// Set the published flag.
    pub async fn set_published(&self, id: &str, value: bool) -> AppResult<learning_module::Model> {
        let module = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Module not found: {id}")))?;

        let mut active: learning_module::ActiveModel = module.into();
        active.is_published = Set(value);
        active.updated_at = Set(Some(Utc::now()));
        self.update(active).await
    }

    /// Delete a module and its lessons.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        // First delete all lessons of the module
        Lesson::delete_many()
            .filter(lesson::Column::ModuleId.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(map_read_err)?;

        // Then delete the module itself
        let result = LearningModule::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(map_read_err)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Module not found: {id}")));
        }
        Ok(())
    }

    /// Count published modules.
    pub async fn count_published(&self) -> AppResult<u64> {
        LearningModule::find()
            .filter(learning_module::Column::IsPublished.eq(true))
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

    #[tokio::test]
    async fn test_delete_removes_lessons_first() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 4, // lessons deleted
                    },
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1, // module deleted
                    },
                ])
                .into_connection(),
        );

        let repo = LearningModuleRepository::new(db);
        assert!(repo.delete("mod1").await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_missing_module_is_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 0,
                    },
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 0,
                    },
                ])
                .into_connection(),
        );

        let repo = LearningModuleRepository::new(db);
        let err = repo.delete("nope").await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }
}
