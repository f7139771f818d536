//! FAQ repository.

use std::sync::Arc;

use chrono::Utc;
use lisan_common::{AppError, AppResult, Page, PageRequest};
use sea_orm::sea_query::{Expr, extension::postgres::PgExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use super::{map_read_err, map_write_err};
use crate::entities::{Faq, faq};

/// List filters for the FAQ table.
#[derive(Debug, Clone, Default)]
pub struct FaqFilter {
    /// Case-insensitive substring match over question and answer.
    pub search: Option<String>,
    pub category: Option<String>,
    pub published: Option<bool>,
}

/// Repository for FAQ operations.
#[derive(Clone)]
pub struct FaqRepository {
    db: Arc<DatabaseConnection>,
}

impl FaqRepository {
    /// Create a new FAQ repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find FAQ by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<faq::Model>> {
        Faq::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(map_read_err)
    }

    /// List FAQs matching the filter, newest first.
    pub async fn list(&self, filter: &FaqFilter, page: PageRequest) -> AppResult<Page<faq::Model>> {
        let mut query = Faq::find();

        if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = format!("%{search}%");
            query = query.filter(
                Condition::any()
                    .add(Expr::col(faq::Column::Question).ilike(pattern.clone()))
                    .add(Expr::col(faq::Column::Answer).ilike(pattern)),
            );
        }
        if let Some(category) = filter.category.as_deref().filter(|c| !c.is_empty()) {
            query = query.filter(faq::Column::Category.eq(category));
        }
        if let Some(published) = filter.published {
            query = query.filter(faq::Column::IsPublished.eq(published));
        }

        let total = query
            .clone()
            .count(self.db.as_ref())
            .await
            .map_err(map_read_err)?;

        let items = query
            .order_by_desc(faq::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(self.db.as_ref())
            .await
            .map_err(map_read_err)?;

        Ok(Page::new(items, total, page))
    }

    /// Create a new FAQ.
    pub async fn create(&self, model: faq::ActiveModel) -> AppResult<faq::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| map_write_err(e, "FAQ already exists"))
    }

    /// Update a FAQ.
    pub async fn update(&self, model: faq::ActiveModel) -> AppResult<faq::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| map_write_err(e, "FAQ already exists"))
    }

    /// Set the published flag.
    pub async fn set_published(&self, id: &str, value: bool) -> AppResult<faq::Model> {
        let faq = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("FAQ not found: {id}")))?;

        let mut active: faq::ActiveModel = faq.into();
        active.is_published = Set(value);
        active.updated_at = Set(Some(Utc::now()));
        self.update(active).await
    }

    /// Delete a FAQ. Missing IDs are reported as not found.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let result = Faq::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(map_read_err)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("FAQ not found: {id}")));
        }
        Ok(())
    }
}
