//! Badge repository.

use std::sync::Arc;

use lisan_common::{AppError, AppResult, Page, PageRequest};
use sea_orm::sea_query::{Expr, extension::postgres::PgExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};

use super::{map_read_err, map_write_err};
use crate::entities::{
    Badge,
    badge::{self, BadgeTier},
};

/// List filters for the badge table.
#[derive(Debug, Clone, Default)]
pub struct BadgeFilter {
    /// Case-insensitive substring match over the badge name.
    pub search: Option<String>,
    pub tier: Option<BadgeTier>,
}

/// Repository for badge operations.
#[derive(Clone)]
pub struct BadgeRepository {
    db: Arc<DatabaseConnection>,
}

impl BadgeRepository {
    /// Create a new badge repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find badge by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<badge::Model>> {
        Badge::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(map_read_err)
    }

    /// List badges matching the filter, newest first.
    pub async fn list(
        &self,
        filter: &BadgeFilter,
        page: PageRequest,
    ) -> AppResult<Page<badge::Model>> {
        let mut query = Badge::find();

        if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = format!("%{search}%");
            query = query.filter(Expr::col(badge::Column::Name).ilike(pattern));
        }
        if let Some(tier) = filter.tier {
            query = query.filter(badge::Column::Tier.eq(tier));
        }

        let total = query
            .clone()
            .count(self.db.as_ref())
            .await
            .map_err(map_read_err)?;

        let items = query
            .order_by_desc(badge::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(self.db.as_ref())
            .await
            .map_err(map_read_err)?;

        Ok(Page::new(items, total, page))
    }

    /// Create a new badge.
    pub async fn create(&self, model: badge::ActiveModel) -> AppResult<badge::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| map_write_err(e, "Badge already exists"))
    }

    /// Update a badge.
    pub async fn update(&self, model: badge::ActiveModel) -> AppResult<badge::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| map_write_err(e, "Badge already exists"))
    }

    /// Delete a badge. Missing IDs are reported as not found.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let result = Badge::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(map_read_err)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Badge not found: {id}")));
        }
        Ok(())
    }
}
