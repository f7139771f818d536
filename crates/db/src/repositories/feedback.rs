//! Feedback repository.

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
    Feedback,
    feedback::{self, FeedbackStatus},
};

/// List filters for the feedback queue.
#[derive(Debug, Clone, Default)]
pub struct FeedbackFilter {
    /// Case-insensitive substring match over subject and message.
    pub search: Option<String>,
    pub status: Option<FeedbackStatus>,
}

/// Repository for feedback operations.
#[derive(Clone)]
pub struct FeedbackRepository {
    db: Arc<DatabaseConnection>,
}

impl FeedbackRepository {
    /// Create a new feedback repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find feedback by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<feedback::Model>> {
        Feedback::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(map_read_err)
    }

    /// List feedback matching the filter, newest first.
    pub async fn list(
        &self,
        filter: &FeedbackFilter,
        page: PageRequest,
    ) -> AppResult<Page<feedback::Model>> {
        let mut query = Feedback::find();

        if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = format!("%{search}%");
            query = query.filter(
                Condition::any()
                    .add(Expr::col(feedback::Column::Subject).ilike(pattern.clone()))
                    .add(Expr::col(feedback::Column::Message).ilike(pattern)),
            );
        }
        if let Some(status) = filter.status {
            query = query.filter(feedback::Column::Status.eq(status));
        }

        let total = query
            .clone()
            .count(self.db.as_ref())
            .await
            .map_err(map_read_err)?;

        let items = query
            .order_by_desc(feedback::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(self.db.as_ref())
            .await
            .map_err(map_read_err)?;

        Ok(Page::new(items, total, page))
    }

    /// Create a feedback record.
    pub async fn create(&self, model: feedback::ActiveModel) -> AppResult<feedback::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| map_write_err(e, "Feedback already exists"))
    }

    /// Set the triage status.
    pub async fn set_status(&self, id: &str, status: FeedbackStatus) -> AppResult<feedback::Model> {
        let feedback = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Feedback not found: {id}")))?;

        let mut active: feedback::ActiveModel = feedback.into();
        active.status = Set(status);
        active.updated_at = Set(Some(Utc::now()));

        active
            .update(self.db.as_ref())
            .await
            .map_err(map_read_err)
    }

    /// Delete a feedback record. Missing IDs are reported as not found.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let result = Feedback::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(map_read_err)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Feedback not found: {id}")));
        }
        Ok(())
    }

    /// Count feedback awaiting triage.
    pub async fn count_pending(&self) -> AppResult<u64> {
        Feedback::find()
            .filter(feedback::Column::Status.eq(FeedbackStatus::Pending))
            .count(self.db.as_ref())
            .await
            .map_err(map_read_err)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_feedback(id: &str, status: FeedbackStatus) -> feedback::Model {
        feedback::Model {
            id: id.to_string(),
            subject: "App crashes".to_string(),
            message: "The camera view freezes during practice".to_string(),
            status,
            user_id: Some("u1".to_string()),
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_set_status_updates_record() {
        let pending = create_test_feedback("f1", FeedbackStatus::Pending);
        let resolved = feedback::Model {
            status: FeedbackStatus::Resolved,
            updated_at: Some(Utc::now()),
            ..pending.clone()
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[pending]])
                .append_query_results([[resolved]])
                .into_connection(),
        );

        let repo = FeedbackRepository::new(db);
        let updated = repo
            .set_status("f1", FeedbackStatus::Resolved)
            .await
            .unwrap();

        assert_eq!(updated.status, FeedbackStatus::Resolved);
    }

    #[tokio::test]
    async fn test_count_pending() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(3))
                }]])
                .into_connection(),
        );

        let repo = FeedbackRepository::new(db);
        assert_eq!(repo.count_pending().await.unwrap(), 3);
    }
}
