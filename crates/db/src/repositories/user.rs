//! User repository.

use std::sync::Arc;

use chrono::Utc;
use lisan_common::{AppError, AppResult, Page, PageRequest};
use sea_orm::sea_query::{Expr, extension::postgres::PgExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, Set,
};

use super::{map_read_err, map_write_err_with};
use crate::entities::{
    User,
    user::{self, UserRole, UserStatus},
};

/// Conflict message for a unique violation, chosen by the constraint the
/// database names. The user table has two unique columns.
fn unique_conflict(constraint: &str) -> &'static str {
    if constraint.contains("username") {
        "Username already exists"
    } else {
        "Email already exists"
    }
}

/// List filters for the admin user table.
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    /// Case-insensitive substring match over name, username and email.
    pub search: Option<String>,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
}

/// User repository for database operations.
#[derive(Clone)]
pub struct UserRepository {
    db: Arc<DatabaseConnection>,
}

impl UserRepository {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<user::Model>> {
        User::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(map_read_err)
    }

    /// Find a user by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<user::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::UserNotFound(id.to_string()))
    }

    /// Find a user by email.
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<user::Model>> {
        User::find()
            .filter(user::Column::Email.eq(email))
            .one(self.db.as_ref())
            .await
            .map_err(map_read_err)
    }

    /// Find a user by access token.
    pub async fn find_by_token(&self, token: &str) -> AppResult<Option<user::Model>> {
        User::find()
            .filter(user::Column::Token.eq(token))
            .one(self.db.as_ref())
            .await
            .map_err(map_read_err)
    }

    /// Apply list filters to a user query.
    fn filtered(filter: &UserFilter) -> Select<User> {
        let mut query = User::find();

        if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = format!("%{search}%");
            query = query.filter(
                Condition::any()
                    .add(Expr::col(user::Column::Name).ilike(pattern.clone()))
                    .add(Expr::col(user::Column::Username).ilike(pattern.clone()))
                    .add(Expr::col(user::Column::Email).ilike(pattern)),
            );
        }
        if let Some(role) = filter.role {
            query = query.filter(user::Column::Role.eq(role));
        }
        if let Some(status) = filter.status {
            query = query.filter(user::Column::Status.eq(status));
        }

        query
    }

    /// List users matching the filter, newest first.
    pub async fn list(&self, filter: &UserFilter, page: PageRequest) -> AppResult<Page<user::Model>> {
        let query = Self::filtered(filter);

        let total = query
            .clone()
            .count(self.db.as_ref())
            .await
            .map_err(map_read_err)?;

        let items = query
            .order_by_desc(user::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(self.db.as_ref())
            .await
            .map_err(map_read_err)?;

        Ok(Page::new(items, total, page))
    }

    /// Fetch up to `limit` users matching the filter, newest first.
    ///
    /// Backs the CSV export; the cap is pushed into the query so an
    /// oversized table never ends up in memory.
    pub async fn list_all(&self, filter: &UserFilter, limit: u64) -> AppResult<Vec<user::Model>> {
        Self::filtered(filter)
            .order_by_desc(user::Column::CreatedAt)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(map_read_err)
    }

    /// Create a new user.
    ///
    /// A duplicate email or username surfaces as [`AppError::Conflict`].
    pub async fn create(&self, model: user::ActiveModel) -> AppResult<user::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| map_write_err_with(e, unique_conflict))
    }

    /// Update a user.
    pub async fn update(&self, model: user::ActiveModel) -> AppResult<user::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| map_write_err_with(e, unique_conflict))
    }

    /// Set the verified flag.
    pub async fn set_verified(&self, id: &str, value: bool) -> AppResult<user::Model> {
        let user = self.get_by_id(id).await?;
        let mut active: user::ActiveModel = user.into();
        active.is_verified = Set(value);
        active.updated_at = Set(Some(Utc::now()));
        self.update(active).await
    }

    /// Set the premium flag.
    pub async fn set_premium(&self, id: &str, value: bool) -> AppResult<user::Model> {
        let user = self.get_by_id(id).await?;
        let mut active: user::ActiveModel = user.into();
        active.is_premium = Set(value);
        active.updated_at = Set(Some(Utc::now()));
        self.update(active).await
    }

    /// Delete a user. Missing IDs are reported as not found.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let result = User::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(map_read_err)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("User not found: {id}")));
        }
        Ok(())
    }

    /// Count all users.
    pub async fn count(&self) -> AppResult<u64> {
        User::find()
            .count(self.db.as_ref())
            .await
            .map_err(map_read_err)
    }

    /// Count verified users.
    pub async fn count_verified(&self) -> AppResult<u64> {
        User::find()
            .filter(user::Column::IsVerified.eq(true))
            .count(self.db.as_ref())
            .await
            .map_err(map_read_err)
    }

    /// Count premium users.
    pub async fn count_premium(&self) -> AppResult<u64> {
        User::find()
            .filter(user::Column::IsPremium.eq(true))
            .count(self.db.as_ref())
            .await
            .map_err(map_read_err)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::user::LearningLevel;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_user(id: &str, email: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            name: "Test User".to_string(),
            username: format!("user_{id}"),
            email: email.to_string(),
            password_hash: "$argon2id$test".to_string(),
            token: Some("token".to_string()),
            role: UserRole::User,
            status: UserStatus::Active,
            is_verified: false,
            is_premium: false,
            avatar_url: None,
            learning_level: LearningLevel::Beginner,
            lessons_completed: 0,
            last_active_at: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_by_id_returns_user() {
        let user = create_test_user("u1", "a@test.com");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user.clone()]])
                .into_connection(),
        );

        let repo = UserRepository::new(db);
        let result = repo.find_by_id("u1").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().email, "a@test.com");
    }

    #[tokio::test]
    async fn test_get_by_id_missing_is_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );

        let repo = UserRepository::new(db);
        let err = repo.get_by_id("nope").await.unwrap_err();

        assert!(matches!(err, AppError::UserNotFound(_)));
    }

    #[tokio::test]
    async fn test_list_returns_page_with_total() {
        let u1 = create_test_user("u1", "a@test.com");
        let u2 = create_test_user("u2", "b@test.com");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // count query first, then the page query
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(2))
                }]])
                .append_query_results([[u1, u2]])
                .into_connection(),
        );

        let repo = UserRepository::new(db);
        let page = repo
            .list(&UserFilter::default(), PageRequest::new(1, 20))
            .await
            .unwrap();

        assert_eq!(page.total, 2);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total_pages(), 1);
    }

    #[tokio::test]
    async fn test_delete_missing_user_is_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = UserRepository::new(db);
        let err = repo.delete("nope").await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        assert!(err.to_string().contains("not found"));
    }

    #[tokio::test]
    async fn test_delete_existing_user_succeeds() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = UserRepository::new(db);
        assert!(repo.delete("u1").await.is_ok());
    }

    #[tokio::test]
    async fn test_list_all_caps_rows_in_a_single_query() {
        let u1 = create_test_user("u1", "a@test.com");
        let u2 = create_test_user("u2", "b@test.com");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[u1, u2]])
                .into_connection(),
        );

        let repo = UserRepository::new(Arc::clone(&db));
        let rows = repo.list_all(&UserFilter::default(), 150).await.unwrap();
        assert_eq!(rows.len(), 2);

        // One SELECT carrying the row cap; no COUNT, no page loop.
        drop(repo);
        let conn = Arc::try_unwrap(db).unwrap_or_else(|_| panic!("connection still shared"));
        let log = conn.into_transaction_log();
        assert_eq!(log.len(), 1);
        assert!(format!("{:?}", log[0]).contains("LIMIT"));
    }

    #[test]
    fn test_unique_conflict_names_the_violated_column() {
        assert_eq!(
            unique_conflict(r#"duplicate key value violates unique constraint "user_username_key""#),
            "Username already exists"
        );
        assert_eq!(
            unique_conflict(r#"duplicate key value violates unique constraint "user_email_key""#),
            "Email already exists"
        );
    }

    #[tokio::test]
    async fn test_count_verified() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(7))
                }]])
                .into_connection(),
        );

        let repo = UserRepository::new(db);
        assert_eq!(repo.count_verified().await.unwrap(), 7);
    }
}
