//! User service.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use lisan_common::{AppError, AppResult, IdGenerator, Page, PageRequest};
use lisan_db::{
    entities::user::{self, LearningLevel, UserRole, UserStatus},
    repositories::{UserFilter, UserRepository},
};
use sea_orm::{ActiveEnum, Set};
use serde::Deserialize;
use validator::Validate;

use super::events::{EventAction, EventBus, ResourceKind};

/// Maximum number of rows fetched for a CSV export.
const EXPORT_ROW_LIMIT: u64 = 10_000;

/// Column header of the user CSV export.
const EXPORT_HEADER: &str =
    "ID,Name,Email,Status,Join Date,Lessons Completed,Last Active,Learning Level";

/// User service for business logic.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    events: EventBus,
    id_gen: IdGenerator,
}

/// Input for creating a new user.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserInput {
    #[validate(length(min = 1, max = 256))]
    pub name: String,

    #[validate(length(min = 1, max = 128))]
    pub username: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,

    pub role: Option<UserRole>,
}

/// Input for updating a user.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserInput {
    #[validate(length(min = 1, max = 256))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 128))]
    pub username: Option<String>,

    #[validate(email)]
    pub email: Option<String>,

    #[validate(length(min = 8, max = 128))]
    pub password: Option<String>,

    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
    pub learning_level: Option<LearningLevel>,

    /// `Some(None)` clears the avatar.
    #[serde(default, deserialize_with = "double_option::deserialize")]
    pub avatar_url: Option<Option<String>>,
}

// serde helper for the double-Option avatar field.
mod double_option {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(de: D) -> Result<Option<Option<String>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(de).map(Some)
    }
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(user_repo: UserRepository, events: EventBus) -> Self {
        Self {
            user_repo,
            events,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a new user account.
    ///
    /// New accounts start active, at the beginner level, with zero lessons
    /// completed.
    pub async fn create(&self, input: CreateUserInput) -> AppResult<user::Model> {
        input.validate()?;

        if self.user_repo.find_by_email(&input.email).await?.is_some() {
            return Err(AppError::Conflict("Email already exists".to_string()));
        }

        let password_hash = hash_password(&input.password)?;
        let user_id = self.id_gen.generate();
        let token = self.id_gen.generate_token();
        let now = Utc::now();

        let model = user::ActiveModel {
            id: Set(user_id),
            name: Set(input.name),
            username: Set(input.username),
            email: Set(input.email),
            password_hash: Set(password_hash),
            token: Set(Some(token)),
            role: Set(input.role.unwrap_or(UserRole::User)),
            status: Set(UserStatus::Active),
            is_verified: Set(false),
            is_premium: Set(false),
            avatar_url: Set(None),
            learning_level: Set(LearningLevel::Beginner),
            lessons_completed: Set(0),
            last_active_at: Set(None),
            created_at: Set(now),
            updated_at: Set(None),
        };

        let created = self.user_repo.create(model).await?;

        self.events
            .publish(ResourceKind::User, &created.id, EventAction::Created);

        Ok(created)
    }

    /// Get a user by ID.
    pub async fn get(&self, id: &str) -> AppResult<user::Model> {
        self.user_repo.get_by_id(id).await
    }

    /// List users with search, role and status filters.
    pub async fn list(
        &self,
        filter: &UserFilter,
        page: PageRequest,
    ) -> AppResult<Page<user::Model>> {
        self.user_repo.list(filter, page).await
    }

    /// Authenticate a user by email and password.
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<user::Model> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !verify_password(password, &user.password_hash)? {
            return Err(AppError::Unauthorized);
        }

        if user.status == UserStatus::Suspended {
            return Err(AppError::Forbidden("Account is suspended".to_string()));
        }

        Ok(user)
    }

    /// Authenticate a user by bearer token.
    pub async fn authenticate_by_token(&self, token: &str) -> AppResult<user::Model> {
        self.user_repo
            .find_by_token(token)
            .await?
            .ok_or(AppError::Unauthorized)
    }

    /// Regenerate a user's access token.
    pub async fn regenerate_token(&self, user_id: &str) -> AppResult<String> {
        let user = self.user_repo.get_by_id(user_id).await?;
        let new_token = self.id_gen.generate_token();

        let mut active: user::ActiveModel = user.into();
        active.token = Set(Some(new_token.clone()));
        active.updated_at = Set(Some(Utc::now()));

        self.user_repo.update(active).await?;

        Ok(new_token)
    }

    /// Record that the user was seen just now.
    pub async fn touch_last_active(&self, user_id: &str) -> AppResult<()> {
        let user = self.user_repo.get_by_id(user_id).await?;
        let mut active: user::ActiveModel = user.into();
        active.last_active_at = Set(Some(Utc::now()));
        self.user_repo.update(active).await?;
        Ok(())
    }

    /// Update a user.
    pub async fn update(&self, id: &str, input: UpdateUserInput) -> AppResult<user::Model> {
        input.validate()?;

        let user = self.user_repo.get_by_id(id).await?;
        let mut active: user::ActiveModel = user.into();

        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(username) = input.username {
            active.username = Set(username);
        }
        if let Some(email) = input.email {
            active.email = Set(email);
        }
        if let Some(password) = input.password {
            active.password_hash = Set(hash_password(&password)?);
        }
        if let Some(role) = input.role {
            active.role = Set(role);
        }
        if let Some(status) = input.status {
            active.status = Set(status);
        }
        if let Some(level) = input.learning_level {
            active.learning_level = Set(level);
        }
        if let Some(avatar_url) = input.avatar_url {
            active.avatar_url = Set(avatar_url);
        }

        active.updated_at = Set(Some(Utc::now()));

        let updated = self.user_repo.update(active).await?;

        self.events
            .publish(ResourceKind::User, id, EventAction::Updated);

        Ok(updated)
    }

    /// Set the verified flag. Setting an already-set flag is a no-op.
    pub async fn set_verified(&self, id: &str, value: bool) -> AppResult<user::Model> {
        let updated = self.user_repo.set_verified(id, value).await?;
        self.events
            .publish(ResourceKind::User, id, EventAction::Toggled);
        Ok(updated)
    }

    /// Set the premium flag. Setting an already-set flag is a no-op.
    pub async fn set_premium(&self, id: &str, value: bool) -> AppResult<user::Model> {
        let updated = self.user_repo.set_premium(id, value).await?;
        self.events
            .publish(ResourceKind::User, id, EventAction::Toggled);
        Ok(updated)
    }

    /// Delete a user.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.user_repo.delete(id).await?;
        self.events
            .publish(ResourceKind::User, id, EventAction::Deleted);
        Ok(())
    }

    /// Export users matching the filter as CSV.
    pub async fn export_csv(&self, filter: &UserFilter) -> AppResult<String> {
        let users = self.user_repo.list_all(filter, EXPORT_ROW_LIMIT).await?;
        Ok(render_csv(&users))
    }
}

/// Render a user list as CSV with a fixed header row.
fn render_csv(users: &[user::Model]) -> String {
    let mut out = String::from(EXPORT_HEADER);
    out.push('\n');

    for user in users {
        let last_active = user
            .last_active_at
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();

        let row = [
            escape_csv(&user.id),
            escape_csv(&user.name),
            escape_csv(&user.email),
            escape_csv(&user.status.to_value()),
            escape_csv(&user.created_at.format("%Y-%m-%d").to_string()),
            user.lessons_completed.to_string(),
            escape_csv(&last_active),
            escape_csv(&user.learning_level.to_value()),
        ];

        out.push_str(&row.join(","));
        out.push('\n');
    }

    out
}

/// Quote a CSV field when it contains a delimiter, quote or line break.
fn escape_csv(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Hash a password using Argon2.
fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against an Argon2 hash.
fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_user(id: &str, name: &str, email: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            name: name.to_string(),
            username: name.to_lowercase().replace(' ', "_"),
            email: email.to_string(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$abc$def".to_string(),
            token: Some("token123".to_string()),
            role: UserRole::User,
            status: UserStatus::Active,
            is_verified: false,
            is_premium: false,
            avatar_url: None,
            learning_level: LearningLevel::Beginner,
            lessons_completed: 0,
            last_active_at: None,
            created_at: "2025-06-01T00:00:00Z".parse().unwrap(),
            updated_at: None,
        }
    }

    fn service_with(db: sea_orm::DatabaseConnection) -> UserService {
        UserService::new(UserRepository::new(Arc::new(db)), EventBus::new())
    }

    #[test]
    fn test_hash_password() {
        let hash = hash_password("test_password_123").unwrap();
        assert!(hash.starts_with("$argon2"));
    }

    #[test]
    fn test_verify_password_correct() {
        let password = "test_password_123";
        let hash = hash_password(password).unwrap();
        assert!(verify_password(password, &hash).unwrap());
    }

    #[test]
    fn test_verify_password_incorrect() {
        let hash = hash_password("test_password_123").unwrap();
        assert!(!verify_password("wrong_password", &hash).unwrap());
    }

    #[test]
    fn test_verify_password_invalid_hash() {
        assert!(verify_password("test", "invalid_hash").is_err());
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_email() {
        let existing = create_test_user("user1", "Siti", "siti@example.com");

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[existing]])
            .into_connection();

        let service = service_with(db);

        let result = service
            .create(CreateUserInput {
                name: "Siti".to_string(),
                username: "siti".to_string(),
                email: "siti@example.com".to_string(),
                password: "password123".to_string(),
                role: None,
            })
            .await;

        assert!(matches!(result, Err(AppError::Conflict(msg)) if msg == "Email already exists"));
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_email() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = service_with(db);

        let result = service
            .create(CreateUserInput {
                name: "Budi".to_string(),
                username: "budi".to_string(),
                email: "not-an-email".to_string(),
                password: "password123".to_string(),
                role: None,
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_short_password() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = service_with(db);

        let result = service
            .create(CreateUserInput {
                name: "Budi".to_string(),
                username: "budi".to_string(),
                email: "budi@example.com".to_string(),
                password: "short".to_string(),
                role: None,
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_authenticate_unknown_email_is_unauthorized() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();

        let service = service_with(db);

        let result = service.authenticate("ghost@example.com", "whatever").await;

        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_authenticate_wrong_password_is_unauthorized() {
        let mut user = create_test_user("user1", "Siti", "siti@example.com");
        user.password_hash = hash_password("correct_password").unwrap();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[user]])
            .into_connection();

        let service = service_with(db);

        let result = service
            .authenticate("siti@example.com", "wrong_password")
            .await;

        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_authenticate_suspended_account_is_forbidden() {
        let mut user = create_test_user("user1", "Siti", "siti@example.com");
        user.password_hash = hash_password("correct_password").unwrap();
        user.status = UserStatus::Suspended;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[user]])
            .into_connection();

        let service = service_with(db);

        let result = service
            .authenticate("siti@example.com", "correct_password")
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[test]
    fn test_csv_header() {
        let csv = render_csv(&[]);
        assert_eq!(
            csv,
            "ID,Name,Email,Status,Join Date,Lessons Completed,Last Active,Learning Level\n"
        );
    }

    #[test]
    fn test_csv_row_values() {
        let mut user = create_test_user("user1", "Siti Rahma", "siti@example.com");
        user.lessons_completed = 12;
        user.learning_level = LearningLevel::Intermediate;

        let csv = render_csv(&[user]);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[1],
            "user1,Siti Rahma,siti@example.com,ACTIVE,2025-06-01,12,,Intermediate"
        );
    }

    #[test]
    fn test_csv_escapes_commas_and_quotes() {
        let mut user = create_test_user("user1", "Doe, \"Jane\"", "jane@example.com");
        user.lessons_completed = 3;

        let csv = render_csv(&[user]);
        let lines: Vec<&str> = csv.lines().collect();

        assert!(lines[1].starts_with("user1,\"Doe, \"\"Jane\"\"\",jane@example.com"));
    }

    #[tokio::test]
    async fn test_event_published_on_delete() {
        use sea_orm::MockExecResult;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let bus = EventBus::new();
        let mut rx = bus.subscribe();
        let service = UserService::new(UserRepository::new(Arc::new(db)), bus);

        service.delete("user1").await.unwrap();

        let event = rx.recv().await.unwrap();
        assert_eq!(event.resource, ResourceKind::User);
        assert_eq!(event.action, EventAction::Deleted);
    }
}
