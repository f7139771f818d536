//! User management endpoints.

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    routing::{delete, get, patch, post, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use lisan_common::{AppResult, PageRequest};
use lisan_core::{CreateUserInput, UpdateUserInput};
use lisan_db::entities::user::{self, LearningLevel, UserRole, UserStatus};
use lisan_db::repositories::UserFilter;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    extractors::AdminUser,
    middleware::AppState,
    response::{ApiResponse, PaginatedResponse},
};

/// Create user router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/", post(create_user))
        .route("/export", get(export_users))
        .route("/{id}", get(get_user))
        .route("/{id}", put(update_user))
        .route("/{id}", delete(delete_user))
        .route("/{id}/verified", patch(set_verified))
        .route("/{id}/premium", patch(set_premium))
}

/// User response. Never exposes the password hash or token.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub is_verified: bool,
    pub is_premium: bool,
    pub avatar_url: Option<String>,
    pub learning_level: LearningLevel,
    pub lessons_completed: i32,
    pub last_active_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<user::Model> for UserResponse {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            name: user.name,
            username: user.username,
            email: user.email,
            role: user.role,
            status: user.status,
            is_verified: user.is_verified,
            is_premium: user.is_premium,
            avatar_url: user.avatar_url,
            learning_level: user.learning_level,
            lessons_completed: user.lessons_completed,
            last_active_at: user.last_active_at,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// List users query.
#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    pub search: Option<String>,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
}

impl ListUsersQuery {
    fn into_filter(self) -> UserFilter {
        UserFilter {
            search: self.search,
            role: self.role,
            status: self.status,
        }
    }
}

/// List users (admin only).
async fn list_users(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
    Query(page): Query<PageRequest>,
) -> AppResult<PaginatedResponse<UserResponse>> {
    let result = state
        .user_service
        .list(&query.into_filter(), page)
        .await?;

    Ok(PaginatedResponse::from_page(result, UserResponse::from))
}

/// Create user (admin only).
async fn create_user(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Json(input): Json<CreateUserInput>,
) -> AppResult<ApiResponse<UserResponse>> {
    info!(admin_id = %admin.id, email = %input.email, "Creating user");

    let created = state.user_service.create(input).await?;

    Ok(ApiResponse::created(UserResponse::from(created)))
}

/// Get a single user (admin only).
async fn get_user(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state.user_service.get(&id).await?;
    Ok(ApiResponse::ok(UserResponse::from(user)))
}

/// Update a user (admin only).
async fn update_user(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateUserInput>,
) -> AppResult<ApiResponse<UserResponse>> {
    info!(admin_id = %admin.id, user_id = %id, "Updating user");

    let updated = state.user_service.update(&id, input).await?;

    Ok(ApiResponse::ok(UserResponse::from(updated)))
}

/// Delete a user (admin only).
async fn delete_user(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    info!(admin_id = %admin.id, user_id = %id, "Deleting user");

    state.user_service.delete(&id).await?;

    Ok(ApiResponse::ok(()))
}

/// Single-boolean toggle request body.
#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub value: bool,
}

/// Set the verified flag (admin only).
async fn set_verified(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ToggleRequest>,
) -> AppResult<ApiResponse<UserResponse>> {
    info!(admin_id = %admin.id, user_id = %id, value = req.value, "Setting verified flag");

    let updated = state.user_service.set_verified(&id, req.value).await?;

    Ok(ApiResponse::ok(UserResponse::from(updated)))
}

/// Set the premium flag (admin only).
async fn set_premium(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ToggleRequest>,
) -> AppResult<ApiResponse<UserResponse>> {
    info!(admin_id = %admin.id, user_id = %id, value = req.value, "Setting premium flag");

    let updated = state.user_service.set_premium(&id, req.value).await?;

    Ok(ApiResponse::ok(UserResponse::from(updated)))
}

/// Export users as CSV (admin only). Honors the same filters as the list.
async fn export_users(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> AppResult<impl IntoResponse> {
    info!(admin_id = %admin.id, "Exporting users as CSV");

    let csv = state.user_service.export_csv(&query.into_filter()).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"users.csv\"",
            ),
        ],
        csv,
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_user_response_hides_credentials() {
        let user = user::Model {
            id: "user1".to_string(),
            name: "Siti".to_string(),
            username: "siti".to_string(),
            email: "siti@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            token: Some("secret-token".to_string()),
            role: UserRole::User,
            status: UserStatus::Active,
            is_verified: true,
            is_premium: false,
            avatar_url: None,
            learning_level: LearningLevel::Beginner,
            lessons_completed: 4,
            last_active_at: None,
            created_at: Utc::now(),
            updated_at: None,
        };

        let json = serde_json::to_string(&UserResponse::from(user)).unwrap();

        assert!(json.contains("\"email\":\"siti@example.com\""));
        assert!(json.contains("\"learningLevel\":\"Beginner\""));
        assert!(json.contains("\"status\":\"ACTIVE\""));
        assert!(!json.contains("secret"));
    }
}
