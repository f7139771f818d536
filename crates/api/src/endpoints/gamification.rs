//! Gamification endpoints: levels and badges.

use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use lisan_common::{AppResult, PageRequest};
use lisan_core::{CreateBadgeInput, CreateLevelInput, UpdateBadgeInput, UpdateLevelInput};
use lisan_db::entities::badge::{self, BadgeTier};
use lisan_db::entities::level;
use lisan_db::repositories::BadgeFilter;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    extractors::{AdminUser, AuthUser},
    middleware::AppState,
    response::{ApiResponse, PaginatedResponse},
};

/// Create level router.
pub fn levels_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_levels))
        .route("/", post(create_level))
        .route("/{id}", get(get_level))
        .route("/{id}", put(update_level))
        .route("/{id}", delete(delete_level))
}

/// Create badge router.
pub fn badges_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_badges))
        .route("/", post(create_badge))
        .route("/{id}", get(get_badge))
        .route("/{id}", put(update_badge))
        .route("/{id}", delete(delete_badge))
}

/// Level response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelResponse {
    pub id: String,
    pub level_number: i32,
    pub name: String,
    pub min_score: i32,
    pub icon_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<level::Model> for LevelResponse {
    fn from(level: level::Model) -> Self {
        Self {
            id: level.id,
            level_number: level.level_number,
            name: level.name,
            min_score: level.min_score,
            icon_url: level.icon_url,
            created_at: level.created_at,
            updated_at: level.updated_at,
        }
    }
}

/// Badge response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub tier: BadgeTier,
    pub target_value: i32,
    pub activity_id: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<badge::Model> for BadgeResponse {
    fn from(badge: badge::Model) -> Self {
        Self {
            id: badge.id,
            name: badge.name,
            description: badge.description,
            tier: badge.tier,
            target_value: badge.target_value,
            activity_id: badge.activity_id,
            image_url: badge.image_url,
            created_at: badge.created_at,
            updated_at: badge.updated_at,
        }
    }
}

/// List levels, ordered by level number.
async fn list_levels(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
) -> AppResult<PaginatedResponse<LevelResponse>> {
    let result = state.gamification_service.list_levels(page).await?;
    Ok(PaginatedResponse::from_page(result, LevelResponse::from))
}

/// Get a single level.
async fn get_level(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<LevelResponse>> {
    let level = state.gamification_service.get_level(&id).await?;
    Ok(ApiResponse::ok(LevelResponse::from(level)))
}

/// Create level (admin only).
async fn create_level(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Json(input): Json<CreateLevelInput>,
) -> AppResult<ApiResponse<LevelResponse>> {
    info!(admin_id = %admin.id, level_number = input.level_number, "Creating level");

    let created = state.gamification_service.create_level(input).await?;

    Ok(ApiResponse::created(LevelResponse::from(created)))
}

/// Update level (admin only).
async fn update_level(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateLevelInput>,
) -> AppResult<ApiResponse<LevelResponse>> {
    info!(admin_id = %admin.id, level_id = %id, "Updating level");

    let updated = state.gamification_service.update_level(&id, input).await?;

    Ok(ApiResponse::ok(LevelResponse::from(updated)))
}

/// Delete level (admin only).
async fn delete_level(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    info!(admin_id = %admin.id, level_id = %id, "Deleting level");

    state.gamification_service.delete_level(&id).await?;

    Ok(ApiResponse::ok(()))
}

/// List badges query.
#[derive(Debug, Deserialize)]
pub struct ListBadgesQuery {
    pub search: Option<String>,
    pub tier: Option<BadgeTier>,
}

/// List badges with search and tier filters.
async fn list_badges(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ListBadgesQuery>,
    Query(page): Query<PageRequest>,
) -> AppResult<PaginatedResponse<BadgeResponse>> {
    let filter = BadgeFilter {
        search: query.search,
        tier: query.tier,
    };

    let result = state.gamification_service.list_badges(&filter, page).await?;

    Ok(PaginatedResponse::from_page(result, BadgeResponse::from))
}

/// Get a single badge.
async fn get_badge(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<BadgeResponse>> {
    let badge = state.gamification_service.get_badge(&id).await?;
    Ok(ApiResponse::ok(BadgeResponse::from(badge)))
}

/// Create badge (admin only).
async fn create_badge(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Json(input): Json<CreateBadgeInput>,
) -> AppResult<ApiResponse<BadgeResponse>> {
    info!(admin_id = %admin.id, name = %input.name, "Creating badge");

    let created = state.gamification_service.create_badge(input).await?;

    Ok(ApiResponse::created(BadgeResponse::from(created)))
}

/// Update badge (admin only).
async fn update_badge(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateBadgeInput>,
) -> AppResult<ApiResponse<BadgeResponse>> {
    info!(admin_id = %admin.id, badge_id = %id, "Updating badge");

    let updated = state.gamification_service.update_badge(&id, input).await?;

    Ok(ApiResponse::ok(BadgeResponse::from(updated)))
}

/// Delete badge (admin only).
async fn delete_badge(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    info!(admin_id = %admin.id, badge_id = %id, "Deleting badge");

    state.gamification_service.delete_badge(&id).await?;

    Ok(ApiResponse::ok(()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_badge_response_serialization() {
        let response = BadgeResponse {
            id: "badge1".to_string(),
            name: "Rajin Belajar".to_string(),
            description: "Selesaikan 10 pelajaran".to_string(),
            tier: BadgeTier::Gold,
            target_value: 10,
            activity_id: None,
            image_url: None,
            created_at: Utc::now(),
            updated_at: None,
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"tier\":\"gold\""));
        assert!(json.contains("\"targetValue\":10"));
    }
}
