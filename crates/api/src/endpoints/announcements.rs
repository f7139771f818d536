//! Announcement endpoints.

use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, patch, post, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use lisan_common::AppResult;
use lisan_common::PageRequest;
use lisan_core::{CreateAnnouncementInput, UpdateAnnouncementInput};
use lisan_db::entities::announcement::{self, AnnouncementCategory};
use lisan_db::repositories::AnnouncementFilter;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    extractors::{AdminUser, AuthUser},
    middleware::AppState,
    response::{ApiResponse, PaginatedResponse},
};

/// Create announcement router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_announcements))
        .route("/", post(create_announcement))
        .route("/{id}", get(get_announcement))
        .route("/{id}", put(update_announcement))
        .route("/{id}", delete(delete_announcement))
        .route("/{id}/pinned", patch(set_pinned))
        .route("/{id}/active", patch(set_active))
}

/// Announcement response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementResponse {
    pub id: String,
    pub title: String,
    pub content: String,
    pub category: AnnouncementCategory,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub is_pinned: bool,
    pub is_active: bool,
    pub publish_at: DateTime<Utc>,
    pub created_by_id: Option<String>,
    pub created_by_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<announcement::Model> for AnnouncementResponse {
    fn from(announcement: announcement::Model) -> Self {
        Self {
            id: announcement.id,
            title: announcement.title,
            content: announcement.content,
            category: announcement.category,
            image_url: announcement.image_url,
            video_url: announcement.video_url,
            is_pinned: announcement.is_pinned,
            is_active: announcement.is_active,
            publish_at: announcement.publish_at,
            created_by_id: announcement.created_by_id,
            created_by_name: announcement.created_by_name,
            created_at: announcement.created_at,
            updated_at: announcement.updated_at,
        }
    }
}

/// List announcements query.
#[derive(Debug, Deserialize)]
pub struct ListAnnouncementsQuery {
    pub search: Option<String>,
    pub category: Option<AnnouncementCategory>,
    pub active: Option<bool>,
}

/// List announcements. Pinned entries sort first.
async fn list_announcements(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ListAnnouncementsQuery>,
    Query(page): Query<PageRequest>,
) -> AppResult<PaginatedResponse<AnnouncementResponse>> {
    let filter = AnnouncementFilter {
        search: query.search,
        category: query.category,
        active: query.active,
    };

    let result = state.announcement_service.list(&filter, page).await?;

    Ok(PaginatedResponse::from_page(
        result,
        AnnouncementResponse::from,
    ))
}

/// Get a single announcement.
async fn get_announcement(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<AnnouncementResponse>> {
    let announcement = state.announcement_service.get(&id).await?;
    Ok(ApiResponse::ok(AnnouncementResponse::from(announcement)))
}

/// Create announcement (admin only).
async fn create_announcement(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Json(input): Json<CreateAnnouncementInput>,
) -> AppResult<ApiResponse<AnnouncementResponse>> {
    info!(admin_id = %admin.id, title = %input.title, "Creating announcement");

    let created = state.announcement_service.create(input, &admin).await?;

    Ok(ApiResponse::created(AnnouncementResponse::from(created)))
}

/// Update announcement (admin only).
async fn update_announcement(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateAnnouncementInput>,
) -> AppResult<ApiResponse<AnnouncementResponse>> {
    info!(admin_id = %admin.id, announcement_id = %id, "Updating announcement");

    let updated = state.announcement_service.update(&id, input).await?;

    Ok(ApiResponse::ok(AnnouncementResponse::from(updated)))
}

/// Delete announcement (admin only).
async fn delete_announcement(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    info!(admin_id = %admin.id, announcement_id = %id, "Deleting announcement");

    state.announcement_service.delete(&id).await?;

    Ok(ApiResponse::ok(()))
}

/// Single-boolean toggle request body.
#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub value: bool,
}

/// Pin or unpin an announcement (admin only).
async fn set_pinned(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ToggleRequest>,
) -> AppResult<ApiResponse<AnnouncementResponse>> {
    info!(admin_id = %admin.id, announcement_id = %id, value = req.value, "Setting pinned flag");

    let updated = state.announcement_service.set_pinned(&id, req.value).await?;

    Ok(ApiResponse::ok(AnnouncementResponse::from(updated)))
}

/// Activate or deactivate an announcement (admin only).
async fn set_active(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ToggleRequest>,
) -> AppResult<ApiResponse<AnnouncementResponse>> {
    info!(admin_id = %admin.id, announcement_id = %id, value = req.value, "Setting active flag");

    let updated = state.announcement_service.set_active(&id, req.value).await?;

    Ok(ApiResponse::ok(AnnouncementResponse::from(updated)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_announcement_response_serialization() {
        let response = AnnouncementResponse {
            id: "ann1".to_string(),
            title: "Fitur baru".to_string(),
            content: "Modul alfabet sudah tersedia".to_string(),
            category: AnnouncementCategory::Content,
            image_url: None,
            video_url: None,
            is_pinned: true,
            is_active: true,
            publish_at: Utc::now(),
            created_by_id: Some("admin1".to_string()),
            created_by_name: "Admin".to_string(),
            created_at: Utc::now(),
            updated_at: None,
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"title\":\"Fitur baru\""));
        assert!(json.contains("\"isPinned\":true"));
        assert!(json.contains("\"category\":\"content\""));
    }
}
