//! Learning content endpoints: modules and lessons.

use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, patch, post, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use lisan_common::{AppResult, PageRequest};
use lisan_core::{CreateLessonInput, CreateModuleInput, UpdateLessonInput, UpdateModuleInput};
use lisan_db::entities::learning_module::{self, DifficultyLevel};
use lisan_db::entities::lesson::{self, LessonType};
use lisan_db::repositories::LearningModuleFilter;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    extractors::{AdminUser, AuthUser},
    middleware::AppState,
    response::{ApiResponse, PaginatedResponse},
};

/// Create module router.
pub fn modules_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_modules))
        .route("/", post(create_module))
        .route("/{id}", get(get_module))
        .route("/{id}", put(update_module))
        .route("/{id}", delete(delete_module))
        .route("/{id}/published", patch(set_published))
        .route("/{id}/lessons", get(list_lessons))
        .route("/{id}/lessons", post(create_lesson))
}

/// Create lesson router (direct lesson operations).
pub fn lessons_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_lesson_flat))
        .route("/{id}", get(get_lesson))
        .route("/{id}", put(update_lesson))
        .route("/{id}", delete(delete_lesson))
}

/// Learning module response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub difficulty_level: DifficultyLevel,
    pub is_premium: bool,
    pub is_published: bool,
    pub order_index: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<learning_module::Model> for ModuleResponse {
    fn from(module: learning_module::Model) -> Self {
        Self {
            id: module.id,
            title: module.title,
            description: module.description,
            difficulty_level: module.difficulty_level,
            is_premium: module.is_premium,
            is_published: module.is_published,
            order_index: module.order_index,
            created_at: module.created_at,
            updated_at: module.updated_at,
        }
    }
}

/// Lesson response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonResponse {
    pub id: String,
    pub module_id: String,
    pub title: String,
    pub lesson_type: LessonType,
    pub content_url: Option<String>,
    pub xp_reward: i32,
    pub gesture_target: Option<String>,
    pub order_index: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<lesson::Model> for LessonResponse {
    fn from(lesson: lesson::Model) -> Self {
        Self {
            id: lesson.id,
            module_id: lesson.module_id,
            title: lesson.title,
            lesson_type: lesson.lesson_type,
            content_url: lesson.content_url,
            xp_reward: lesson.xp_reward,
            gesture_target: lesson.gesture_target,
            order_index: lesson.order_index,
            created_at: lesson.created_at,
            updated_at: lesson.updated_at,
        }
    }
}

/// List modules query.
#[derive(Debug, Deserialize)]
pub struct ListModulesQuery {
    pub search: Option<String>,
    pub difficulty: Option<DifficultyLevel>,
    pub published: Option<bool>,
}

/// List modules in display order.
async fn list_modules(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ListModulesQuery>,
    Query(page): Query<PageRequest>,
) -> AppResult<PaginatedResponse<ModuleResponse>> {
    let filter = LearningModuleFilter {
        search: query.search,
        difficulty: query.difficulty,
        published: query.published,
    };

    let result = state.learning_service.list_modules(&filter, page).await?;

    Ok(PaginatedResponse::from_page(result, ModuleResponse::from))
}

/// Get a single module.
async fn get_module(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<ModuleResponse>> {
    let module = state.learning_service.get_module(&id).await?;
    Ok(ApiResponse::ok(ModuleResponse::from(module)))
}

/// Create module (admin only).
async fn create_module(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Json(input): Json<CreateModuleInput>,
) -> AppResult<ApiResponse<ModuleResponse>> {
    info!(admin_id = %admin.id, title = %input.title, "Creating learning module");

    let created = state.learning_service.create_module(input).await?;

    Ok(ApiResponse::created(ModuleResponse::from(created)))
}

/// Update module (admin only).
async fn update_module(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateModuleInput>,
) -> AppResult<ApiResponse<ModuleResponse>> {
    info!(admin_id = %admin.id, module_id = %id, "Updating learning module");

    let updated = state.learning_service.update_module(&id, input).await?;

    Ok(ApiResponse::ok(ModuleResponse::from(updated)))
}

/// Delete module and its lessons (admin only).
async fn delete_module(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    info!(admin_id = %admin.id, module_id = %id, "Deleting learning module");

    state.learning_service.delete_module(&id).await?;

    Ok(ApiResponse::ok(()))
}

/// Single-boolean toggle request body.
#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub value: bool,
}

/// Publish or unpublish a module (admin only).
async fn set_published(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ToggleRequest>,
) -> AppResult<ApiResponse<ModuleResponse>> {
    info!(admin_id = %admin.id, module_id = %id, value = req.value, "Setting published flag");

    let updated = state
        .learning_service
        .set_module_published(&id, req.value)
        .await?;

    Ok(ApiResponse::ok(ModuleResponse::from(updated)))
}

/// List lessons of a module, in lesson order.
async fn list_lessons(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Vec<LessonResponse>>> {
    let lessons = state.learning_service.list_lessons(&id).await?;

    Ok(ApiResponse::ok(
        lessons.into_iter().map(LessonResponse::from).collect(),
    ))
}

/// Create a lesson inside a module (admin only).
async fn create_lesson(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<CreateLessonInput>,
) -> AppResult<ApiResponse<LessonResponse>> {
    info!(admin_id = %admin.id, module_id = %id, title = %input.title, "Creating lesson");

    let created = state.learning_service.create_lesson(&id, input).await?;

    Ok(ApiResponse::created(LessonResponse::from(created)))
}

/// Create-lesson body for the flat lessons collection.
#[derive(Debug, Deserialize)]
pub struct CreateLessonRequest {
    pub module_id: String,
    #[serde(flatten)]
    pub lesson: CreateLessonInput,
}

/// Create a lesson, naming its module in the body (admin only).
async fn create_lesson_flat(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Json(req): Json<CreateLessonRequest>,
) -> AppResult<ApiResponse<LessonResponse>> {
    info!(admin_id = %admin.id, module_id = %req.module_id, title = %req.lesson.title, "Creating lesson");

    let created = state
        .learning_service
        .create_lesson(&req.module_id, req.lesson)
        .await?;

    Ok(ApiResponse::created(LessonResponse::from(created)))
}

/// Get a single lesson.
async fn get_lesson(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<LessonResponse>> {
    let lesson = state.learning_service.get_lesson(&id).await?;
    Ok(ApiResponse::ok(LessonResponse::from(lesson)))
}

/// Update a lesson (admin only).
async fn update_lesson(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateLessonInput>,
) -> AppResult<ApiResponse<LessonResponse>> {
    info!(admin_id = %admin.id, lesson_id = %id, "Updating lesson");

    let updated = state.learning_service.update_lesson(&id, input).await?;

    Ok(ApiResponse::ok(LessonResponse::from(updated)))
}

/// Delete a lesson (admin only).
async fn delete_lesson(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    info!(admin_id = %admin.id, lesson_id = %id, "Deleting lesson");

    state.learning_service.delete_lesson(&id).await?;

    Ok(ApiResponse::ok(()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_lesson_response_serialization() {
        let response = LessonResponse {
            id: "lesson1".to_string(),
            module_id: "mod1".to_string(),
            title: "Praktik Huruf A".to_string(),
            lesson_type: LessonType::GesturePractice,
            content_url: None,
            xp_reward: 15,
            gesture_target: Some("A".to_string()),
            order_index: 0,
            created_at: Utc::now(),
            updated_at: None,
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"lessonType\":\"gesture_practice\""));
        assert!(json.contains("\"gestureTarget\":\"A\""));
        assert!(json.contains("\"xpReward\":15"));
    }
}
