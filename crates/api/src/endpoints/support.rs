//! Support endpoints: FAQs and feedback.

use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, patch, post, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use lisan_common::{AppResult, PageRequest};
use lisan_core::{CreateFaqInput, CreateFeedbackInput, UpdateFaqInput};
use lisan_db::entities::faq;
use lisan_db::entities::feedback::{self, FeedbackStatus};
use lisan_db::repositories::{FaqFilter, FeedbackFilter};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    extractors::{AdminUser, AuthUser, MaybeAuthUser},
    middleware::AppState,
    response::{ApiResponse, PaginatedResponse},
};

/// Create FAQ router.
pub fn faqs_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_faqs))
        .route("/", post(create_faq))
        .route("/{id}", get(get_faq))
        .route("/{id}", put(update_faq))
        .route("/{id}", delete(delete_faq))
        .route("/{id}/published", patch(set_faq_published))
}

/// Create feedback router.
pub fn feedback_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_feedback))
        .route("/", post(create_feedback))
        .route("/{id}", get(get_feedback))
        .route("/{id}", delete(delete_feedback))
        .route("/{id}/status", patch(set_feedback_status))
}

/// FAQ response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqResponse {
    pub id: String,
    pub question: String,
    pub answer: String,
    pub category: String,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<faq::Model> for FaqResponse {
    fn from(faq: faq::Model) -> Self {
        Self {
            id: faq.id,
            question: faq.question,
            answer: faq.answer,
            category: faq.category,
            is_published: faq.is_published,
            created_at: faq.created_at,
            updated_at: faq.updated_at,
        }
    }
}

/// Feedback response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackResponse {
    pub id: String,
    pub subject: String,
    pub message: String,
    pub status: FeedbackStatus,
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<feedback::Model> for FeedbackResponse {
    fn from(feedback: feedback::Model) -> Self {
        Self {
            id: feedback.id,
            subject: feedback.subject,
            message: feedback.message,
            status: feedback.status,
            user_id: feedback.user_id,
            created_at: feedback.created_at,
            updated_at: feedback.updated_at,
        }
    }
}

/// List FAQs query.
#[derive(Debug, Deserialize)]
pub struct ListFaqsQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub published: Option<bool>,
}

/// List FAQ entries.
async fn list_faqs(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ListFaqsQuery>,
    Query(page): Query<PageRequest>,
) -> AppResult<PaginatedResponse<FaqResponse>> {
    let filter = FaqFilter {
        search: query.search,
        category: query.category,
        published: query.published,
    };

    let result = state.support_service.list_faqs(&filter, page).await?;

    Ok(PaginatedResponse::from_page(result, FaqResponse::from))
}

/// Get a single FAQ entry.
async fn get_faq(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<FaqResponse>> {
    let faq = state.support_service.get_faq(&id).await?;
    Ok(ApiResponse::ok(FaqResponse::from(faq)))
}

/// Create FAQ entry (admin only).
async fn create_faq(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Json(input): Json<CreateFaqInput>,
) -> AppResult<ApiResponse<FaqResponse>> {
    info!(admin_id = %admin.id, "Creating FAQ entry");

    let created = state.support_service.create_faq(input).await?;

    Ok(ApiResponse::created(FaqResponse::from(created)))
}

/// Update FAQ entry (admin only).
async fn update_faq(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateFaqInput>,
) -> AppResult<ApiResponse<FaqResponse>> {
    info!(admin_id = %admin.id, faq_id = %id, "Updating FAQ entry");

    let updated = state.support_service.update_faq(&id, input).await?;

    Ok(ApiResponse::ok(FaqResponse::from(updated)))
}

/// Delete FAQ entry (admin only).
async fn delete_faq(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    info!(admin_id = %admin.id, faq_id = %id, "Deleting FAQ entry");

    state.support_service.delete_faq(&id).await?;

    Ok(ApiResponse::ok(()))
}

/// Single-boolean toggle request body.
#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub value: bool,
}

/// Publish or unpublish an FAQ entry (admin only).
async fn set_faq_published(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ToggleRequest>,
) -> AppResult<ApiResponse<FaqResponse>> {
    info!(admin_id = %admin.id, faq_id = %id, value = req.value, "Setting published flag");

    let updated = state
        .support_service
        .set_faq_published(&id, req.value)
        .await?;

    Ok(ApiResponse::ok(FaqResponse::from(updated)))
}

/// List feedback query.
#[derive(Debug, Deserialize)]
pub struct ListFeedbackQuery {
    pub search: Option<String>,
    pub status: Option<FeedbackStatus>,
}

/// List feedback entries (admin only).
async fn list_feedback(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Query(query): Query<ListFeedbackQuery>,
    Query(page): Query<PageRequest>,
) -> AppResult<PaginatedResponse<FeedbackResponse>> {
    let filter = FeedbackFilter {
        search: query.search,
        status: query.status,
    };

    let result = state.support_service.list_feedback(&filter, page).await?;

    Ok(PaginatedResponse::from_page(result, FeedbackResponse::from))
}

/// Get a single feedback entry (admin only).
async fn get_feedback(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<FeedbackResponse>> {
    let feedback = state.support_service.get_feedback(&id).await?;
    Ok(ApiResponse::ok(FeedbackResponse::from(feedback)))
}

/// Submit feedback. Open to visitors; the account is recorded when known.
async fn create_feedback(
    MaybeAuthUser(user): MaybeAuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateFeedbackInput>,
) -> AppResult<ApiResponse<FeedbackResponse>> {
    let user_id = user.as_ref().map(|u| u.id.as_str());

    let created = state.support_service.create_feedback(input, user_id).await?;

    Ok(ApiResponse::created(FeedbackResponse::from(created)))
}

/// Status change request body.
#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub status: FeedbackStatus,
}

/// Move a feedback entry to a new status (admin only).
async fn set_feedback_status(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SetStatusRequest>,
) -> AppResult<ApiResponse<FeedbackResponse>> {
    info!(admin_id = %admin.id, feedback_id = %id, "Setting feedback status");

    let updated = state
        .support_service
        .set_feedback_status(&id, req.status)
        .await?;

    Ok(ApiResponse::ok(FeedbackResponse::from(updated)))
}

/// Delete feedback entry (admin only).
async fn delete_feedback(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    info!(admin_id = %admin.id, feedback_id = %id, "Deleting feedback entry");

    state.support_service.delete_feedback(&id).await?;

    Ok(ApiResponse::ok(()))
}
