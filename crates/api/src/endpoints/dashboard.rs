//! Dashboard endpoints.

use axum::{extract::State, routing::get, Router};
use lisan_common::AppResult;
use lisan_core::DashboardStats;

use crate::{extractors::AdminUser, middleware::AppState, response::ApiResponse};

/// Create dashboard router.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_stats))
}

/// Aggregate counters for the admin landing page (admin only).
async fn get_stats(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<DashboardStats>> {
    let stats = state.dashboard_service.stats().await?;
    Ok(ApiResponse::ok(stats))
}
