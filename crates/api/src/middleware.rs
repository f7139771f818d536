//! API middleware.

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use lisan_core::{
    AnnouncementService, DashboardService, EventBus, GamificationService, LearningService,
    SupportService, UserService,
};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub announcement_service: AnnouncementService,
    pub gamification_service: GamificationService,
    pub learning_service: LearningService,
    pub support_service: SupportService,
    pub dashboard_service: DashboardService,
    pub events: EventBus,
}

/// Authentication middleware.
///
/// Resolves the bearer token to a user and stashes it in request
/// extensions. Endpoints decide whether authentication is required.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
        && let Ok(user) = state.user_service.authenticate_by_token(token).await
    {
        req.extensions_mut().insert(user);
    }

    next.run(req).await
}
