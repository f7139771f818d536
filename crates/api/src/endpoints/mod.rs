//! API endpoints.

mod announcements;
mod auth;
mod dashboard;
mod gamification;
mod learning;
mod support;
mod users;

use axum::Router;

use crate::middleware::AppState;
use crate::sse;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/announcements", announcements::router())
        .nest("/gamification/levels", gamification::levels_router())
        .nest("/gamification/badges", gamification::badges_router())
        .nest("/learning/modules", learning::modules_router())
        .nest("/learning/lessons", learning::lessons_router())
        .nest("/support/faqs", support::faqs_router())
        .nest("/support/feedback", support::feedback_router())
        .nest("/dashboard", dashboard::router())
        .nest("/events", sse::router())
}
