//! Lisan admin server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, middleware};
use lisan_api::{middleware::AppState, router as api_router};
use lisan_common::Config;
use lisan_core::{
    AnnouncementService, DashboardService, EventBus, GamificationService, LearningService,
    SupportService, UserService,
};
use lisan_db::repositories::{
    AnnouncementRepository, BadgeRepository, FaqRepository, FeedbackRepository,
    LearningModuleRepository, LessonRepository, LevelRepository, UserRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lisan=debug,tower_http=debug".into()),
        )
        .init();

    // Load .env if present, then configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    info!("Starting lisan server...");

    // Connect to database
    let db = lisan_db::init(&config).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    lisan_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
    let db = Arc::new(db);
    let user_repo = UserRepository::new(Arc::clone(&db));
    let announcement_repo = AnnouncementRepository::new(Arc::clone(&db));
    let level_repo = LevelRepository::new(Arc::clone(&db));
    let badge_repo = BadgeRepository::new(Arc::clone(&db));
    let module_repo = LearningModuleRepository::new(Arc::clone(&db));
    let lesson_repo = LessonRepository::new(Arc::clone(&db));
    let faq_repo = FaqRepository::new(Arc::clone(&db));
    let feedback_repo = FeedbackRepository::new(Arc::clone(&db));

    // One bus shared by every service and the SSE endpoint
    let events = EventBus::new();

    // Initialize services
    let user_service = UserService::new(user_repo.clone(), events.clone());
    let announcement_service =
        AnnouncementService::new(announcement_repo.clone(), events.clone());
    let gamification_service = GamificationService::new(level_repo, badge_repo, events.clone());
    let learning_service =
        LearningService::new(module_repo.clone(), lesson_repo.clone(), events.clone());
    let support_service = SupportService::new(faq_repo, feedback_repo.clone(), events.clone());
    let dashboard_service = DashboardService::new(
        user_repo,
        announcement_repo,
        module_repo,
        lesson_repo,
        feedback_repo,
    );

    // Create app state
    let state = AppState {
        user_service,
        announcement_service,
        gamification_service,
        learning_service,
        support_service,
        dashboard_service,
        events,
    };

    // Build router
    let app = Router::new()
        .nest("/api", api_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            lisan_api::middleware::auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
