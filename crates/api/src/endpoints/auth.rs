//! Authentication endpoints.

use axum::{extract::State, routing::get, routing::post, Json, Router};
use lisan_common::AppResult;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    endpoints::users::UserResponse,
    extractors::AuthUser,
    middleware::AppState,
    response::ApiResponse,
};

/// Create auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signin", post(signin))
        .route("/signout", post(signout))
        .route("/regenerate-token", post(regenerate_token))
        .route("/me", get(me))
}

/// Signin request.
#[derive(Debug, Deserialize)]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}

/// Signin response.
#[derive(Debug, Serialize)]
pub struct SigninResponse {
    pub token: String,
    pub user: UserResponse,
}

/// Sign in with email and password.
async fn signin(
    State(state): State<AppState>,
    Json(req): Json<SigninRequest>,
) -> AppResult<ApiResponse<SigninResponse>> {
    let user = state
        .user_service
        .authenticate(&req.email, &req.password)
        .await?;

    // Accounts created before token issuance get one on first signin.
    let token = match &user.token {
        Some(token) => token.clone(),
        None => state.user_service.regenerate_token(&user.id).await?,
    };

    state.user_service.touch_last_active(&user.id).await?;

    info!(user_id = %user.id, "User signed in");

    Ok(ApiResponse::ok(SigninResponse {
        token,
        user: UserResponse::from(user),
    }))
}

/// Sign out. Rotates the token so the presented one stops working.
async fn signout(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<()>> {
    state.user_service.regenerate_token(&user.id).await?;

    info!(user_id = %user.id, "User signed out");

    Ok(ApiResponse::ok(()))
}

/// Token response.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Issue a fresh token, invalidating the current one.
async fn regenerate_token(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<TokenResponse>> {
    let token = state.user_service.regenerate_token(&user.id).await?;

    info!(user_id = %user.id, "Token regenerated");

    Ok(ApiResponse::ok(TokenResponse { token }))
}

/// Current authenticated user.
async fn me(AuthUser(user): AuthUser) -> ApiResponse<UserResponse> {
    ApiResponse::ok(UserResponse::from(user))
}
