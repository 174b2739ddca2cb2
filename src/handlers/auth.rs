//! Authentication endpoints

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use crate::handlers::AppState;
use crate::middleware::AuthContext;
use crate::models::response::{ApiResponse, AuthResponse};
use crate::models::user::{ChangePasswordRequest, LoginRequest, RegisterRequest, UserDto};
use crate::utils::errors::Result;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/change-password", post(change_password))
        .route("/me", get(me))
}

/// POST /api/auth/register
async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>> {
    let response = state.services.auth_service.register(request).await?;
    Ok(Json(response))
}

/// POST /api/auth/login
async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    // Throttle per attempted email before touching credentials
    state.login_limiter.check(&request.email)?;

    let response = state.services.auth_service.login(request).await?;
    Ok(Json(response))
}

/// POST /api/auth/change-password
async fn change_password(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<()>>> {
    state
        .services
        .auth_service
        .change_password(auth.user_id, request)
        .await?;
    Ok(Json(ApiResponse::message("Password changed")))
}

/// GET /api/auth/me
async fn me(State(state): State<AppState>, auth: AuthContext) -> Result<Json<UserDto>> {
    let user = state.services.user_service.get_profile(auth.user_id).await?;
    Ok(Json(user))
}
