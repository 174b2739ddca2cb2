//! User endpoints

use axum::extract::{Path, Query, State};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::Deserialize;
use crate::handlers::{AppState, Pagination};
use crate::middleware::AuthContext;
use crate::models::user::{UpdateUserRequest, UserDto, UserRole};
use crate::utils::errors::{Result, VentyTimeError};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/me", get(me).put(update_me))
        .route("/:id", get(get_user))
        .route("/:id/role", put(set_role))
        .route("/:id/active", put(set_active))
}

#[derive(Debug, Deserialize)]
struct SetRoleRequest {
    role: String,
}

#[derive(Debug, Deserialize)]
struct SetActiveRequest {
    is_active: bool,
}

/// GET /api/users/me
async fn me(State(state): State<AppState>, auth: AuthContext) -> Result<Json<UserDto>> {
    let user = state.services.user_service.get_profile(auth.user_id).await?;
    Ok(Json(user))
}

/// PUT /api/users/me
async fn update_me(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<UserDto>> {
    let user = state
        .services
        .user_service
        .update_profile(auth.user_id, request)
        .await?;
    Ok(Json(user))
}

/// GET /api/users
async fn list(
    State(state): State<AppState>,
    auth: AuthContext,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<UserDto>>> {
    let users = state
        .services
        .user_service
        .list_users(auth.role, pagination.page, pagination.page_size)
        .await?;
    Ok(Json(users))
}

/// GET /api/users/:id
async fn get_user(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(user_id): Path<i64>,
) -> Result<Json<UserDto>> {
    let user = state
        .services
        .user_service
        .get_user(auth.user_id, auth.role, user_id)
        .await?;
    Ok(Json(user))
}

/// PUT /api/users/:id/role
async fn set_role(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(user_id): Path<i64>,
    Json(request): Json<SetRoleRequest>,
) -> Result<Json<UserDto>> {
    let role = UserRole::parse(&request.role)
        .ok_or_else(|| VentyTimeError::InvalidInput(format!("Unknown role: {}", request.role)))?;

    let user = state
        .services
        .user_service
        .set_role(auth.user_id, auth.role, user_id, role)
        .await?;
    Ok(Json(user))
}

/// PUT /api/users/:id/active
async fn set_active(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(user_id): Path<i64>,
    Json(request): Json<SetActiveRequest>,
) -> Result<Json<UserDto>> {
    let user = state
        .services
        .user_service
        .set_active(auth.user_id, auth.role, user_id, request.is_active)
        .await?;
    Ok(Json(user))
}
