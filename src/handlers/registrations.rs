//! Registration endpoints

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use crate::handlers::AppState;
use crate::middleware::AuthContext;
use crate::models::registration::{Registration, RegistrationWithEvent};
use crate::utils::errors::Result;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/mine", get(mine))
        .route("/events/:event_id", post(register).get(list_for_event))
        .route("/events/:event_id/me", get(registration_status))
        .route("/:id/confirm", post(confirm))
        .route("/:id/cancel", post(cancel))
}

#[derive(Debug, Serialize)]
struct RegistrationStatusResponse {
    registered: bool,
}

/// POST /api/registrations/events/:event_id
async fn register(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(event_id): Path<i64>,
) -> Result<Json<Registration>> {
    let registration = state
        .services
        .registration_service
        .register(auth.user_id, event_id)
        .await?;
    Ok(Json(registration))
}

/// GET /api/registrations/mine
async fn mine(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<Vec<RegistrationWithEvent>>> {
    let registrations = state
        .services
        .registration_service
        .list_for_user(auth.user_id)
        .await?;
    Ok(Json(registrations))
}

/// GET /api/registrations/events/:event_id
async fn list_for_event(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(event_id): Path<i64>,
) -> Result<Json<Vec<Registration>>> {
    let registrations = state
        .services
        .registration_service
        .list_for_event(auth.user_id, auth.role, event_id)
        .await?;
    Ok(Json(registrations))
}

/// GET /api/registrations/events/:event_id/me
async fn registration_status(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(event_id): Path<i64>,
) -> Result<Json<RegistrationStatusResponse>> {
    let registered = state
        .services
        .registration_service
        .is_registered(auth.user_id, event_id)
        .await?;
    Ok(Json(RegistrationStatusResponse { registered }))
}

/// POST /api/registrations/:id/confirm
async fn confirm(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(registration_id): Path<i64>,
) -> Result<Json<Registration>> {
    let registration = state
        .services
        .registration_service
        .confirm(auth.user_id, auth.role, registration_id)
        .await?;
    Ok(Json(registration))
}

/// POST /api/registrations/:id/cancel
async fn cancel(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(registration_id): Path<i64>,
) -> Result<Json<Registration>> {
    let registration = state
        .services
        .registration_service
        .cancel(auth.user_id, auth.role, registration_id)
        .await?;
    Ok(Json(registration))
}
