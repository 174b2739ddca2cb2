//! Notification endpoints

use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use crate::handlers::AppState;
use crate::middleware::AuthContext;
use crate::models::notification::Notification;
use crate::models::response::ApiResponse;
use crate::utils::errors::Result;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/unread-count", get(unread_count))
        .route("/read-all", post(read_all))
        .route("/:id/read", post(mark_read))
        .route("/:id/dismiss", post(dismiss))
}

#[derive(Debug, Default, Deserialize)]
struct NotificationQuery {
    #[serde(default)]
    unread_only: bool,
    page: Option<i64>,
    page_size: Option<i64>,
}

#[derive(Debug, Serialize)]
struct UnreadCountResponse {
    unread: i64,
}

/// GET /api/notifications
async fn list(
    State(state): State<AppState>,
    auth: AuthContext,
    Query(query): Query<NotificationQuery>,
) -> Result<Json<Vec<Notification>>> {
    let notifications = state
        .services
        .notification_service
        .list_for_user(auth.user_id, query.unread_only, query.page, query.page_size)
        .await?;
    Ok(Json(notifications))
}

/// GET /api/notifications/unread-count
async fn unread_count(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<UnreadCountResponse>> {
    let unread = state
        .services
        .notification_service
        .unread_count(auth.user_id)
        .await?;
    Ok(Json(UnreadCountResponse { unread }))
}

/// POST /api/notifications/:id/read
async fn mark_read(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(notification_id): Path<i64>,
) -> Result<Json<Notification>> {
    let notification = state
        .services
        .notification_service
        .mark_read(auth.user_id, notification_id)
        .await?;
    Ok(Json(notification))
}

/// POST /api/notifications/read-all
async fn read_all(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<ApiResponse<u64>>> {
    let updated = state
        .services
        .notification_service
        .mark_all_read(auth.user_id)
        .await?;
    Ok(Json(ApiResponse::ok(updated)))
}

/// POST /api/notifications/:id/dismiss
async fn dismiss(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(notification_id): Path<i64>,
) -> Result<Json<ApiResponse<()>>> {
    state
        .services
        .notification_service
        .dismiss(auth.user_id, notification_id)
        .await?;
    Ok(Json(ApiResponse::message("Notification dismissed")))
}
