//! Comment endpoints

use axum::extract::{Path, Query, State};
use axum::routing::{get, put};
use axum::{Json, Router};
use crate::handlers::{AppState, Pagination};
use crate::middleware::AuthContext;
use crate::models::comment::{CommentWithAuthor, CreateCommentRequest, EventComment, UpdateCommentRequest};
use crate::models::response::ApiResponse;
use crate::utils::errors::Result;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/events/:event_id", get(list).post(create))
        .route("/:id", put(update).delete(delete))
}

/// GET /api/comments/events/:event_id
async fn list(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<CommentWithAuthor>>> {
    let comments = state
        .services
        .comment_service
        .list_for_event(event_id, pagination.page, pagination.page_size)
        .await?;
    Ok(Json(comments))
}

/// POST /api/comments/events/:event_id
async fn create(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(event_id): Path<i64>,
    Json(request): Json<CreateCommentRequest>,
) -> Result<Json<EventComment>> {
    let comment = state
        .services
        .comment_service
        .create(auth.user_id, event_id, &request.content)
        .await?;
    Ok(Json(comment))
}

/// PUT /api/comments/:id
async fn update(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(comment_id): Path<i64>,
    Json(request): Json<UpdateCommentRequest>,
) -> Result<Json<EventComment>> {
    let comment = state
        .services
        .comment_service
        .update(auth.user_id, comment_id, &request.content)
        .await?;
    Ok(Json(comment))
}

/// DELETE /api/comments/:id
async fn delete(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(comment_id): Path<i64>,
) -> Result<Json<ApiResponse<()>>> {
    state
        .services
        .comment_service
        .delete(auth.user_id, auth.role, comment_id)
        .await?;
    Ok(Json(ApiResponse::message("Comment deleted")))
}
