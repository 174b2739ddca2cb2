//! Event endpoints

use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use crate::handlers::{AppState, Pagination};
use crate::middleware::AuthContext;
use crate::models::event::{CreateEventRequest, Event, EventDto, EventSearchParams, UpdateEventRequest};
use crate::models::response::ApiResponse;
use crate::utils::errors::Result;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_upcoming).post(create))
        .route("/search", get(search))
        .route("/categories", get(categories))
        .route("/mine", get(mine))
        .route("/:id", get(get_event).put(update).delete(delete_event))
        .route("/:id/cancel", post(cancel))
}

/// GET /api/events
async fn list_upcoming(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<EventDto>>> {
    let events = state
        .services
        .event_service
        .list_upcoming(pagination.page, pagination.page_size)
        .await?;
    Ok(Json(events))
}

/// GET /api/events/search
async fn search(
    State(state): State<AppState>,
    Query(params): Query<EventSearchParams>,
) -> Result<Json<Vec<EventDto>>> {
    let events = state.services.event_service.search(params).await?;
    Ok(Json(events))
}

/// GET /api/events/categories
async fn categories(State(state): State<AppState>) -> Result<Json<Vec<String>>> {
    let categories = state.services.event_service.categories().await?;
    Ok(Json(categories))
}

/// GET /api/events/mine
async fn mine(State(state): State<AppState>, auth: AuthContext) -> Result<Json<Vec<EventDto>>> {
    let events = state
        .services
        .event_service
        .list_by_organizer(auth.user_id)
        .await?;
    Ok(Json(events))
}

/// GET /api/events/:id
async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
) -> Result<Json<EventDto>> {
    let event = state.services.event_service.get_event(event_id).await?;
    Ok(Json(event))
}

/// POST /api/events
async fn create(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(request): Json<CreateEventRequest>,
) -> Result<Json<Event>> {
    let event = state
        .services
        .event_service
        .create_event(auth.user_id, auth.role, request)
        .await?;
    Ok(Json(event))
}

/// PUT /api/events/:id
async fn update(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(event_id): Path<i64>,
    Json(request): Json<UpdateEventRequest>,
) -> Result<Json<Event>> {
    let event = state
        .services
        .event_service
        .update_event(auth.user_id, auth.role, event_id, request)
        .await?;
    Ok(Json(event))
}

/// POST /api/events/:id/cancel
async fn cancel(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(event_id): Path<i64>,
) -> Result<Json<Event>> {
    let event = state
        .services
        .event_service
        .cancel_event(auth.user_id, auth.role, event_id)
        .await?;
    Ok(Json(event))
}

/// DELETE /api/events/:id
async fn delete_event(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(event_id): Path<i64>,
) -> Result<Json<ApiResponse<()>>> {
    state
        .services
        .event_service
        .delete_event(auth.user_id, auth.role, event_id)
        .await?;
    Ok(Json(ApiResponse::message("Event deleted")))
}
