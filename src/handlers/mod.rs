//! HTTP handlers module
//!
//! Thin adapters between the REST surface and the service layer. Each
//! submodule owns one resource router; `router` assembles the full
//! application with its shared layers.

pub mod auth;
pub mod comments;
pub mod events;
pub mod notifications;
pub mod registrations;
pub mod upload;
pub mod users;
pub mod ws;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use crate::config::settings::Settings;
use crate::database::DatabasePool;
use crate::middleware::RateLimiter;
use crate::services::ServiceFactory;

/// Shared application state injected into every handler
#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub services: ServiceFactory,
    pub login_limiter: RateLimiter,
    pub pool: DatabasePool,
}

/// Common pagination query parameters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Pagination {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// Build the full application router
pub fn router(state: AppState) -> Router {
    let uploads_dir = state.services.image_service.directory();
    // Body limit leaves room for multipart framing around the image itself
    let upload_body_limit = state.settings.uploads.max_size_bytes + 64 * 1024;

    Router::new()
        .route("/health", get(health))
        .nest("/api/auth", auth::router())
        .nest("/api/events", events::router())
        .nest("/api/registrations", registrations::router())
        .nest("/api/users", users::router())
        .nest("/api/comments", comments::router())
        .nest("/api/notifications", notifications::router())
        .nest(
            "/api/upload",
            upload::router().layer(DefaultBodyLimit::max(upload_body_limit)),
        )
        .route("/ws/notifications", get(ws::notifications_ws))
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        .layer(cors_layer(&state.settings))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(settings: &Settings) -> CorsLayer {
    let origins: Vec<HeaderValue> = settings
        .cors
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

/// Liveness and database health probe
async fn health(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    match crate::database::health_check(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({ "status": "ok" })),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({ "status": "degraded" })),
            )
        }
    }
}
