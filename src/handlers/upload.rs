//! Image upload endpoint

use axum::extract::{Multipart, State};
use axum::routing::post;
use axum::{Json, Router};
use crate::handlers::AppState;
use crate::middleware::AuthContext;
use crate::models::response::UploadResponse;
use crate::utils::errors::{Result, VentyTimeError};

pub fn router() -> Router<AppState> {
    Router::new().route("/image", post(upload_image))
}

/// POST /api/upload/image
///
/// Accepts a single multipart field named `file`. Returns the URL of the
/// stored image and its thumbnail.
async fn upload_image(
    State(state): State<AppState>,
    auth: AuthContext,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| VentyTimeError::InvalidInput(format!("Malformed multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .file_name()
            .map(ToString::to_string)
            .ok_or_else(|| VentyTimeError::InvalidInput("Missing file name".to_string()))?;

        let bytes = field
            .bytes()
            .await
            .map_err(|e| VentyTimeError::InvalidInput(format!("Could not read upload: {}", e)))?;

        tracing::debug!(user_id = auth.user_id, filename = %filename, size = bytes.len(), "Image upload received");

        let response = state
            .services
            .image_service
            .store(&filename, bytes.to_vec())
            .await?;
        return Ok(Json(response));
    }

    Err(VentyTimeError::InvalidInput(
        "Multipart field \"file\" is required".to_string(),
    ))
}
