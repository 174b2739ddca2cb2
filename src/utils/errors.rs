//! Error handling for VentyTime
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy, including the mapping
//! from domain errors to HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Main error type for the VentyTime application
#[derive(Error, Debug)]
pub enum VentyTimeError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Invalid or expired token")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("Account locked until {locked_until}")]
    AccountLocked { locked_until: chrono::DateTime<chrono::Utc> },

    #[error("User not found: {user_id}")]
    UserNotFound { user_id: i64 },

    #[error("Event not found: {event_id}")]
    EventNotFound { event_id: i64 },

    #[error("Registration not found: {registration_id}")]
    RegistrationNotFound { registration_id: i64 },

    #[error("Comment not found: {comment_id}")]
    CommentNotFound { comment_id: i64 },

    #[error("Notification not found: {notification_id}")]
    NotificationNotFound { notification_id: i64 },

    #[error("User {user_id} is already registered for event {event_id}")]
    AlreadyRegistered { event_id: i64, user_id: i64 },

    #[error("Event {event_id} has reached its maximum number of attendees")]
    EventFull { event_id: i64 },

    #[error("Event {event_id} is cancelled")]
    EventCancelled { event_id: i64 },

    #[error("Email {0} is already registered")]
    EmailTaken(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image processing error: {0}")]
    Image(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// Result type alias for VentyTime operations
pub type Result<T> = std::result::Result<T, VentyTimeError>;

impl VentyTimeError {
    /// HTTP status code this error maps to
    pub fn status_code(&self) -> StatusCode {
        match self {
            VentyTimeError::Authentication(_)
            | VentyTimeError::InvalidToken(_)
            | VentyTimeError::AccountLocked { .. } => StatusCode::UNAUTHORIZED,
            VentyTimeError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            VentyTimeError::UserNotFound { .. }
            | VentyTimeError::EventNotFound { .. }
            | VentyTimeError::RegistrationNotFound { .. }
            | VentyTimeError::CommentNotFound { .. }
            | VentyTimeError::NotificationNotFound { .. } => StatusCode::NOT_FOUND,
            VentyTimeError::AlreadyRegistered { .. }
            | VentyTimeError::EventFull { .. }
            | VentyTimeError::EmailTaken(_) => StatusCode::CONFLICT,
            VentyTimeError::InvalidInput(_)
            | VentyTimeError::EventCancelled { .. }
            | VentyTimeError::Image(_) => StatusCode::BAD_REQUEST,
            VentyTimeError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            VentyTimeError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            VentyTimeError::Database(_) => false,
            VentyTimeError::Migration(_) => false,
            VentyTimeError::Config(_) => false,
            VentyTimeError::RateLimitExceeded => true,
            VentyTimeError::Io(_) => true,
            VentyTimeError::ServiceUnavailable(_) => true,
            _ => false,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            VentyTimeError::Database(_) => ErrorSeverity::Critical,
            VentyTimeError::Migration(_) => ErrorSeverity::Critical,
            VentyTimeError::Config(_) => ErrorSeverity::Critical,
            VentyTimeError::PermissionDenied(_) => ErrorSeverity::Warning,
            VentyTimeError::Authentication(_) => ErrorSeverity::Warning,
            VentyTimeError::InvalidToken(_) => ErrorSeverity::Warning,
            VentyTimeError::AccountLocked { .. } => ErrorSeverity::Warning,
            VentyTimeError::RateLimitExceeded => ErrorSeverity::Warning,
            VentyTimeError::InvalidInput(_) => ErrorSeverity::Info,
            VentyTimeError::AlreadyRegistered { .. } => ErrorSeverity::Info,
            VentyTimeError::EventFull { .. } => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }
}

/// JSON body returned for every error response
#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for VentyTimeError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(status = %status, error = %self, "Request failed");
        } else {
            tracing::debug!(status = %status, error = %self, "Request rejected");
        }

        // Internal details stay out of the response body
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            "An internal error occurred".to_string()
        } else {
            self.to_string()
        };

        (status, Json(ErrorBody { message })).into_response()
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(
            VentyTimeError::Authentication("bad credentials".to_string()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            VentyTimeError::PermissionDenied("not the organizer".to_string()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            VentyTimeError::EventNotFound { event_id: 7 }.status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            VentyTimeError::AlreadyRegistered { event_id: 1, user_id: 2 }.status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            VentyTimeError::EventFull { event_id: 1 }.status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            VentyTimeError::InvalidInput("title is required".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            VentyTimeError::RateLimitExceeded.status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
    }

    #[test]
    fn test_severity() {
        assert_eq!(
            VentyTimeError::Config("missing jwt secret".to_string()).severity(),
            ErrorSeverity::Critical
        );
        assert_eq!(
            VentyTimeError::EventFull { event_id: 1 }.severity(),
            ErrorSeverity::Info
        );
        assert_eq!(
            VentyTimeError::RateLimitExceeded.severity(),
            ErrorSeverity::Warning
        );
    }
}
