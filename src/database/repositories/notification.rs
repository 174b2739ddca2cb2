//! Notification repository implementation

use sqlx::PgPool;
use chrono::Utc;
use crate::models::notification::{Notification, CreateNotificationRequest};
use crate::utils::errors::VentyTimeError;

const NOTIFICATION_COLUMNS: &str = "id, user_id, title, message, kind, event_id, is_read, is_dismissed, created_at";

#[derive(Debug, Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new notification
    pub async fn create(&self, request: CreateNotificationRequest) -> Result<Notification, VentyTimeError> {
        let notification = sqlx::query_as::<_, Notification>(&format!(
            r#"
            INSERT INTO notifications (user_id, title, message, kind, event_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {NOTIFICATION_COLUMNS}
            "#
        ))
        .bind(request.user_id)
        .bind(request.title)
        .bind(request.message)
        .bind(request.kind.as_str())
        .bind(request.event_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(notification)
    }

    /// Find notification by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Notification>, VentyTimeError> {
        let notification = sqlx::query_as::<_, Notification>(&format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(notification)
    }

    /// List a user's notifications, newest first; optionally unread only.
    /// Dismissed notifications never appear.
    pub async fn list_for_user(&self, user_id: i64, unread_only: bool, limit: i64, offset: i64) -> Result<Vec<Notification>, VentyTimeError> {
        let notifications = sqlx::query_as::<_, Notification>(&format!(
            r#"
            SELECT {NOTIFICATION_COLUMNS} FROM notifications
            WHERE user_id = $1 AND is_dismissed = FALSE AND ($2 = FALSE OR is_read = FALSE)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#
        ))
        .bind(user_id)
        .bind(unread_only)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(notifications)
    }

    /// Count unread, undismissed notifications
    pub async fn unread_count(&self, user_id: i64) -> Result<i64, VentyTimeError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND is_read = FALSE AND is_dismissed = FALSE"
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }

    /// Mark a notification as read
    pub async fn mark_read(&self, id: i64) -> Result<Notification, VentyTimeError> {
        let notification = sqlx::query_as::<_, Notification>(&format!(
            "UPDATE notifications SET is_read = TRUE WHERE id = $1 RETURNING {NOTIFICATION_COLUMNS}"
        ))
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(notification)
    }

    /// Mark all of a user's notifications as read; returns affected rows
    pub async fn mark_all_read(&self, user_id: i64) -> Result<u64, VentyTimeError> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE user_id = $1 AND is_read = FALSE"
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Dismiss a notification; dismissed rows disappear from listings
    pub async fn dismiss(&self, id: i64) -> Result<(), VentyTimeError> {
        sqlx::query("UPDATE notifications SET is_dismissed = TRUE, is_read = TRUE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
