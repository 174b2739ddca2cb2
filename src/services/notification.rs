//! Notification service implementation
//!
//! This service persists notifications and pushes them to connected clients
//! through the hub. The persisted row is the source of truth; the push is
//! best effort and respects the recipient's push preference.

use tracing::{debug, info};
use crate::database::repositories::{NotificationRepository, UserRepository};
use crate::models::notification::{CreateNotificationRequest, Notification};
use crate::services::hub::NotificationHub;
use crate::utils::errors::{Result, VentyTimeError};
use crate::utils::helpers::{calculate_offset, clamp_page_size};

/// Notification service for creating and managing notifications
#[derive(Clone)]
pub struct NotificationService {
    notification_repository: NotificationRepository,
    user_repository: UserRepository,
    hub: NotificationHub,
}

impl NotificationService {
    /// Create a new NotificationService instance
    pub fn new(
        notification_repository: NotificationRepository,
        user_repository: UserRepository,
        hub: NotificationHub,
    ) -> Self {
        Self {
            notification_repository,
            user_repository,
            hub,
        }
    }

    /// Create a notification row and push it to the recipient if connected
    pub async fn notify(&self, request: CreateNotificationRequest) -> Result<Notification> {
        let user_id = request.user_id;
        let notification = self.notification_repository.create(request).await?;
        debug!(user_id = user_id, notification_id = notification.id, kind = %notification.kind, "Notification created");

        let push_enabled = self
            .user_repository
            .find_by_id(user_id)
            .await?
            .map(|user| user.push_notifications)
            .unwrap_or(false);

        if push_enabled {
            self.hub.publish(notification.clone()).await;
        }

        Ok(notification)
    }

    /// List a user's notifications
    pub async fn list_for_user(
        &self,
        user_id: i64,
        unread_only: bool,
        page: Option<i64>,
        page_size: Option<i64>,
    ) -> Result<Vec<Notification>> {
        let limit = clamp_page_size(page_size);
        let offset = calculate_offset(page, limit);
        self.notification_repository
            .list_for_user(user_id, unread_only, limit, offset)
            .await
    }

    /// Count unread notifications
    pub async fn unread_count(&self, user_id: i64) -> Result<i64> {
        self.notification_repository.unread_count(user_id).await
    }

    /// Mark one notification as read; only the recipient may do so
    pub async fn mark_read(&self, user_id: i64, notification_id: i64) -> Result<Notification> {
        let notification = self.owned_notification(user_id, notification_id).await?;
        self.notification_repository.mark_read(notification.id).await
    }

    /// Mark all of a user's notifications as read
    pub async fn mark_all_read(&self, user_id: i64) -> Result<u64> {
        let updated = self.notification_repository.mark_all_read(user_id).await?;
        info!(user_id = user_id, updated = updated, "Marked all notifications read");
        Ok(updated)
    }

    /// Dismiss a notification; only the recipient may do so
    pub async fn dismiss(&self, user_id: i64, notification_id: i64) -> Result<()> {
        let notification = self.owned_notification(user_id, notification_id).await?;
        self.notification_repository.dismiss(notification.id).await
    }

    async fn owned_notification(&self, user_id: i64, notification_id: i64) -> Result<Notification> {
        let notification = self
            .notification_repository
            .find_by_id(notification_id)
            .await?
            .ok_or(VentyTimeError::NotificationNotFound { notification_id })?;

        if notification.user_id != user_id {
            return Err(VentyTimeError::PermissionDenied(
                "Notification belongs to another user".to_string(),
            ));
        }

        Ok(notification)
    }
}
