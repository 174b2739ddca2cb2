//! Comment service implementation
//!
//! This service handles comment listing, creation and moderation with
//! soft deletion and author/admin ownership rules.

use tracing::{debug, info};
use crate::database::repositories::{CommentRepository, EventRepository};
use crate::models::comment::{CommentWithAuthor, EventComment};
use crate::models::notification::{CreateNotificationRequest, NotificationKind};
use crate::models::user::UserRole;
use crate::services::notification::NotificationService;
use crate::utils::errors::{Result, VentyTimeError};
use crate::utils::helpers::{calculate_offset, clamp_page_size, truncate_text};

const MAX_COMMENT_LENGTH: usize = 2000;

/// Comment service for managing event comments
#[derive(Clone)]
pub struct CommentService {
    comment_repository: CommentRepository,
    event_repository: EventRepository,
    notification_service: NotificationService,
}

impl CommentService {
    /// Create a new CommentService instance
    pub fn new(
        comment_repository: CommentRepository,
        event_repository: EventRepository,
        notification_service: NotificationService,
    ) -> Self {
        Self {
            comment_repository,
            event_repository,
            notification_service,
        }
    }

    /// Non-deleted comments for an event, newest first
    pub async fn list_for_event(
        &self,
        event_id: i64,
        page: Option<i64>,
        page_size: Option<i64>,
    ) -> Result<Vec<CommentWithAuthor>> {
        self.event_repository
            .find_by_id(event_id)
            .await?
            .ok_or(VentyTimeError::EventNotFound { event_id })?;

        let limit = clamp_page_size(page_size);
        let offset = calculate_offset(page, limit);
        self.comment_repository.list_for_event(event_id, limit, offset).await
    }

    /// Post a comment on an active event; the organizer gets notified
    pub async fn create(&self, user_id: i64, event_id: i64, content: &str) -> Result<EventComment> {
        let content = content.trim();
        if content.is_empty() {
            return Err(VentyTimeError::InvalidInput("Comment cannot be empty".to_string()));
        }
        if content.chars().count() > MAX_COMMENT_LENGTH {
            return Err(VentyTimeError::InvalidInput(format!(
                "Comment cannot exceed {} characters",
                MAX_COMMENT_LENGTH
            )));
        }

        let event = self
            .event_repository
            .find_by_id(event_id)
            .await?
            .ok_or(VentyTimeError::EventNotFound { event_id })?;

        if !event.is_active() {
            return Err(VentyTimeError::InvalidInput(
                "Comments are closed for this event".to_string(),
            ));
        }

        let comment = self.comment_repository.create(event_id, user_id, content).await?;
        debug!(comment_id = comment.id, event_id = event_id, user_id = user_id, "Comment created");

        if event.organizer_id != user_id {
            self.notification_service
                .notify(CreateNotificationRequest {
                    user_id: event.organizer_id,
                    title: "New comment".to_string(),
                    message: format!(
                        "New comment on \"{}\": {}",
                        truncate_text(&event.title, 60),
                        truncate_text(content, 120)
                    ),
                    kind: NotificationKind::NewComment,
                    event_id: Some(event_id),
                })
                .await?;
        }

        Ok(comment)
    }

    /// Edit a comment; only its author may do so
    pub async fn update(&self, actor_id: i64, comment_id: i64, content: &str) -> Result<EventComment> {
        let content = content.trim();
        if content.is_empty() {
            return Err(VentyTimeError::InvalidInput("Comment cannot be empty".to_string()));
        }
        if content.chars().count() > MAX_COMMENT_LENGTH {
            return Err(VentyTimeError::InvalidInput(format!(
                "Comment cannot exceed {} characters",
                MAX_COMMENT_LENGTH
            )));
        }

        let comment = self.existing_comment(comment_id).await?;
        if comment.user_id != actor_id {
            return Err(VentyTimeError::PermissionDenied(
                "Only the author may edit a comment".to_string(),
            ));
        }

        let updated = self.comment_repository.update_content(comment_id, content).await?;
        info!(comment_id = comment_id, actor_id = actor_id, "Comment updated");
        Ok(updated)
    }

    /// Remove a comment; its author or an admin may do so
    pub async fn delete(&self, actor_id: i64, actor_role: UserRole, comment_id: i64) -> Result<()> {
        let comment = self.existing_comment(comment_id).await?;

        if comment.user_id != actor_id && actor_role != UserRole::Admin {
            return Err(VentyTimeError::PermissionDenied(
                "Only the author or an admin may delete a comment".to_string(),
            ));
        }

        self.comment_repository.soft_delete(comment_id).await?;
        info!(comment_id = comment_id, actor_id = actor_id, "Comment deleted");
        Ok(())
    }

    async fn existing_comment(&self, comment_id: i64) -> Result<EventComment> {
        let comment = self
            .comment_repository
            .find_by_id(comment_id)
            .await?
            .ok_or(VentyTimeError::CommentNotFound { comment_id })?;

        if comment.is_deleted {
            return Err(VentyTimeError::CommentNotFound { comment_id });
        }

        Ok(comment)
    }
}
