//! Registration service implementation
//!
//! This service wraps the transactional registration writes with the
//! authorization rules and the notification fan-out around them.

use tracing::{debug, info};
use crate::database::repositories::{EventRepository, RegistrationRepository};
use crate::models::notification::{CreateNotificationRequest, NotificationKind};
use crate::models::registration::{Registration, RegistrationStatus, RegistrationWithEvent};
use crate::models::user::UserRole;
use crate::services::notification::NotificationService;
use crate::utils::errors::{Result, VentyTimeError};
use crate::utils::helpers::truncate_text;

/// Registration service for managing event registrations
#[derive(Clone)]
pub struct RegistrationService {
    registration_repository: RegistrationRepository,
    event_repository: EventRepository,
    notification_service: NotificationService,
}

impl RegistrationService {
    /// Create a new RegistrationService instance
    pub fn new(
        registration_repository: RegistrationRepository,
        event_repository: EventRepository,
        notification_service: NotificationService,
    ) -> Self {
        Self {
            registration_repository,
            event_repository,
            notification_service,
        }
    }

    /// Register the caller for an event.
    ///
    /// Capacity, duplicates and event state are enforced inside the
    /// repository transaction; this layer adds the follow-up notifications.
    pub async fn register(&self, user_id: i64, event_id: i64) -> Result<Registration> {
        debug!(user_id = user_id, event_id = event_id, "Registering for event");

        let registration = self.registration_repository.register(event_id, user_id).await?;
        info!(
            user_id = user_id,
            event_id = event_id,
            registration_id = registration.id,
            waitlisted = registration.waitlisted,
            "Registration created"
        );

        if registration.waitlisted {
            let event_title = self.event_title(event_id).await?;
            self.notification_service
                .notify(CreateNotificationRequest {
                    user_id,
                    title: "Added to waitlist".to_string(),
                    message: format!("\"{}\" is full; you are on the waitlist", event_title),
                    kind: NotificationKind::System,
                    event_id: Some(event_id),
                })
                .await?;
        }

        Ok(registration)
    }

    /// Confirm a pending registration; organizer or admin only
    pub async fn confirm(&self, actor_id: i64, actor_role: UserRole, registration_id: i64) -> Result<Registration> {
        let registration = self.existing_registration(registration_id).await?;
        self.require_event_authority(actor_id, actor_role, registration.event_id).await?;

        if registration.status() == RegistrationStatus::Cancelled {
            return Err(VentyTimeError::InvalidInput(
                "Cancelled registrations cannot be confirmed".to_string(),
            ));
        }

        let confirmed = self.registration_repository.confirm(registration_id).await?;
        info!(registration_id = registration_id, actor_id = actor_id, "Registration confirmed");

        let event_title = self.event_title(confirmed.event_id).await?;
        self.notification_service
            .notify(CreateNotificationRequest {
                user_id: confirmed.user_id,
                title: "Registration confirmed".to_string(),
                message: format!("Your spot for \"{}\" is confirmed", event_title),
                kind: NotificationKind::RegistrationConfirmed,
                event_id: Some(confirmed.event_id),
            })
            .await?;

        Ok(confirmed)
    }

    /// Cancel a registration. The registrant themselves, the event's
    /// organizer, or an admin may do so. Frees the seat for the oldest
    /// waitlisted registration, whose owner gets notified.
    pub async fn cancel(&self, actor_id: i64, actor_role: UserRole, registration_id: i64) -> Result<Registration> {
        let registration = self.existing_registration(registration_id).await?;

        if registration.user_id != actor_id {
            self.require_event_authority(actor_id, actor_role, registration.event_id).await?;
        }

        let (cancelled, promoted) = self.registration_repository.cancel(registration_id).await?;
        info!(
            registration_id = registration_id,
            actor_id = actor_id,
            promoted = promoted.is_some(),
            "Registration cancelled"
        );

        let event_title = self.event_title(cancelled.event_id).await?;

        if cancelled.user_id != actor_id {
            self.notification_service
                .notify(CreateNotificationRequest {
                    user_id: cancelled.user_id,
                    title: "Registration cancelled".to_string(),
                    message: format!("Your registration for \"{}\" was cancelled", event_title),
                    kind: NotificationKind::RegistrationCancelled,
                    event_id: Some(cancelled.event_id),
                })
                .await?;
        }

        if let Some(promoted) = promoted {
            self.notification_service
                .notify(CreateNotificationRequest {
                    user_id: promoted.user_id,
                    title: "A spot opened up".to_string(),
                    message: format!("You moved off the waitlist for \"{}\"", event_title),
                    kind: NotificationKind::System,
                    event_id: Some(promoted.event_id),
                })
                .await?;
        }

        Ok(cancelled)
    }

    /// The caller's registrations, with event fields for display
    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<RegistrationWithEvent>> {
        self.registration_repository.list_for_user(user_id).await
    }

    /// All registrations of an event; organizer or admin only
    pub async fn list_for_event(&self, actor_id: i64, actor_role: UserRole, event_id: i64) -> Result<Vec<Registration>> {
        self.require_event_authority(actor_id, actor_role, event_id).await?;
        self.registration_repository.list_for_event(event_id).await
    }

    /// Whether the user currently has a non-cancelled registration
    pub async fn is_registered(&self, user_id: i64, event_id: i64) -> Result<bool> {
        self.registration_repository.is_registered(event_id, user_id).await
    }

    async fn existing_registration(&self, registration_id: i64) -> Result<Registration> {
        self.registration_repository
            .find_by_id(registration_id)
            .await?
            .ok_or(VentyTimeError::RegistrationNotFound { registration_id })
    }

    async fn require_event_authority(&self, actor_id: i64, actor_role: UserRole, event_id: i64) -> Result<()> {
        if actor_role == UserRole::Admin {
            return Ok(());
        }

        let event = self
            .event_repository
            .find_by_id(event_id)
            .await?
            .ok_or(VentyTimeError::EventNotFound { event_id })?;

        if event.organizer_id != actor_id {
            return Err(VentyTimeError::PermissionDenied(
                "Only the organizer or an admin may manage this event's registrations".to_string(),
            ));
        }

        Ok(())
    }

    async fn event_title(&self, event_id: i64) -> Result<String> {
        let title = self
            .event_repository
            .find_by_id(event_id)
            .await?
            .map(|event| truncate_text(&event.title, 80))
            .unwrap_or_else(|| "an event".to_string());
        Ok(title)
    }
}
