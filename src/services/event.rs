//! Event service implementation
//!
//! This service handles event creation, discovery, updates, cancellation
//! and the notification fan-out those operations trigger.

use tracing::{debug, info};
use crate::config::settings::Settings;
use crate::database::repositories::{EventRepository, RegistrationRepository};
use crate::models::event::{CreateEventRequest, Event, EventDto, EventSearchParams, UpdateEventRequest};
use crate::models::notification::{CreateNotificationRequest, NotificationKind};
use crate::models::user::UserRole;
use crate::services::notification::NotificationService;
use crate::utils::errors::{Result, VentyTimeError};
use crate::utils::helpers::{calculate_offset, clamp_page_size, normalize_tags, truncate_text};

/// Event service for managing event operations
#[derive(Clone)]
pub struct EventService {
    event_repository: EventRepository,
    registration_repository: RegistrationRepository,
    notification_service: NotificationService,
    settings: Settings,
}

impl EventService {
    /// Create a new EventService instance
    pub fn new(
        event_repository: EventRepository,
        registration_repository: RegistrationRepository,
        notification_service: NotificationService,
        settings: Settings,
    ) -> Self {
        Self {
            event_repository,
            registration_repository,
            notification_service,
            settings,
        }
    }

    /// Create a new event owned by the caller
    pub async fn create_event(&self, organizer_id: i64, role: UserRole, mut request: CreateEventRequest) -> Result<Event> {
        if !self.settings.features.open_event_creation
            && role != UserRole::Organizer
            && role != UserRole::Admin
        {
            return Err(VentyTimeError::PermissionDenied(
                "Event creation requires the organizer role".to_string(),
            ));
        }

        Self::validate_event_fields(&request)?;
        request.tags = normalize_tags(&request.tags);

        let event = self.event_repository.create(organizer_id, request).await?;
        info!(event_id = event.id, organizer_id = organizer_id, title = %event.title, "Event created");

        Ok(event)
    }

    /// Get a single event with its attendance
    pub async fn get_event(&self, event_id: i64) -> Result<EventDto> {
        let event = self
            .event_repository
            .find_with_attendance(event_id)
            .await?
            .ok_or(VentyTimeError::EventNotFound { event_id })?;

        Ok(event.into())
    }

    /// Upcoming events, paged
    pub async fn list_upcoming(&self, page: Option<i64>, page_size: Option<i64>) -> Result<Vec<EventDto>> {
        let limit = clamp_page_size(page_size);
        let offset = calculate_offset(page, limit);
        let events = self.event_repository.list_upcoming(limit, offset).await?;
        Ok(events.into_iter().map(Into::into).collect())
    }

    /// Search events by text, category and date window
    pub async fn search(&self, params: EventSearchParams) -> Result<Vec<EventDto>> {
        let limit = clamp_page_size(params.page_size);
        let offset = calculate_offset(params.page, limit);
        debug!(q = ?params.q, category = ?params.category, "Searching events");

        let events = self.event_repository.search(&params, limit, offset).await?;
        Ok(events.into_iter().map(Into::into).collect())
    }

    /// Events created by one organizer
    pub async fn list_by_organizer(&self, organizer_id: i64) -> Result<Vec<EventDto>> {
        let events = self.event_repository.list_by_organizer(organizer_id).await?;
        Ok(events.into_iter().map(Into::into).collect())
    }

    /// Distinct categories of live events
    pub async fn categories(&self) -> Result<Vec<String>> {
        self.event_repository.categories().await
    }

    /// Update an event; only its organizer or an admin may do so.
    /// Seated registrants are told about the change.
    pub async fn update_event(
        &self,
        actor_id: i64,
        actor_role: UserRole,
        event_id: i64,
        mut request: UpdateEventRequest,
    ) -> Result<Event> {
        let event = self.owned_event(actor_id, actor_role, event_id).await?;

        if event.is_cancelled {
            return Err(VentyTimeError::EventCancelled { event_id });
        }
        if let Some(title) = &request.title {
            if title.trim().is_empty() {
                return Err(VentyTimeError::InvalidInput("Title cannot be empty".to_string()));
            }
        }
        if let Some(tags) = request.tags.take() {
            request.tags = Some(normalize_tags(&tags));
        }

        let updated = self.event_repository.update(event_id, request).await?;
        info!(event_id = event_id, actor_id = actor_id, "Event updated");

        self.notify_registrants(
            &updated,
            NotificationKind::EventUpdated,
            "Event updated",
            &format!("\"{}\" has been updated by the organizer", truncate_text(&updated.title, 80)),
        )
        .await?;

        Ok(updated)
    }

    /// Cancel an event and notify everyone still registered
    pub async fn cancel_event(&self, actor_id: i64, actor_role: UserRole, event_id: i64) -> Result<Event> {
        let event = self.owned_event(actor_id, actor_role, event_id).await?;

        if event.is_cancelled {
            return Err(VentyTimeError::EventCancelled { event_id });
        }

        let cancelled = self.event_repository.cancel(event_id).await?;
        info!(event_id = event_id, actor_id = actor_id, "Event cancelled");

        self.notify_registrants(
            &cancelled,
            NotificationKind::EventCancelled,
            "Event cancelled",
            &format!("\"{}\" has been cancelled", truncate_text(&cancelled.title, 80)),
        )
        .await?;

        Ok(cancelled)
    }

    /// Hard-delete an event; only allowed while nobody is registered
    pub async fn delete_event(&self, actor_id: i64, actor_role: UserRole, event_id: i64) -> Result<()> {
        self.owned_event(actor_id, actor_role, event_id).await?;

        let registrations = self.registration_repository.list_for_event(event_id).await?;
        let has_active = registrations.iter().any(|r| r.status() != crate::models::registration::RegistrationStatus::Cancelled);
        if has_active {
            return Err(VentyTimeError::InvalidInput(
                "Event has active registrations; cancel it instead".to_string(),
            ));
        }

        self.event_repository.delete(event_id).await?;
        info!(event_id = event_id, actor_id = actor_id, "Event deleted");
        Ok(())
    }

    /// Fetch the event and enforce the ownership rule
    async fn owned_event(&self, actor_id: i64, actor_role: UserRole, event_id: i64) -> Result<Event> {
        let event = self
            .event_repository
            .find_by_id(event_id)
            .await?
            .ok_or(VentyTimeError::EventNotFound { event_id })?;

        if event.organizer_id != actor_id && actor_role != UserRole::Admin {
            return Err(VentyTimeError::PermissionDenied(
                "Only the organizer or an admin may modify this event".to_string(),
            ));
        }

        Ok(event)
    }

    async fn notify_registrants(
        &self,
        event: &Event,
        kind: NotificationKind,
        title: &str,
        message: &str,
    ) -> Result<()> {
        let registrations = self.registration_repository.list_for_event(event.id).await?;

        for registration in registrations {
            if registration.status() == crate::models::registration::RegistrationStatus::Cancelled {
                continue;
            }
            self.notification_service
                .notify(CreateNotificationRequest {
                    user_id: registration.user_id,
                    title: title.to_string(),
                    message: message.to_string(),
                    kind,
                    event_id: Some(event.id),
                })
                .await?;
        }

        Ok(())
    }

    fn validate_event_fields(request: &CreateEventRequest) -> Result<()> {
        if request.title.trim().is_empty() {
            return Err(VentyTimeError::InvalidInput("Title is required".to_string()));
        }
        if request.starts_at <= chrono::Utc::now() {
            return Err(VentyTimeError::InvalidInput("Event must start in the future".to_string()));
        }
        if let Some(ends_at) = request.ends_at {
            if ends_at < request.starts_at {
                return Err(VentyTimeError::InvalidInput("Event cannot end before it starts".to_string()));
            }
        }
        if request.is_online && request.meeting_url.as_deref().map_or(true, str::is_empty) {
            return Err(VentyTimeError::InvalidInput(
                "Online events require a meeting URL".to_string(),
            ));
        }
        if !request.is_online && request.location.as_deref().map_or(true, str::is_empty) {
            return Err(VentyTimeError::InvalidInput(
                "In-person events require a location".to_string(),
            ));
        }
        if let Some(max) = request.max_attendees {
            if max <= 0 {
                return Err(VentyTimeError::InvalidInput(
                    "Maximum attendees must be positive".to_string(),
                ));
            }
        }
        if request.price_cents < 0 {
            return Err(VentyTimeError::InvalidInput("Price cannot be negative".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn valid_request() -> CreateEventRequest {
        CreateEventRequest {
            title: "Lindy Hop Social".to_string(),
            description: Some("Weekly social".to_string()),
            category: Some("dance".to_string()),
            tags: vec!["Swing".to_string()],
            starts_at: Utc::now() + Duration::days(7),
            ends_at: None,
            location: Some("Main Hall".to_string()),
            is_online: false,
            meeting_url: None,
            max_attendees: Some(40),
            price_cents: 1000,
            image_url: None,
            allow_waitlist: true,
        }
    }

    #[test]
    fn test_validate_accepts_valid_request() {
        assert!(EventService::validate_event_fields(&valid_request()).is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_title() {
        let mut request = valid_request();
        request.title = "   ".to_string();
        assert!(EventService::validate_event_fields(&request).is_err());
    }

    #[test]
    fn test_validate_rejects_past_start() {
        let mut request = valid_request();
        request.starts_at = Utc::now() - Duration::hours(1);
        assert!(EventService::validate_event_fields(&request).is_err());
    }

    #[test]
    fn test_validate_rejects_end_before_start() {
        let mut request = valid_request();
        request.ends_at = Some(request.starts_at - Duration::hours(2));
        assert!(EventService::validate_event_fields(&request).is_err());
    }

    #[test]
    fn test_validate_online_requires_meeting_url() {
        let mut request = valid_request();
        request.is_online = true;
        request.meeting_url = None;
        assert!(EventService::validate_event_fields(&request).is_err());

        request.meeting_url = Some("https://meet.example.com/room".to_string());
        assert!(EventService::validate_event_fields(&request).is_ok());
    }

    #[test]
    fn test_validate_offline_requires_location() {
        let mut request = valid_request();
        request.location = None;
        assert!(EventService::validate_event_fields(&request).is_err());
    }

    #[test]
    fn test_validate_rejects_nonpositive_capacity() {
        let mut request = valid_request();
        request.max_attendees = Some(0);
        assert!(EventService::validate_event_fields(&request).is_err());
    }
}
