//! Event model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub tags: Vec<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub is_online: bool,
    pub meeting_url: Option<String>,
    pub max_attendees: Option<i32>,
    pub price_cents: i64,
    pub image_url: Option<String>,
    pub allow_waitlist: bool,
    pub organizer_id: i64,
    pub is_cancelled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// An event accepts registrations and comments only while active
    pub fn is_active(&self) -> bool {
        !self.is_cancelled && self.starts_at > Utc::now()
    }
}

/// Event row joined with its current non-waitlisted attendance
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EventWithAttendance {
    #[sqlx(flatten)]
    pub event: Event,
    pub attendee_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    pub location: Option<String>,
    #[serde(default)]
    pub is_online: bool,
    pub meeting_url: Option<String>,
    pub max_attendees: Option<i32>,
    #[serde(default)]
    pub price_cents: i64,
    pub image_url: Option<String>,
    #[serde(default)]
    pub allow_waitlist: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub is_online: Option<bool>,
    pub meeting_url: Option<String>,
    pub max_attendees: Option<i32>,
    pub price_cents: Option<i64>,
    pub image_url: Option<String>,
    pub allow_waitlist: Option<bool>,
}

/// Search parameters for `GET /api/events/search`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventSearchParams {
    pub q: Option<String>,
    pub category: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// Event shape exposed over the API, with derived attendance fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDto {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub tags: Vec<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub is_online: bool,
    pub meeting_url: Option<String>,
    pub max_attendees: Option<i32>,
    pub price_cents: i64,
    pub image_url: Option<String>,
    pub allow_waitlist: bool,
    pub organizer_id: i64,
    pub is_cancelled: bool,
    pub current_participants: i64,
    pub spots_remaining: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl From<EventWithAttendance> for EventDto {
    fn from(row: EventWithAttendance) -> Self {
        let EventWithAttendance { event, attendee_count } = row;
        let spots_remaining = event
            .max_attendees
            .map(|max| (i64::from(max) - attendee_count).max(0));
        Self {
            id: event.id,
            title: event.title,
            description: event.description,
            category: event.category,
            tags: event.tags,
            starts_at: event.starts_at,
            ends_at: event.ends_at,
            location: event.location,
            is_online: event.is_online,
            meeting_url: event.meeting_url,
            max_attendees: event.max_attendees,
            price_cents: event.price_cents,
            image_url: event.image_url,
            allow_waitlist: event.allow_waitlist,
            organizer_id: event.organizer_id,
            is_cancelled: event.is_cancelled,
            current_participants: attendee_count,
            spots_remaining,
            created_at: event.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_event(starts_in: Duration, cancelled: bool) -> Event {
        Event {
            id: 1,
            title: "Swing Night".to_string(),
            description: None,
            category: "dance".to_string(),
            tags: vec![],
            starts_at: Utc::now() + starts_in,
            ends_at: None,
            location: Some("Main Hall".to_string()),
            is_online: false,
            meeting_url: None,
            max_attendees: Some(10),
            price_cents: 1500,
            image_url: None,
            allow_waitlist: false,
            organizer_id: 1,
            is_cancelled: cancelled,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_is_active() {
        assert!(sample_event(Duration::hours(1), false).is_active());
        assert!(!sample_event(Duration::hours(-1), false).is_active());
        assert!(!sample_event(Duration::hours(1), true).is_active());
    }

    #[test]
    fn test_dto_spots_remaining() {
        let dto: EventDto = EventWithAttendance {
            event: sample_event(Duration::hours(1), false),
            attendee_count: 7,
        }
        .into();
        assert_eq!(dto.current_participants, 7);
        assert_eq!(dto.spots_remaining, Some(3));
    }

    #[test]
    fn test_dto_spots_remaining_unlimited() {
        let mut event = sample_event(Duration::hours(1), false);
        event.max_attendees = None;
        let dto: EventDto = EventWithAttendance { event, attendee_count: 42 }.into();
        assert_eq!(dto.spots_remaining, None);
    }

    #[test]
    fn test_dto_spots_remaining_never_negative() {
        let dto: EventDto = EventWithAttendance {
            event: sample_event(Duration::hours(1), false),
            attendee_count: 15,
        }
        .into();
        assert_eq!(dto.spots_remaining, Some(0));
    }
}
