//! Event repository implementation

use sqlx::PgPool;
use chrono::Utc;
use crate::models::event::{Event, EventWithAttendance, CreateEventRequest, UpdateEventRequest, EventSearchParams};
use crate::utils::errors::VentyTimeError;

const EVENT_COLUMNS: &str = "id, title, description, category, tags, starts_at, ends_at, location, is_online, meeting_url, max_attendees, price_cents, image_url, allow_waitlist, organizer_id, is_cancelled, created_at, updated_at";

// Prefixed column list plus the seat count for joined listings
const EVENT_WITH_ATTENDANCE: &str = r#"
    e.id, e.title, e.description, e.category, e.tags, e.starts_at, e.ends_at, e.location,
    e.is_online, e.meeting_url, e.max_attendees, e.price_cents, e.image_url, e.allow_waitlist,
    e.organizer_id, e.is_cancelled, e.created_at, e.updated_at,
    COALESCE(r.cnt, 0) AS attendee_count
    FROM events e
    LEFT JOIN (
        SELECT event_id, COUNT(*) AS cnt
        FROM event_registrations
        WHERE status <> 'cancelled' AND waitlisted = FALSE
        GROUP BY event_id
    ) r ON r.event_id = e.id
"#;

#[derive(Debug, Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new event
    pub async fn create(&self, organizer_id: i64, request: CreateEventRequest) -> Result<Event, VentyTimeError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            INSERT INTO events (title, description, category, tags, starts_at, ends_at, location, is_online, meeting_url, max_attendees, price_cents, image_url, allow_waitlist, organizer_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(request.title)
        .bind(request.description)
        .bind(request.category.unwrap_or_else(|| "general".to_string()))
        .bind(request.tags)
        .bind(request.starts_at)
        .bind(request.ends_at)
        .bind(request.location)
        .bind(request.is_online)
        .bind(request.meeting_url)
        .bind(request.max_attendees)
        .bind(request.price_cents)
        .bind(request.image_url)
        .bind(request.allow_waitlist)
        .bind(organizer_id)
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    /// Find event by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Event>, VentyTimeError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    /// Find event by ID together with its current attendance
    pub async fn find_with_attendance(&self, id: i64) -> Result<Option<EventWithAttendance>, VentyTimeError> {
        let event = sqlx::query_as::<_, EventWithAttendance>(&format!(
            "SELECT {EVENT_WITH_ATTENDANCE} WHERE e.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    /// Update event
    pub async fn update(&self, id: i64, request: UpdateEventRequest) -> Result<Event, VentyTimeError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            UPDATE events
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                category = COALESCE($4, category),
                tags = COALESCE($5, tags),
                starts_at = COALESCE($6, starts_at),
                ends_at = COALESCE($7, ends_at),
                location = COALESCE($8, location),
                is_online = COALESCE($9, is_online),
                meeting_url = COALESCE($10, meeting_url),
                max_attendees = COALESCE($11, max_attendees),
                price_cents = COALESCE($12, price_cents),
                image_url = COALESCE($13, image_url),
                allow_waitlist = COALESCE($14, allow_waitlist),
                updated_at = $15
            WHERE id = $1
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(request.title)
        .bind(request.description)
        .bind(request.category)
        .bind(request.tags)
        .bind(request.starts_at)
        .bind(request.ends_at)
        .bind(request.location)
        .bind(request.is_online)
        .bind(request.meeting_url)
        .bind(request.max_attendees)
        .bind(request.price_cents)
        .bind(request.image_url)
        .bind(request.allow_waitlist)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    /// Mark an event as cancelled
    pub async fn cancel(&self, id: i64) -> Result<Event, VentyTimeError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "UPDATE events SET is_cancelled = TRUE, updated_at = $2 WHERE id = $1 RETURNING {EVENT_COLUMNS}"
        ))
        .bind(id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    /// Delete event
    pub async fn delete(&self, id: i64) -> Result<(), VentyTimeError> {
        sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Get upcoming non-cancelled events with attendance, paged
    pub async fn list_upcoming(&self, limit: i64, offset: i64) -> Result<Vec<EventWithAttendance>, VentyTimeError> {
        let events = sqlx::query_as::<_, EventWithAttendance>(&format!(
            "SELECT {EVENT_WITH_ATTENDANCE} WHERE e.starts_at > NOW() AND e.is_cancelled = FALSE ORDER BY e.starts_at ASC LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// Search events by free text, category and date window
    pub async fn search(&self, params: &EventSearchParams, limit: i64, offset: i64) -> Result<Vec<EventWithAttendance>, VentyTimeError> {
        let pattern = params.q.as_ref().map(|q| format!("%{}%", q));

        let events = sqlx::query_as::<_, EventWithAttendance>(&format!(
            r#"
            SELECT {EVENT_WITH_ATTENDANCE}
            WHERE e.is_cancelled = FALSE
              AND ($1::text IS NULL OR e.title ILIKE $1 OR e.description ILIKE $1 OR e.location ILIKE $1)
              AND ($2::text IS NULL OR e.category = $2)
              AND ($3::timestamptz IS NULL OR e.starts_at >= $3)
              AND ($4::timestamptz IS NULL OR e.starts_at <= $4)
            ORDER BY e.starts_at ASC
            LIMIT $5 OFFSET $6
            "#
        ))
        .bind(pattern)
        .bind(params.category.clone())
        .bind(params.from)
        .bind(params.to)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// Get events created by an organizer
    pub async fn list_by_organizer(&self, organizer_id: i64) -> Result<Vec<EventWithAttendance>, VentyTimeError> {
        let events = sqlx::query_as::<_, EventWithAttendance>(&format!(
            "SELECT {EVENT_WITH_ATTENDANCE} WHERE e.organizer_id = $1 ORDER BY e.starts_at ASC"
        ))
        .bind(organizer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// Distinct categories of non-cancelled events
    pub async fn categories(&self) -> Result<Vec<String>, VentyTimeError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT DISTINCT category FROM events WHERE is_cancelled = FALSE ORDER BY category ASC"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(c,)| c).collect())
    }

    /// Count total events
    pub async fn count(&self) -> Result<i64, VentyTimeError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM events")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}
