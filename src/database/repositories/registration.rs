//! Registration repository implementation
//!
//! Seat-sensitive writes (registering, cancelling with waitlist promotion)
//! run inside a single transaction so the capacity check and the write see
//! the same attendance count.

use sqlx::PgPool;
use chrono::Utc;
use crate::models::event::Event;
use crate::models::registration::{Registration, RegistrationStatus, RegistrationWithEvent};
use crate::utils::errors::VentyTimeError;

const REGISTRATION_COLUMNS: &str = "id, event_id, user_id, status, waitlisted, created_at, updated_at";

const EVENT_COLUMNS: &str = "id, title, description, category, tags, starts_at, ends_at, location, is_online, meeting_url, max_attendees, price_cents, image_url, allow_waitlist, organizer_id, is_cancelled, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct RegistrationRepository {
    pool: PgPool,
}

impl RegistrationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Register a user for an event, enforcing capacity within one transaction.
    ///
    /// The event row is locked for the duration of the transaction so two
    /// concurrent registrations cannot both pass the seat count check.
    pub async fn register(&self, event_id: i64, user_id: i64) -> Result<Registration, VentyTimeError> {
        let mut tx = self.pool.begin().await?;

        let event = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1 FOR UPDATE"
        ))
        .bind(event_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(VentyTimeError::EventNotFound { event_id })?;

        if event.is_cancelled {
            return Err(VentyTimeError::EventCancelled { event_id });
        }
        if event.starts_at <= Utc::now() {
            return Err(VentyTimeError::InvalidInput(
                "Cannot register for an event that has already started".to_string(),
            ));
        }

        let existing: Option<(i64,)> = sqlx::query_as(
            "SELECT id FROM event_registrations WHERE event_id = $1 AND user_id = $2"
        )
        .bind(event_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        if existing.is_some() {
            return Err(VentyTimeError::AlreadyRegistered { event_id, user_id });
        }

        let seated: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM event_registrations WHERE event_id = $1 AND status <> 'cancelled' AND waitlisted = FALSE"
        )
        .bind(event_id)
        .fetch_one(&mut *tx)
        .await?;

        let full = event
            .max_attendees
            .map(|max| seated.0 >= i64::from(max))
            .unwrap_or(false);

        if full && !event.allow_waitlist {
            return Err(VentyTimeError::EventFull { event_id });
        }

        let registration = sqlx::query_as::<_, Registration>(&format!(
            r#"
            INSERT INTO event_registrations (event_id, user_id, status, waitlisted, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {REGISTRATION_COLUMNS}
            "#
        ))
        .bind(event_id)
        .bind(user_id)
        .bind(RegistrationStatus::Pending.as_str())
        .bind(full)
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(registration)
    }

    /// Cancel a registration. If the cancelled registration held a seat and
    /// the event accepts a waitlist, the oldest waitlisted registration is
    /// promoted into the freed seat. Returns the cancelled registration and
    /// the promoted one, if any.
    pub async fn cancel(&self, registration_id: i64) -> Result<(Registration, Option<Registration>), VentyTimeError> {
        let mut tx = self.pool.begin().await?;

        let registration = sqlx::query_as::<_, Registration>(&format!(
            "SELECT {REGISTRATION_COLUMNS} FROM event_registrations WHERE id = $1 FOR UPDATE"
        ))
        .bind(registration_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(VentyTimeError::RegistrationNotFound { registration_id })?;

        let held_seat = registration.holds_seat();

        let cancelled = sqlx::query_as::<_, Registration>(&format!(
            "UPDATE event_registrations SET status = $2, updated_at = $3 WHERE id = $1 RETURNING {REGISTRATION_COLUMNS}"
        ))
        .bind(registration_id)
        .bind(RegistrationStatus::Cancelled.as_str())
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        let mut promoted = None;
        if held_seat {
            promoted = sqlx::query_as::<_, Registration>(&format!(
                r#"
                UPDATE event_registrations
                SET waitlisted = FALSE, updated_at = $2
                WHERE id = (
                    SELECT id FROM event_registrations
                    WHERE event_id = $1 AND waitlisted = TRUE AND status <> 'cancelled'
                    ORDER BY created_at ASC
                    LIMIT 1
                    FOR UPDATE SKIP LOCKED
                )
                RETURNING {REGISTRATION_COLUMNS}
                "#
            ))
            .bind(cancelled.event_id)
            .bind(Utc::now())
            .fetch_optional(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok((cancelled, promoted))
    }

    /// Move a pending registration to confirmed
    pub async fn confirm(&self, registration_id: i64) -> Result<Registration, VentyTimeError> {
        let registration = sqlx::query_as::<_, Registration>(&format!(
            "UPDATE event_registrations SET status = $2, updated_at = $3 WHERE id = $1 RETURNING {REGISTRATION_COLUMNS}"
        ))
        .bind(registration_id)
        .bind(RegistrationStatus::Confirmed.as_str())
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?
        .ok_or(VentyTimeError::RegistrationNotFound { registration_id })?;

        Ok(registration)
    }

    /// Find registration by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Registration>, VentyTimeError> {
        let registration = sqlx::query_as::<_, Registration>(&format!(
            "SELECT {REGISTRATION_COLUMNS} FROM event_registrations WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(registration)
    }

    /// Find a user's registration for an event
    pub async fn find_by_event_and_user(&self, event_id: i64, user_id: i64) -> Result<Option<Registration>, VentyTimeError> {
        let registration = sqlx::query_as::<_, Registration>(&format!(
            "SELECT {REGISTRATION_COLUMNS} FROM event_registrations WHERE event_id = $1 AND user_id = $2"
        ))
        .bind(event_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(registration)
    }

    /// Check if user is registered for event (any non-cancelled row)
    pub async fn is_registered(&self, event_id: i64, user_id: i64) -> Result<bool, VentyTimeError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM event_registrations WHERE event_id = $1 AND user_id = $2 AND status <> 'cancelled'"
        )
        .bind(event_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0 > 0)
    }

    /// Registrations of one user, joined with event fields
    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<RegistrationWithEvent>, VentyTimeError> {
        let registrations = sqlx::query_as::<_, RegistrationWithEvent>(
            r#"
            SELECT r.id, r.event_id, r.user_id, r.status, r.waitlisted, r.created_at,
                   e.title AS event_title, e.starts_at AS event_starts_at, e.is_cancelled AS event_is_cancelled
            FROM event_registrations r
            INNER JOIN events e ON e.id = r.event_id
            WHERE r.user_id = $1
            ORDER BY e.starts_at ASC
            "#
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(registrations)
    }

    /// All registrations for an event, oldest first
    pub async fn list_for_event(&self, event_id: i64) -> Result<Vec<Registration>, VentyTimeError> {
        let registrations = sqlx::query_as::<_, Registration>(&format!(
            "SELECT {REGISTRATION_COLUMNS} FROM event_registrations WHERE event_id = $1 ORDER BY created_at ASC"
        ))
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(registrations)
    }

    /// Non-cancelled, non-waitlisted registrations currently holding seats
    pub async fn seat_count(&self, event_id: i64) -> Result<i64, VentyTimeError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM event_registrations WHERE event_id = $1 AND status <> 'cancelled' AND waitlisted = FALSE"
        )
        .bind(event_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }
}
