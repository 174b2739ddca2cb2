//! Event registration model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Registration {
    pub id: i64,
    pub event_id: i64,
    pub user_id: i64,
    pub status: String,
    pub waitlisted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Registration {
    pub fn status(&self) -> RegistrationStatus {
        RegistrationStatus::parse(&self.status).unwrap_or(RegistrationStatus::Pending)
    }

    /// Whether the registration currently holds a seat
    pub fn holds_seat(&self) -> bool {
        !self.waitlisted && self.status() != RegistrationStatus::Cancelled
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistrationStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl RegistrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationStatus::Pending => "pending",
            RegistrationStatus::Confirmed => "confirmed",
            RegistrationStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(RegistrationStatus::Pending),
            "confirmed" => Some(RegistrationStatus::Confirmed),
            "cancelled" => Some(RegistrationStatus::Cancelled),
            _ => None,
        }
    }
}

impl std::fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registration joined with the event it belongs to, for user-facing listings
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RegistrationWithEvent {
    pub id: i64,
    pub event_id: i64,
    pub user_id: i64,
    pub status: String,
    pub waitlisted: bool,
    pub created_at: DateTime<Utc>,
    pub event_title: String,
    pub event_starts_at: DateTime<Utc>,
    pub event_is_cancelled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            RegistrationStatus::Pending,
            RegistrationStatus::Confirmed,
            RegistrationStatus::Cancelled,
        ] {
            assert_eq!(RegistrationStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(RegistrationStatus::parse("attended"), None);
    }

    #[test]
    fn test_holds_seat() {
        let registration = Registration {
            id: 1,
            event_id: 1,
            user_id: 1,
            status: "pending".to_string(),
            waitlisted: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(registration.holds_seat());

        let waitlisted = Registration { waitlisted: true, ..registration.clone() };
        assert!(!waitlisted.holds_seat());

        let cancelled = Registration {
            status: "cancelled".to_string(),
            ..registration
        };
        assert!(!cancelled.holds_seat());
    }
}
