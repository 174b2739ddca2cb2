//! Notification model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub message: String,
    pub kind: String,
    pub event_id: Option<i64>,
    pub is_read: bool,
    pub is_dismissed: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationKind {
    RegistrationConfirmed,
    RegistrationCancelled,
    EventUpdated,
    EventCancelled,
    EventReminder,
    NewComment,
    System,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::RegistrationConfirmed => "registration_confirmed",
            NotificationKind::RegistrationCancelled => "registration_cancelled",
            NotificationKind::EventUpdated => "event_updated",
            NotificationKind::EventCancelled => "event_cancelled",
            NotificationKind::EventReminder => "event_reminder",
            NotificationKind::NewComment => "new_comment",
            NotificationKind::System => "system",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "registration_confirmed" => Some(NotificationKind::RegistrationConfirmed),
            "registration_cancelled" => Some(NotificationKind::RegistrationCancelled),
            "event_updated" => Some(NotificationKind::EventUpdated),
            "event_cancelled" => Some(NotificationKind::EventCancelled),
            "event_reminder" => Some(NotificationKind::EventReminder),
            "new_comment" => Some(NotificationKind::NewComment),
            "system" => Some(NotificationKind::System),
            _ => None,
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct CreateNotificationRequest {
    pub user_id: i64,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub event_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trip() {
        for kind in [
            NotificationKind::RegistrationConfirmed,
            NotificationKind::RegistrationCancelled,
            NotificationKind::EventUpdated,
            NotificationKind::EventCancelled,
            NotificationKind::EventReminder,
            NotificationKind::NewComment,
            NotificationKind::System,
        ] {
            assert_eq!(NotificationKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(NotificationKind::parse("unknown"), None);
    }
}
