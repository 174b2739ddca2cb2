//! Test data builders

use chrono::{Duration, Utc};
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use VentyTime::models::event::CreateEventRequest;
use VentyTime::models::user::RegisterRequest;

/// A registration payload with a unique fake email
pub fn register_request() -> RegisterRequest {
    RegisterRequest {
        // Prefix with a UUID so parallel fixtures never collide
        email: format!("{}-{}", uuid_prefix(), SafeEmail().fake::<String>()),
        password: "correct horse battery staple".to_string(),
        first_name: Some(FirstName().fake()),
        last_name: Some(LastName().fake()),
    }
}

/// A valid in-person event starting in one week
pub fn event_request(max_attendees: Option<i32>, allow_waitlist: bool) -> CreateEventRequest {
    CreateEventRequest {
        title: "Lindy Hop Social".to_string(),
        description: Some("Weekly social dance".to_string()),
        category: Some("dance".to_string()),
        tags: vec!["swing".to_string(), "social".to_string()],
        starts_at: Utc::now() + Duration::days(7),
        ends_at: Some(Utc::now() + Duration::days(7) + Duration::hours(3)),
        location: Some("Main Hall".to_string()),
        is_online: false,
        meeting_url: None,
        max_attendees,
        price_cents: 1500,
        image_url: None,
        allow_waitlist,
    }
}

fn uuid_prefix() -> String {
    uuid::Uuid::new_v4().to_string()[..8].to_string()
}
