//! Service-level integration tests against a real PostgreSQL instance.
//!
//! These tests need Docker (testcontainers) or a `TEST_DATABASE_URL`
//! pointing at a disposable database, so they are ignored by default:
//!
//! ```text
//! cargo test -- --ignored
//! ```

mod helpers;

use assert_matches::assert_matches;
use serial_test::serial;
use helpers::database_helper::TestDatabase;
use helpers::test_data::{event_request, register_request};
use VentyTime::config::Settings;
use VentyTime::database::DatabaseService;
use VentyTime::models::registration::RegistrationStatus;
use VentyTime::models::user::{LoginRequest, UserRole};
use VentyTime::services::ServiceFactory;
use VentyTime::utils::errors::VentyTimeError;

fn make_settings() -> Settings {
    let mut settings = Settings::default();
    settings.jwt.secret = "integration-test-secret-0123456789ab".to_string();
    settings
}

async fn setup() -> (TestDatabase, ServiceFactory) {
    let db = TestDatabase::new().await.expect("test database");
    db.cleanup().await.expect("cleanup");
    let services = ServiceFactory::new(make_settings(), DatabaseService::new(db.pool.clone()))
        .expect("service factory");
    (db, services)
}

#[tokio::test]
#[serial]
#[ignore = "requires Docker or TEST_DATABASE_URL"]
async fn register_login_and_lockout_flow() {
    let (_db, services) = setup().await;

    let request = register_request();
    let email = request.email.clone();
    let password = request.password.clone();

    let registered = services.auth_service.register(request).await.unwrap();
    assert!(!registered.token.is_empty());
    assert_eq!(registered.user.role, "user");

    // Same email cannot register twice
    let mut duplicate = register_request();
    duplicate.email = email.clone();
    assert_matches!(
        services.auth_service.register(duplicate).await,
        Err(VentyTimeError::EmailTaken(_))
    );

    // Correct credentials log in
    let login = services
        .auth_service
        .login(LoginRequest { email: email.clone(), password: password.clone() })
        .await
        .unwrap();
    assert_eq!(login.user.id, registered.user.id);

    // Repeated failures lock the account
    let max_failures = make_settings().security.max_failed_logins;
    for _ in 0..max_failures {
        let result = services
            .auth_service
            .login(LoginRequest { email: email.clone(), password: "wrong password".to_string() })
            .await;
        assert!(result.is_err());
    }

    // Even the right password is rejected while locked
    assert_matches!(
        services
            .auth_service
            .login(LoginRequest { email, password })
            .await,
        Err(VentyTimeError::AccountLocked { .. })
    );
}

#[tokio::test]
#[serial]
#[ignore = "requires Docker or TEST_DATABASE_URL"]
async fn duplicate_and_capacity_rules() {
    let (_db, services) = setup().await;

    let organizer = services.auth_service.register(register_request()).await.unwrap().user;
    let attendee = services.auth_service.register(register_request()).await.unwrap().user;
    let latecomer = services.auth_service.register(register_request()).await.unwrap().user;

    let event = services
        .event_service
        .create_event(organizer.id, UserRole::User, event_request(Some(1), false))
        .await
        .unwrap();

    let registration = services
        .registration_service
        .register(attendee.id, event.id)
        .await
        .unwrap();
    assert_eq!(registration.status(), RegistrationStatus::Pending);
    assert!(!registration.waitlisted);

    // Registering twice for the same event fails the second time
    assert_matches!(
        services.registration_service.register(attendee.id, event.id).await,
        Err(VentyTimeError::AlreadyRegistered { .. })
    );

    // Registering when the event is full fails
    assert_matches!(
        services.registration_service.register(latecomer.id, event.id).await,
        Err(VentyTimeError::EventFull { .. })
    );
}

#[tokio::test]
#[serial]
#[ignore = "requires Docker or TEST_DATABASE_URL"]
async fn waitlist_promotion_on_cancellation() {
    let (_db, services) = setup().await;

    let organizer = services.auth_service.register(register_request()).await.unwrap().user;
    let seated = services.auth_service.register(register_request()).await.unwrap().user;
    let waiting = services.auth_service.register(register_request()).await.unwrap().user;

    let event = services
        .event_service
        .create_event(organizer.id, UserRole::User, event_request(Some(1), true))
        .await
        .unwrap();

    let seated_registration = services
        .registration_service
        .register(seated.id, event.id)
        .await
        .unwrap();
    assert!(!seated_registration.waitlisted);

    let waiting_registration = services
        .registration_service
        .register(waiting.id, event.id)
        .await
        .unwrap();
    assert!(waiting_registration.waitlisted);

    // Cancelling the seated registration promotes the waitlisted one
    services
        .registration_service
        .cancel(seated.id, UserRole::User, seated_registration.id)
        .await
        .unwrap();

    let registrations = services
        .registration_service
        .list_for_event(organizer.id, UserRole::User, event.id)
        .await
        .unwrap();
    let promoted = registrations
        .iter()
        .find(|r| r.user_id == waiting.id)
        .unwrap();
    assert!(!promoted.waitlisted);
    assert_eq!(promoted.status(), RegistrationStatus::Pending);
}

#[tokio::test]
#[serial]
#[ignore = "requires Docker or TEST_DATABASE_URL"]
async fn comment_ownership_and_soft_delete() {
    let db = TestDatabase::new().await.expect("test database");
    db.cleanup().await.expect("cleanup");

    let admin_signup = register_request();
    let mut settings = make_settings();
    settings.features.seed_admin_email = Some(admin_signup.email.clone());
    let services = ServiceFactory::new(settings, DatabaseService::new(db.pool.clone()))
        .expect("service factory");

    let admin = services.auth_service.register(admin_signup).await.unwrap().user;
    assert_eq!(admin.role, "admin");

    let organizer = services.auth_service.register(register_request()).await.unwrap().user;
    let author = services.auth_service.register(register_request()).await.unwrap().user;
    let stranger = services.auth_service.register(register_request()).await.unwrap().user;

    let event = services
        .event_service
        .create_event(organizer.id, UserRole::User, event_request(None, false))
        .await
        .unwrap();

    let comment = services
        .comment_service
        .create(author.id, event.id, "Looking forward to this!")
        .await
        .unwrap();

    // Someone who is neither the author nor an admin cannot touch it
    assert_matches!(
        services.comment_service.update(stranger.id, comment.id, "hijacked").await,
        Err(VentyTimeError::PermissionDenied(_))
    );
    assert_matches!(
        services.comment_service.delete(stranger.id, UserRole::User, comment.id).await,
        Err(VentyTimeError::PermissionDenied(_))
    );

    // The author edits their own comment
    let updated = services
        .comment_service
        .update(author.id, comment.id, "Updated text")
        .await
        .unwrap();
    assert_eq!(updated.content, "Updated text");

    // An admin deletes it, and it disappears from listings
    services
        .comment_service
        .delete(admin.id, UserRole::Admin, comment.id)
        .await
        .unwrap();

    let listed = services
        .comment_service
        .list_for_event(event.id, None, None)
        .await
        .unwrap();
    assert!(listed.is_empty());

    // Cancelled events reject new comments
    services
        .event_service
        .cancel_event(organizer.id, UserRole::User, event.id)
        .await
        .unwrap();
    assert_matches!(
        services.comment_service.create(author.id, event.id, "too late").await,
        Err(VentyTimeError::InvalidInput(_))
    );
}

#[tokio::test]
#[serial]
#[ignore = "requires Docker or TEST_DATABASE_URL"]
async fn confirmation_notifies_and_pushes() {
    let (_db, services) = setup().await;

    let organizer = services.auth_service.register(register_request()).await.unwrap().user;
    let attendee = services.auth_service.register(register_request()).await.unwrap().user;

    let event = services
        .event_service
        .create_event(organizer.id, UserRole::User, event_request(Some(10), false))
        .await
        .unwrap();

    let registration = services
        .registration_service
        .register(attendee.id, event.id)
        .await
        .unwrap();

    // Subscribe to the push stream before the confirmation happens
    let mut stream = services.hub.subscribe(attendee.id).await;

    let confirmed = services
        .registration_service
        .confirm(organizer.id, UserRole::User, registration.id)
        .await
        .unwrap();
    assert_eq!(confirmed.status(), RegistrationStatus::Confirmed);

    let pushed = stream.recv().await.unwrap();
    assert_eq!(pushed.user_id, attendee.id);
    assert_eq!(pushed.kind, "registration_confirmed");

    assert_eq!(services.notification_service.unread_count(attendee.id).await.unwrap(), 1);

    services.notification_service.mark_all_read(attendee.id).await.unwrap();
    assert_eq!(services.notification_service.unread_count(attendee.id).await.unwrap(), 0);
}
