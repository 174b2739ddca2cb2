//! Services module
//!
//! This module contains business logic services

pub mod auth;
pub mod comment;
pub mod event;
pub mod hub;
pub mod image;
pub mod notification;
pub mod registration;
pub mod token;
pub mod user;

// Re-export commonly used services
pub use auth::AuthService;
pub use comment::CommentService;
pub use event::EventService;
pub use hub::NotificationHub;
pub use image::ImageService;
pub use notification::NotificationService;
pub use registration::RegistrationService;
pub use token::{Claims, TokenService};
pub use user::UserService;

use crate::config::settings::Settings;
use crate::database::DatabaseService;
use crate::utils::errors::Result;

/// Service factory for creating and managing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub auth_service: AuthService,
    pub token_service: TokenService,
    pub user_service: UserService,
    pub event_service: EventService,
    pub registration_service: RegistrationService,
    pub comment_service: CommentService,
    pub notification_service: NotificationService,
    pub image_service: ImageService,
    pub hub: NotificationHub,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(settings: Settings, database: DatabaseService) -> Result<Self> {
        let hub = NotificationHub::new();
        let token_service = TokenService::new(&settings.jwt);

        let notification_service = NotificationService::new(
            database.notifications.clone(),
            database.users.clone(),
            hub.clone(),
        );
        let auth_service = AuthService::new(
            database.users.clone(),
            token_service.clone(),
            settings.clone(),
        );
        let user_service = UserService::new(database.users.clone());
        let event_service = EventService::new(
            database.events.clone(),
            database.registrations.clone(),
            notification_service.clone(),
            settings.clone(),
        );
        let registration_service = RegistrationService::new(
            database.registrations.clone(),
            database.events.clone(),
            notification_service.clone(),
        );
        let comment_service = CommentService::new(
            database.comments.clone(),
            database.events.clone(),
            notification_service.clone(),
        );
        let image_service = ImageService::new(settings.uploads.clone());

        Ok(Self {
            auth_service,
            token_service,
            user_service,
            event_service,
            registration_service,
            comment_service,
            notification_service,
            image_service,
            hub,
        })
    }
}
