//! Database service layer
//!
//! This module bundles the repositories behind a single handle

use crate::database::{
    CommentRepository, DatabasePool, EventRepository, NotificationRepository,
    RegistrationRepository, UserRepository,
};

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pub users: UserRepository,
    pub events: EventRepository,
    pub registrations: RegistrationRepository,
    pub comments: CommentRepository,
    pub notifications: NotificationRepository,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            events: EventRepository::new(pool.clone()),
            registrations: RegistrationRepository::new(pool.clone()),
            comments: CommentRepository::new(pool.clone()),
            notifications: NotificationRepository::new(pool),
        }
    }
}
