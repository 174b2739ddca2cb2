//! Database module
//!
//! This module handles database connections and operations

pub mod connection;
pub mod repositories;
pub mod service;

pub use connection::{create_pool, health_check, run_migrations, DatabasePool};
pub use repositories::{
    CommentRepository, EventRepository, NotificationRepository, RegistrationRepository,
    UserRepository,
};
pub use service::DatabaseService;
