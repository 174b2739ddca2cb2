//! VentyTime event platform
//!
//! An event-discovery and registration service. This library provides
//! modular components for accounts and JWT authentication, event
//! management, registrations with capacity and waitlist handling,
//! comments, notifications with live WebSocket delivery, and image
//! uploads.

#![allow(non_snake_case)]

pub mod config;
pub mod database;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{Result, VentyTimeError};

// Re-export main components for easy access
pub use database::DatabaseService;
pub use handlers::AppState;
pub use services::ServiceFactory;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
