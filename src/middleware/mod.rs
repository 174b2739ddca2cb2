//! Middleware module
//!
//! This module contains authentication and request-protection middleware

pub mod auth;
pub mod rate_limit;

pub use auth::AuthContext;
pub use rate_limit::{RateLimitConfig, RateLimiter};
