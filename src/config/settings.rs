//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub uploads: UploadConfig,
    pub security: SecurityConfig,
    pub cors: CorsConfig,
    pub logging: LoggingConfig,
    pub features: FeaturesConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// JWT issuance and validation configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub expiry_minutes: i64,
}

/// Image upload configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UploadConfig {
    pub directory: String,
    pub max_size_bytes: usize,
    pub allowed_extensions: Vec<String>,
    pub max_dimension: u32,
    pub thumbnail_dimension: u32,
}

/// Login protection configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SecurityConfig {
    pub max_failed_logins: i32,
    pub lockout_minutes: i64,
    pub login_rate_limit: u32,
    pub login_rate_window_seconds: u64,
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: String,
}

/// Feature flags configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeaturesConfig {
    /// Allow any authenticated user to create events, not only organizers
    pub open_event_creation: bool,
    /// Email given here is granted the admin role on registration
    pub seed_admin_email: Option<String>,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("VENTYTIME").separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::VentyTimeError> {
        super::validation::validate_settings(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/ventytime".to_string(),
                max_connections: 10,
                min_connections: 1,
            },
            jwt: JwtConfig {
                secret: String::new(),
                issuer: "ventytime".to_string(),
                audience: "ventytime-client".to_string(),
                expiry_minutes: 60,
            },
            uploads: UploadConfig {
                directory: "uploads".to_string(),
                max_size_bytes: 5 * 1024 * 1024,
                allowed_extensions: vec![
                    "jpg".to_string(),
                    "jpeg".to_string(),
                    "png".to_string(),
                    "gif".to_string(),
                    "webp".to_string(),
                ],
                max_dimension: 1600,
                thumbnail_dimension: 320,
            },
            security: SecurityConfig {
                max_failed_logins: 5,
                lockout_minutes: 15,
                login_rate_limit: 10,
                login_rate_window_seconds: 60,
            },
            cors: CorsConfig {
                allowed_origins: vec!["http://localhost:5000".to_string()],
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: "logs".to_string(),
            },
            features: FeaturesConfig {
                open_event_creation: true,
                seed_admin_email: None,
            },
        }
    }
}
