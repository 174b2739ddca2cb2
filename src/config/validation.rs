//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::config::Settings;
use crate::utils::errors::VentyTimeError;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<(), VentyTimeError> {
    validate_server(settings)?;
    validate_database(settings)?;
    validate_jwt(settings)?;
    validate_uploads(settings)?;
    validate_security(settings)?;
    Ok(())
}

fn validate_server(settings: &Settings) -> Result<(), VentyTimeError> {
    if settings.server.host.is_empty() {
        return Err(VentyTimeError::Config("Server host cannot be empty".to_string()));
    }
    if settings.server.port == 0 {
        return Err(VentyTimeError::Config("Server port cannot be 0".to_string()));
    }
    Ok(())
}

fn validate_database(settings: &Settings) -> Result<(), VentyTimeError> {
    if settings.database.url.is_empty() {
        return Err(VentyTimeError::Config("Database URL cannot be empty".to_string()));
    }
    if !settings.database.url.starts_with("postgresql://")
        && !settings.database.url.starts_with("postgres://")
    {
        return Err(VentyTimeError::Config(
            "Database URL must be a PostgreSQL connection string".to_string(),
        ));
    }
    if settings.database.max_connections == 0 {
        return Err(VentyTimeError::Config(
            "Database max_connections must be greater than 0".to_string(),
        ));
    }
    if settings.database.min_connections > settings.database.max_connections {
        return Err(VentyTimeError::Config(
            "Database min_connections cannot exceed max_connections".to_string(),
        ));
    }
    Ok(())
}

fn validate_jwt(settings: &Settings) -> Result<(), VentyTimeError> {
    if settings.jwt.secret.len() < 32 {
        return Err(VentyTimeError::Config(
            "JWT secret must be at least 32 characters".to_string(),
        ));
    }
    if settings.jwt.expiry_minutes <= 0 {
        return Err(VentyTimeError::Config(
            "JWT expiry must be positive".to_string(),
        ));
    }
    Ok(())
}

fn validate_uploads(settings: &Settings) -> Result<(), VentyTimeError> {
    if settings.uploads.directory.is_empty() {
        return Err(VentyTimeError::Config("Upload directory cannot be empty".to_string()));
    }
    if settings.uploads.max_size_bytes == 0 {
        return Err(VentyTimeError::Config(
            "Upload max_size_bytes must be greater than 0".to_string(),
        ));
    }
    if settings.uploads.allowed_extensions.is_empty() {
        return Err(VentyTimeError::Config(
            "Upload allowed_extensions cannot be empty".to_string(),
        ));
    }
    if settings.uploads.thumbnail_dimension == 0
        || settings.uploads.max_dimension < settings.uploads.thumbnail_dimension
    {
        return Err(VentyTimeError::Config(
            "Upload dimensions must be positive and max_dimension >= thumbnail_dimension"
                .to_string(),
        ));
    }
    Ok(())
}

fn validate_security(settings: &Settings) -> Result<(), VentyTimeError> {
    if settings.security.max_failed_logins <= 0 {
        return Err(VentyTimeError::Config(
            "max_failed_logins must be greater than 0".to_string(),
        ));
    }
    if settings.security.lockout_minutes <= 0 {
        return Err(VentyTimeError::Config(
            "lockout_minutes must be greater than 0".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_settings() -> Settings {
        let mut settings = Settings::default();
        settings.jwt.secret = "a".repeat(32);
        settings
    }

    #[test]
    fn test_valid_settings_pass() {
        assert!(validate_settings(&valid_settings()).is_ok());
    }

    #[test]
    fn test_short_jwt_secret_rejected() {
        let mut settings = valid_settings();
        settings.jwt.secret = "too-short".to_string();
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_bad_database_url_rejected() {
        let mut settings = valid_settings();
        settings.database.url = "mysql://localhost/ventytime".to_string();
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_zero_max_connections_rejected() {
        let mut settings = valid_settings();
        settings.database.max_connections = 0;
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_empty_upload_extensions_rejected() {
        let mut settings = valid_settings();
        settings.uploads.allowed_extensions.clear();
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_thumbnail_larger_than_max_rejected() {
        let mut settings = valid_settings();
        settings.uploads.thumbnail_dimension = 2000;
        assert!(validate_settings(&settings).is_err());
    }
}
