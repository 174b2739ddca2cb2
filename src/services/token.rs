//! JWT issuance and validation
//!
//! Stateless bearer tokens carry the user id, email and role. Every
//! authenticated endpoint validates signature, expiry, issuer and audience.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use crate::config::JwtConfig;
use crate::models::user::User;
use crate::utils::errors::Result;

/// Claims embedded in every access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: i64,
    pub email: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
    pub aud: String,
}

#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    audience: String,
    expiry_minutes: i64,
}

impl TokenService {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            expiry_minutes: config.expiry_minutes,
        }
    }

    /// Issue an access token for a user
    pub fn issue(&self, user: &User) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            role: user.role.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::minutes(self.expiry_minutes)).timestamp(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Validate a token and return its claims
    pub fn validate(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);

        let data = decode::<Claims>(token, &self.decoding_key, &validation)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(expiry_minutes: i64) -> JwtConfig {
        JwtConfig {
            secret: "test-secret-that-is-long-enough-0123".to_string(),
            issuer: "ventytime".to_string(),
            audience: "ventytime-client".to_string(),
            expiry_minutes,
        }
    }

    fn test_user() -> User {
        User {
            id: 42,
            email: "alice@example.com".to_string(),
            password_hash: String::new(),
            first_name: None,
            last_name: None,
            profile_picture_url: None,
            role: "organizer".to_string(),
            email_notifications: true,
            push_notifications: true,
            failed_login_attempts: 0,
            locked_until: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_issue_and_validate_round_trip() {
        let service = TokenService::new(&test_config(60));
        let token = service.issue(&test_user()).unwrap();

        let claims = service.validate(&token).unwrap();
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.email, "alice@example.com");
        assert_eq!(claims.role, "organizer");
        assert_eq!(claims.iss, "ventytime");
    }

    #[test]
    fn test_expired_token_rejected() {
        // Negative expiry puts exp beyond the default validation leeway
        let service = TokenService::new(&test_config(-10));
        let token = service.issue(&test_user()).unwrap();

        assert!(service.validate(&token).is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let service = TokenService::new(&test_config(60));
        let token = service.issue(&test_user()).unwrap();

        let mut other_config = test_config(60);
        other_config.secret = "another-secret-that-is-long-enough-1".to_string();
        let other = TokenService::new(&other_config);

        assert!(other.validate(&token).is_err());
    }

    #[test]
    fn test_garbage_token_rejected() {
        let service = TokenService::new(&test_config(60));
        assert!(service.validate("not.a.token").is_err());
    }
}
