//! Authentication middleware
//!
//! This module provides the bearer-token extractor used by protected
//! endpoints and the role checks built on top of it.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tracing::{debug, warn};
use crate::handlers::AppState;
use crate::models::user::UserRole;
use crate::services::token::Claims;
use crate::utils::errors::{Result, VentyTimeError};

/// Authenticated caller identity, decoded from the bearer token
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: i64,
    pub email: String,
    pub role: UserRole,
}

impl AuthContext {
    pub fn from_claims(claims: Claims) -> Self {
        let role = UserRole::parse(&claims.role).unwrap_or(UserRole::User);
        Self {
            user_id: claims.sub,
            email: claims.email,
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Check that the caller holds the admin role
    pub fn require_admin(&self) -> Result<()> {
        if self.is_admin() {
            debug!(user_id = self.user_id, "Admin authentication successful");
            Ok(())
        } else {
            warn!(user_id = self.user_id, "Unauthorized admin access attempt");
            Err(VentyTimeError::PermissionDenied(
                "Admin privileges required".to_string(),
            ))
        }
    }
}

/// Pull the token from the Authorization header, or from the
/// `access_token` query parameter used by the WebSocket handshake
fn extract_token(parts: &Parts) -> Option<String> {
    if let Some(value) = parts.headers.get(axum::http::header::AUTHORIZATION) {
        if let Ok(value) = value.to_str() {
            if let Some(token) = value.strip_prefix("Bearer ") {
                return Some(token.trim().to_string());
            }
        }
    }

    parts.uri.query().and_then(|query| {
        query.split('&').find_map(|pair| {
            pair.strip_prefix("access_token=")
                .map(|token| token.to_string())
        })
    })
}

#[async_trait]
impl FromRequestParts<AppState> for AuthContext {
    type Rejection = VentyTimeError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let token = extract_token(parts)
            .ok_or_else(|| VentyTimeError::Authentication("Missing bearer token".to_string()))?;

        let claims = state.services.token_service.validate(&token)?;
        Ok(AuthContext::from_claims(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(role: UserRole) -> AuthContext {
        AuthContext {
            user_id: 1,
            email: "user@example.com".to_string(),
            role,
        }
    }

    #[test]
    fn test_require_admin() {
        assert!(context(UserRole::Admin).require_admin().is_ok());
        assert!(context(UserRole::Organizer).require_admin().is_err());
        assert!(context(UserRole::User).require_admin().is_err());
    }

    #[test]
    fn test_from_claims_defaults_unknown_role() {
        let claims = Claims {
            sub: 9,
            email: "u@example.com".to_string(),
            role: "superhero".to_string(),
            iat: 0,
            exp: 0,
            iss: String::new(),
            aud: String::new(),
        };
        let ctx = AuthContext::from_claims(claims);
        assert_eq!(ctx.role, UserRole::User);
    }
}
