//! Authentication service implementation
//!
//! This service handles account registration, credential checks with
//! lockout, password changes and token issuance.

use argon2::password_hash::{rand_core::OsRng, PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use chrono::{Duration, Utc};
use tracing::{debug, info, warn};
use crate::config::settings::Settings;
use crate::database::repositories::UserRepository;
use crate::models::response::AuthResponse;
use crate::models::user::{ChangePasswordRequest, CreateUserRequest, LoginRequest, RegisterRequest, UserRole};
use crate::services::token::TokenService;
use crate::utils::errors::{Result, VentyTimeError};
use crate::utils::helpers::is_valid_email;

const MIN_PASSWORD_LENGTH: usize = 8;

/// Hash a plaintext password with Argon2id using a random salt
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| VentyTimeError::Authentication(format!("Failed to hash password: {}", e)))?;

    Ok(password_hash.to_string())
}

/// Verify a plaintext password against an Argon2 hash string
pub fn verify_password(password: &str, hash: &str) -> Result<()> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| VentyTimeError::Authentication(format!("Invalid password hash: {}", e)))?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| VentyTimeError::Authentication("Invalid email or password".to_string()))?;

    Ok(())
}

/// Authentication service for account and credential operations
#[derive(Clone)]
pub struct AuthService {
    user_repository: UserRepository,
    token_service: TokenService,
    settings: Settings,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(user_repository: UserRepository, token_service: TokenService, settings: Settings) -> Self {
        Self {
            user_repository,
            token_service,
            settings,
        }
    }

    /// Register a new account and issue its first token
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthResponse> {
        let email = request.email.trim().to_lowercase();
        debug!(email = %email, "Registering new account");

        if !is_valid_email(&email) {
            return Err(VentyTimeError::InvalidInput("Invalid email address".to_string()));
        }
        if request.password.len() < MIN_PASSWORD_LENGTH {
            return Err(VentyTimeError::InvalidInput(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }

        if self.user_repository.find_by_email(&email).await?.is_some() {
            return Err(VentyTimeError::EmailTaken(email));
        }

        let role = match &self.settings.features.seed_admin_email {
            Some(admin_email) if admin_email.eq_ignore_ascii_case(&email) => UserRole::Admin,
            _ => UserRole::User,
        };

        let password_hash = hash_password(&request.password)?;
        let user = self
            .user_repository
            .create(CreateUserRequest {
                email,
                password_hash,
                first_name: request.first_name,
                last_name: request.last_name,
                role: Some(role.as_str().to_string()),
            })
            .await?;

        info!(user_id = user.id, role = %user.role, "New account registered");

        let token = self.token_service.issue(&user)?;
        Ok(AuthResponse { token, user: user.into() })
    }

    /// Check credentials and issue a token, enforcing the lockout policy
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse> {
        let email = request.email.trim().to_lowercase();
        debug!(email = %email, "Login attempt");

        let user = match self.user_repository.find_by_email(&email).await? {
            Some(user) => user,
            None => {
                crate::utils::logging::log_auth_failure(&email, "unknown email");
                return Err(VentyTimeError::Authentication("Invalid email or password".to_string()));
            }
        };

        if !user.is_active {
            warn!(user_id = user.id, "Login attempt on deactivated account");
            return Err(VentyTimeError::Authentication("Account is deactivated".to_string()));
        }

        if let Some(locked_until) = user.locked_until {
            if locked_until > Utc::now() {
                warn!(user_id = user.id, locked_until = %locked_until, "Login attempt on locked account");
                return Err(VentyTimeError::AccountLocked { locked_until });
            }
        }

        if verify_password(&request.password, &user.password_hash).is_err() {
            let failures = self.user_repository.increment_failed_logins(user.id).await?;
            warn!(user_id = user.id, failures = failures, "Invalid password");

            if failures >= self.settings.security.max_failed_logins {
                let locked_until = Utc::now() + Duration::minutes(self.settings.security.lockout_minutes);
                self.user_repository.set_lockout(user.id, locked_until).await?;
                warn!(user_id = user.id, locked_until = %locked_until, "Account locked after repeated failures");
                return Err(VentyTimeError::AccountLocked { locked_until });
            }

            return Err(VentyTimeError::Authentication("Invalid email or password".to_string()));
        }

        self.user_repository.reset_login_failures(user.id).await?;
        info!(user_id = user.id, "Login successful");

        let token = self.token_service.issue(&user)?;
        Ok(AuthResponse { token, user: user.into() })
    }

    /// Change the password of an authenticated user
    pub async fn change_password(&self, user_id: i64, request: ChangePasswordRequest) -> Result<()> {
        let user = self
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or(VentyTimeError::UserNotFound { user_id })?;

        verify_password(&request.current_password, &user.password_hash)
            .map_err(|_| VentyTimeError::Authentication("Current password is incorrect".to_string()))?;

        if request.new_password.len() < MIN_PASSWORD_LENGTH {
            return Err(VentyTimeError::InvalidInput(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }

        let password_hash = hash_password(&request.new_password)?;
        self.user_repository.update_password(user_id, &password_hash).await?;

        info!(user_id = user_id, "Password changed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_round_trip() {
        let hash = hash_password("correct horse battery staple").unwrap();
        assert!(verify_password("correct horse battery staple", &hash).is_ok());
        assert!(verify_password("wrong password", &hash).is_err());
    }

    #[test]
    fn test_hashes_are_salted() {
        let first = hash_password("same password").unwrap();
        let second = hash_password("same password").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_invalid_stored_hash_rejected() {
        assert!(verify_password("anything", "not-a-phc-string").is_err());
    }
}
