//! User repository implementation

use sqlx::PgPool;
use chrono::{DateTime, Utc};
use crate::models::user::{User, CreateUserRequest, UpdateUserRequest};
use crate::utils::errors::VentyTimeError;

const USER_COLUMNS: &str = "id, email, password_hash, first_name, last_name, profile_picture_url, role, email_notifications, push_notifications, failed_login_attempts, locked_until, is_active, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user
    pub async fn create(&self, request: CreateUserRequest) -> Result<User, VentyTimeError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (email, password_hash, first_name, last_name, role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(request.email)
        .bind(request.password_hash)
        .bind(request.first_name)
        .bind(request.last_name)
        .bind(request.role.unwrap_or_else(|| "user".to_string()))
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find user by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>, VentyTimeError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find user by email (case-insensitive)
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, VentyTimeError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE LOWER(email) = LOWER($1)"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Update user profile fields
    pub async fn update(&self, id: i64, request: UpdateUserRequest) -> Result<User, VentyTimeError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                profile_picture_url = COALESCE($4, profile_picture_url),
                email_notifications = COALESCE($5, email_notifications),
                push_notifications = COALESCE($6, push_notifications),
                role = COALESCE($7, role),
                is_active = COALESCE($8, is_active),
                updated_at = $9
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(request.first_name)
        .bind(request.last_name)
        .bind(request.profile_picture_url)
        .bind(request.email_notifications)
        .bind(request.push_notifications)
        .bind(request.role)
        .bind(request.is_active)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Replace the stored password hash
    pub async fn update_password(&self, id: i64, password_hash: &str) -> Result<(), VentyTimeError> {
        sqlx::query("UPDATE users SET password_hash = $2, updated_at = $3 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Record a failed login attempt; returns the new counter value
    pub async fn increment_failed_logins(&self, id: i64) -> Result<i32, VentyTimeError> {
        let count: (i32,) = sqlx::query_as(
            "UPDATE users SET failed_login_attempts = failed_login_attempts + 1, updated_at = $2 WHERE id = $1 RETURNING failed_login_attempts"
        )
        .bind(id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }

    /// Lock the account until the given time
    pub async fn set_lockout(&self, id: i64, until: DateTime<Utc>) -> Result<(), VentyTimeError> {
        sqlx::query("UPDATE users SET locked_until = $2, updated_at = $3 WHERE id = $1")
            .bind(id)
            .bind(until)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Clear the failed-login counter and any lockout
    pub async fn reset_login_failures(&self, id: i64) -> Result<(), VentyTimeError> {
        sqlx::query(
            "UPDATE users SET failed_login_attempts = 0, locked_until = NULL, updated_at = $2 WHERE id = $1"
        )
        .bind(id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// List users with pagination
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<User>, VentyTimeError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at ASC LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Count total users
    pub async fn count(&self) -> Result<i64, VentyTimeError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}
