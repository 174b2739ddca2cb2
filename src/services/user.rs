//! User service implementation
//!
//! This service handles profile management and the administrative user
//! operations (listing, role changes, deactivation).

use tracing::{debug, info};
use crate::database::repositories::UserRepository;
use crate::models::user::{UpdateUserRequest, User, UserDto, UserRole};
use crate::utils::errors::{Result, VentyTimeError};
use crate::utils::helpers::{calculate_offset, clamp_page_size};

/// User service for managing user operations
#[derive(Clone)]
pub struct UserService {
    user_repository: UserRepository,
}

impl UserService {
    /// Create a new UserService instance
    pub fn new(user_repository: UserRepository) -> Self {
        Self { user_repository }
    }

    /// Get a user's profile
    pub async fn get_profile(&self, user_id: i64) -> Result<UserDto> {
        let user = self.existing_user(user_id).await?;
        Ok(user.into())
    }

    /// Update the caller's own profile. Role and activation changes are
    /// administrative and stripped here.
    pub async fn update_profile(&self, user_id: i64, mut request: UpdateUserRequest) -> Result<UserDto> {
        request.role = None;
        request.is_active = None;

        self.existing_user(user_id).await?;
        let user = self.user_repository.update(user_id, request).await?;
        info!(user_id = user_id, "Profile updated");

        Ok(user.into())
    }

    /// Get any user by id; admins, or the user themselves
    pub async fn get_user(&self, actor_id: i64, actor_role: UserRole, user_id: i64) -> Result<UserDto> {
        if actor_id != user_id && actor_role != UserRole::Admin {
            return Err(VentyTimeError::PermissionDenied(
                "Only admins may view other users".to_string(),
            ));
        }
        self.get_profile(user_id).await
    }

    /// List users with pagination; admin only
    pub async fn list_users(
        &self,
        actor_role: UserRole,
        page: Option<i64>,
        page_size: Option<i64>,
    ) -> Result<Vec<UserDto>> {
        if actor_role != UserRole::Admin {
            return Err(VentyTimeError::PermissionDenied("Only admins may list users".to_string()));
        }

        let limit = clamp_page_size(page_size);
        let offset = calculate_offset(page, limit);
        debug!(limit = limit, offset = offset, "Listing users");

        let users = self.user_repository.list(limit, offset).await?;
        Ok(users.into_iter().map(Into::into).collect())
    }

    /// Change a user's role; admin only
    pub async fn set_role(&self, admin_id: i64, actor_role: UserRole, user_id: i64, role: UserRole) -> Result<UserDto> {
        if actor_role != UserRole::Admin {
            return Err(VentyTimeError::PermissionDenied("Only admins may change roles".to_string()));
        }

        self.existing_user(user_id).await?;
        let user = self
            .user_repository
            .update(
                user_id,
                UpdateUserRequest {
                    role: Some(role.as_str().to_string()),
                    ..Default::default()
                },
            )
            .await?;

        crate::utils::logging::log_admin_action(
            admin_id,
            "set_role",
            Some(&user_id.to_string()),
            Some(role.as_str()),
        );

        Ok(user.into())
    }

    /// Activate or deactivate an account; admin only.
    /// Deactivated accounts cannot log in.
    pub async fn set_active(&self, admin_id: i64, actor_role: UserRole, user_id: i64, is_active: bool) -> Result<UserDto> {
        if actor_role != UserRole::Admin {
            return Err(VentyTimeError::PermissionDenied(
                "Only admins may deactivate accounts".to_string(),
            ));
        }
        if admin_id == user_id && !is_active {
            return Err(VentyTimeError::InvalidInput(
                "Admins cannot deactivate their own account".to_string(),
            ));
        }

        self.existing_user(user_id).await?;
        let user = self
            .user_repository
            .update(
                user_id,
                UpdateUserRequest {
                    is_active: Some(is_active),
                    ..Default::default()
                },
            )
            .await?;

        crate::utils::logging::log_admin_action(
            admin_id,
            if is_active { "activate_user" } else { "deactivate_user" },
            Some(&user_id.to_string()),
            None,
        );

        Ok(user.into())
    }

    async fn existing_user(&self, user_id: i64) -> Result<User> {
        self.user_repository
            .find_by_id(user_id)
            .await?
            .ok_or(VentyTimeError::UserNotFound { user_id })
    }
}
