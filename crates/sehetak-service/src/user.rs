//! User provisioning for administrative tooling.

use std::sync::Arc;

use tracing::info;

use sehetak_core::error::AppError;
use sehetak_database::UserDirectory;
use sehetak_entity::{CreateUser, User};

/// Longest accepted username, matching the column width.
pub const MAX_USERNAME_LEN: usize = 255;

/// Creates and lists portal users.
#[derive(Debug, Clone)]
pub struct UserService {
    users: Arc<dyn UserDirectory>,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(users: Arc<dyn UserDirectory>) -> Self {
        Self { users }
    }

    /// Create a user after validating the username.
    pub async fn create(&self, data: CreateUser) -> Result<User, AppError> {
        let username = data.username.trim().to_string();
        if username.is_empty() {
            return Err(AppError::validation("Username is required"));
        }
        if username.len() > MAX_USERNAME_LEN {
            return Err(AppError::validation(format!(
                "Username exceeds {MAX_USERNAME_LEN} characters"
            )));
        }
        if username.chars().any(char::is_whitespace) {
            return Err(AppError::validation("Username cannot contain whitespace"));
        }

        let user = self
            .users
            .create(&CreateUser {
                username,
                role: data.role,
            })
            .await?;
        info!(user_id = %user.id, username = %user.username, role = %user.role, "User created");
        Ok(user)
    }

    /// All users ordered by id.
    pub async fn list(&self) -> Result<Vec<User>, AppError> {
        self.users.list().await
    }
}
