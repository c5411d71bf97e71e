//! Domain service for user accounts.

use serde::Serialize;
use thiserror::Error;

use super::CreateOutcome;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("User '{0}' not found")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for UserError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for UserError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// Public profile view. Never carries the email or the admin flag.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub username: String,
    pub display_name: Option<String>,
    pub created: String,
}

#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub username: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub admin: bool,
}

/// Domain service trait for user accounts.
#[async_trait::async_trait]
pub trait UserService: Send + Sync {
    /// Creates an account; a username collision (checked or raced)
    /// yields `AlreadyExists` with the existing account's profile.
    async fn create_user(
        &self,
        request: CreateUserRequest,
    ) -> Result<CreateOutcome<UserProfile>, UserError>;

    async fn get_profile(&self, username: &str) -> Result<UserProfile, UserError>;
}
