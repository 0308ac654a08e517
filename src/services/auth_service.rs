//! Domain service for authentication and user management.
//!
//! Handles login, API key verification and user creation.

use serde::Serialize;
use thiserror::Error;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User not found")]
    UserNotFound,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// User info DTO for responses.
#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    pub username: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Login result containing the username and API key.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResult {
    pub username: String,
    pub api_key: String,
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Verifies credentials and returns user info.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] if login fails.
    async fn login(&self, username: &str, password: &str) -> Result<LoginResult, AuthError>;

    /// Verifies an API key and returns the associated username if valid.
    async fn verify_api_key(&self, api_key: &str) -> Result<Option<String>, AuthError>;

    async fn get_user_info(&self, username: &str) -> Result<UserInfo, AuthError>;

    /// Creates a user and returns its API key.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Validation`] for a blank username or a short password.
    async fn create_user(&self, username: &str, password: &str) -> Result<LoginResult, AuthError>;

    async fn regenerate_api_key(&self, username: &str) -> Result<String, AuthError>;
}
