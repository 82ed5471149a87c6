//! Domain service for accounts and sign-in.
//!
//! Covers password registration/login, profile access, and resolving Google
//! profiles to local accounts.

use thiserror::Error;

use crate::db::{ProfileUpdate, User};

/// Errors specific to account operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("User already exists")]
    EmailTaken,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("User not found")]
    UserNotFound,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Outcome of an OAuth sign-in. `created` distinguishes first-login
/// provisioning from a returning account so callers can log and test it.
#[derive(Debug, Clone)]
pub struct OAuthLogin {
    pub user: User,
    pub created: bool,
}

/// Domain service trait for accounts.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Creates a password account. The email arrives normalized to lowercase.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::EmailTaken`] when the email is already registered.
    async fn register(&self, name: &str, email: &str, password: &str) -> Result<User, AuthError>;

    /// Verifies credentials and returns the account.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] for an unknown email or a
    /// wrong password; the two cases are indistinguishable to the caller.
    async fn login(&self, email: &str, password: &str) -> Result<User, AuthError>;

    /// Resolves a Google profile to a local account, creating one on first
    /// login. An existing account matched by email gets the Google identity
    /// linked to it.
    async fn oauth_login(
        &self,
        google_id: &str,
        email: &str,
        name: &str,
    ) -> Result<OAuthLogin, AuthError>;

    /// Fetches the account for an authenticated user id.
    async fn get_profile(&self, user_id: i32) -> Result<User, AuthError>;

    /// Applies profile changes (name, phone, address) and returns the
    /// updated account. Email and role are not client-mutable.
    async fn update_profile(&self, user_id: i32, update: ProfileUpdate)
    -> Result<User, AuthError>;
}
