//! `SeaORM` implementation of the `AuthService` trait.

use crate::config::SecurityConfig;
use crate::db::{NewUser, ProfileUpdate, Store, User, hash_password};
use crate::services::auth_service::{AuthError, AuthService, OAuthLogin};
use async_trait::async_trait;
use tokio::task;

pub struct SeaOrmAuthService {
    store: Store,
    security: SecurityConfig,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, security: SecurityConfig) -> Self {
        Self { store, security }
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn register(&self, name: &str, email: &str, password: &str) -> Result<User, AuthError> {
        if password.len() < 6 {
            return Err(AuthError::Validation(
                "Password must be at least 6 characters".to_string(),
            ));
        }

        // Fast-path uniqueness check; the unique index on email is the backstop
        if self.store.get_user_by_email(email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let password = password.to_string();
        let security = self.security.clone();
        let password_hash = task::spawn_blocking(move || hash_password(&password, Some(&security)))
            .await
            .map_err(|e| AuthError::Internal(format!("Password hashing task panicked: {e}")))??;

        let user = self
            .store
            .create_user(NewUser {
                name: name.to_string(),
                email: email.to_string(),
                password_hash: Some(password_hash),
                google_id: None,
                role: "user".to_string(),
            })
            .await?;

        Ok(user)
    }

    async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        // Verify credentials against database
        let is_valid = self.store.verify_user_password(email, password).await?;

        if !is_valid {
            return Err(AuthError::InvalidCredentials);
        }

        let user = self
            .store
            .get_user_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        Ok(user)
    }

    async fn oauth_login(
        &self,
        google_id: &str,
        email: &str,
        name: &str,
    ) -> Result<OAuthLogin, AuthError> {
        if let Some(user) = self.store.get_user_for_oauth(google_id, email).await? {
            // A password account matched by email gets the Google identity linked
            if user.google_id.is_none() {
                let user = self.store.link_google_id(user.id, google_id).await?;
                return Ok(OAuthLogin {
                    user,
                    created: false,
                });
            }

            return Ok(OAuthLogin {
                user,
                created: false,
            });
        }

        // First Google sign-in provisions a password-less account
        let user = self
            .store
            .create_user(NewUser {
                name: name.to_string(),
                email: email.to_string(),
                password_hash: None,
                google_id: Some(google_id.to_string()),
                role: "user".to_string(),
            })
            .await?;

        Ok(OAuthLogin {
            user,
            created: true,
        })
    }

    async fn get_profile(&self, user_id: i32) -> Result<User, AuthError> {
        let user = self
            .store
            .get_user_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        Ok(user)
    }

    async fn update_profile(
        &self,
        user_id: i32,
        update: ProfileUpdate,
    ) -> Result<User, AuthError> {
        let user = self
            .store
            .update_user_profile(user_id, update)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        Ok(user)
    }
}
