//! Signed bearer tokens backing the session lifecycle.
//!
//! Two kinds are minted from the same signing secret: a long-lived session
//! token carried in the `jwt` cookie (and returned to API clients), and a
//! short-lived exchange token that only bridges the OAuth callback redirect
//! to the finalize endpoint. An exchange token is never a substitute for a
//! session token, and each one is good for a single finalize call.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AuthConfig;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("token invalid")]
    Invalid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Session,
    Exchange,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id as a string, per JWT convention.
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
    #[serde(rename = "typ")]
    pub kind: TokenKind,
    /// Set on exchange tokens only; keys the consumed-token set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

impl Claims {
    pub fn user_id(&self) -> Result<i32, TokenError> {
        self.sub.parse().map_err(|_| TokenError::Invalid)
    }
}

/// Verified exchange-token contents handed to the finalize endpoint.
#[derive(Debug, Clone)]
pub struct ExchangeGrant {
    pub user_id: i32,
    pub jti: String,
    pub exp: i64,
}

#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    session_ttl: Duration,
    exchange_ttl: Duration,
}

impl TokenService {
    #[must_use]
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            session_ttl: Duration::days(config.session_ttl_days),
            exchange_ttl: Duration::seconds(config.exchange_ttl_seconds),
        }
    }

    #[must_use]
    pub const fn session_ttl(&self) -> Duration {
        self.session_ttl
    }

    pub fn issue_session(&self, user_id: i32) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            exp: (now + self.session_ttl).timestamp(),
            iat: now.timestamp(),
            kind: TokenKind::Session,
            jti: None,
        };

        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|_| TokenError::Invalid)
    }

    pub fn issue_exchange(&self, user_id: i32) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            exp: (now + self.exchange_ttl).timestamp(),
            iat: now.timestamp(),
            kind: TokenKind::Exchange,
            jti: Some(Uuid::new_v4().to_string()),
        };

        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|_| TokenError::Invalid)
    }

    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        let validation = Validation::new(Algorithm::HS256);

        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })?;

        Ok(data.claims)
    }

    /// Validates a session token and returns the user id. Exchange tokens are
    /// rejected here regardless of their expiry.
    pub fn verify_session(&self, token: &str) -> Result<i32, TokenError> {
        let claims = self.decode(token)?;

        if claims.kind != TokenKind::Session {
            return Err(TokenError::Invalid);
        }

        claims.user_id()
    }

    /// Validates an exchange token for the finalize step.
    pub fn verify_exchange(&self, token: &str) -> Result<ExchangeGrant, TokenError> {
        let claims = self.decode(token)?;

        if claims.kind != TokenKind::Exchange {
            return Err(TokenError::Invalid);
        }

        let jti = claims.jti.clone().ok_or(TokenError::Invalid)?;
        let user_id = claims.user_id()?;

        Ok(ExchangeGrant {
            user_id,
            jti,
            exp: claims.exp,
        })
    }
}

/// Tracks exchange-token ids that have already been redeemed, so a finalize
/// URL replayed from a log or browser history cannot mint a second session.
/// Entries are pruned once the underlying token has expired anyway.
#[derive(Default)]
pub struct ConsumedTokens {
    inner: Mutex<HashMap<String, i64>>,
}

impl ConsumedTokens {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the id was fresh; false when it was already redeemed.
    pub fn consume(&self, jti: &str, exp: i64) -> bool {
        let now = Utc::now().timestamp();
        let mut inner = self.inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner);

        inner.retain(|_, entry_exp| *entry_exp > now);

        if inner.contains_key(jti) {
            return false;
        }

        inner.insert(jti.to_string(), exp);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(secret: &str) -> AuthConfig {
        AuthConfig {
            jwt_secret: secret.to_string(),
            session_ttl_days: 30,
            exchange_ttl_seconds: 120,
        }
    }

    #[test]
    fn test_issue_and_verify_session() {
        let service = TokenService::new(&test_config("test-secret-32-bytes-long-key-01"));

        let token = service.issue_session(42).unwrap();
        let user_id = service.verify_session(&token).unwrap();

        assert_eq!(user_id, 42);
    }

    #[test]
    fn test_garbage_token_rejected() {
        let service = TokenService::new(&test_config("test-secret-32-bytes-long-key-02"));

        let result = service.verify_session("not-a-token");
        assert_eq!(result.unwrap_err(), TokenError::Invalid);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let service1 = TokenService::new(&test_config("test-secret-32-bytes-long-key-03"));
        let service2 = TokenService::new(&test_config("test-secret-32-bytes-long-key-04"));

        let token = service1.issue_session(42).unwrap();
        let result = service2.verify_session(&token);

        assert_eq!(result.unwrap_err(), TokenError::Invalid);
    }

    #[test]
    fn test_expired_token_rejected() {
        let secret = "test-secret-32-bytes-long-key-05";
        let service = TokenService::new(&test_config(secret));

        // Manually encode a session token that expired an hour ago.
        let claims = Claims {
            sub: "42".to_owned(),
            exp: Utc::now().timestamp() - 3600,
            iat: Utc::now().timestamp() - 7200,
            kind: TokenKind::Session,
            jti: None,
        };
        let encoding_key = EncodingKey::from_secret(secret.as_bytes());
        let token = jsonwebtoken::encode(&Header::default(), &claims, &encoding_key).unwrap();

        let result = service.verify_session(&token);
        assert_eq!(result.unwrap_err(), TokenError::Expired);
    }

    #[test]
    fn test_exchange_token_is_not_a_session() {
        let service = TokenService::new(&test_config("test-secret-32-bytes-long-key-06"));

        let token = service.issue_exchange(42).unwrap();

        // The authentication path must reject it even though it is unexpired.
        assert_eq!(
            service.verify_session(&token).unwrap_err(),
            TokenError::Invalid
        );

        // The finalize path accepts it.
        let grant = service.verify_exchange(&token).unwrap();
        assert_eq!(grant.user_id, 42);
        assert!(!grant.jti.is_empty());
    }

    #[test]
    fn test_session_token_is_not_an_exchange() {
        let service = TokenService::new(&test_config("test-secret-32-bytes-long-key-07"));

        let token = service.issue_session(42).unwrap();
        assert_eq!(
            service.verify_exchange(&token).unwrap_err(),
            TokenError::Invalid
        );
    }

    #[test]
    fn test_exchange_jti_unique() {
        let service = TokenService::new(&test_config("test-secret-32-bytes-long-key-08"));

        let grant1 = service
            .verify_exchange(&service.issue_exchange(42).unwrap())
            .unwrap();
        let grant2 = service
            .verify_exchange(&service.issue_exchange(42).unwrap())
            .unwrap();

        assert_ne!(grant1.jti, grant2.jti);
    }

    #[test]
    fn test_consumed_tokens_single_use() {
        let consumed = ConsumedTokens::new();
        let exp = Utc::now().timestamp() + 120;

        assert!(consumed.consume("jti-1", exp));
        assert!(!consumed.consume("jti-1", exp));
        assert!(consumed.consume("jti-2", exp));
    }

    #[test]
    fn test_consumed_tokens_pruned_after_expiry() {
        let consumed = ConsumedTokens::new();

        // Already expired, so the entry is dropped on the next call and the
        // token itself would be rejected by signature validation anyway.
        let past = Utc::now().timestamp() - 5;
        assert!(consumed.consume("jti-old", past));

        let future = Utc::now().timestamp() + 120;
        assert!(consumed.consume("jti-new", future));
        assert!(consumed.consume("jti-old", future));
    }
}
