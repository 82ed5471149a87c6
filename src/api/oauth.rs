//! Google sign-in flow.
//!
//! The callback never hands the browser a session directly. It issues a
//! short-lived, single-use exchange token and redirects to the storefront,
//! which trades it for a real session at the finalize endpoint. A session
//! token therefore never appears in a redirect URL, proxy log or browser
//! history.

use axum::{
    extract::{Query, State},
    response::Redirect,
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, AppState, auth};
use crate::clients::google::GoogleClient;
use crate::tokens::TokenError;

#[derive(Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub error: Option<String>,
}

#[derive(Deserialize)]
pub struct FinalizeQuery {
    pub temp: String,
}

/// GET /auth/google
/// Send the browser to Google's consent screen
pub async fn google_start(State(state): State<Arc<AppState>>) -> Redirect {
    let Some(google) = state.google() else {
        let frontend = frontend_url(&state).await;
        return Redirect::temporary(&format!("{frontend}/signin?error=oauth_missing"));
    };

    Redirect::temporary(&google.authorize_url())
}

/// GET /auth/google/callback
/// Landing point for Google's redirect. Every failure path sends the browser
/// back to the sign-in page rather than rendering an error here.
pub async fn google_callback(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CallbackQuery>,
) -> Redirect {
    let frontend = frontend_url(&state).await;

    let Some(google) = state.google() else {
        return Redirect::temporary(&format!("{frontend}/signin?error=oauth_missing"));
    };

    if let Some(error) = query.error {
        tracing::warn!(error, "Google sign-in denied at the consent screen");
        return Redirect::temporary(&format!("{frontend}/signin?error=auth_failed"));
    }

    let Some(code) = query.code else {
        tracing::warn!("Google callback arrived without a code");
        return Redirect::temporary(&format!("{frontend}/signin?error=auth_failed"));
    };

    match complete_sign_in(&state, google, &code).await {
        Ok(temp) => Redirect::temporary(&format!(
            "{frontend}/oauth/finalize?temp={}",
            urlencoding::encode(&temp)
        )),
        Err(err) => {
            tracing::warn!("Google sign-in failed: {err:#}");
            Redirect::temporary(&format!("{frontend}/signin?error=auth_failed"))
        }
    }
}

/// GET /auth/oauth/finalize?temp=...
/// Trade a single-use exchange token for a session
pub async fn finalize(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FinalizeQuery>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let grant = state.tokens().verify_exchange(&query.temp).map_err(|err| {
        match err {
            TokenError::Expired => tracing::debug!("Finalize rejected: exchange token expired"),
            TokenError::Invalid => tracing::debug!("Finalize rejected: exchange token invalid"),
        }
        ApiError::not_authorized()
    })?;

    if !state.consumed_tokens().consume(&grant.jti, grant.exp) {
        tracing::debug!("Finalize rejected: exchange token already redeemed");
        return Err(ApiError::not_authorized());
    }

    let user = state
        .store()
        .get_user_by_id(grant.user_id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to load user: {e}")))?
        .ok_or_else(ApiError::not_authorized)?;

    auth::establish_session(&state, user).await
}

async fn complete_sign_in(
    state: &Arc<AppState>,
    google: &Arc<GoogleClient>,
    code: &str,
) -> anyhow::Result<String> {
    let access_token = google.exchange_code(code).await?;
    let profile = google.fetch_profile(&access_token).await?;

    let Some(email) = profile.email else {
        anyhow::bail!("Google profile has no email address");
    };
    let email = email.to_lowercase();
    let name = profile.name.unwrap_or_else(|| email.clone());

    let login = state
        .auth_service()
        .oauth_login(&profile.id, &email, &name)
        .await
        .map_err(|e| anyhow::anyhow!("OAuth account resolution failed: {e}"))?;

    tracing::info!(
        user_id = login.user.id,
        created = login.created,
        "Google sign-in resolved"
    );

    state
        .tokens()
        .issue_exchange(login.user.id)
        .map_err(|_| anyhow::anyhow!("Failed to issue exchange token"))
}

async fn frontend_url(state: &Arc<AppState>) -> String {
    state.config().read().await.server.frontend_url.clone()
}
