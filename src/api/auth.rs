use axum::{
    Json,
    extract::{Extension, Request, State},
    http::{HeaderMap, StatusCode, header},
    middleware::Next,
    response::{AppendHeaders, IntoResponse},
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, AuthResponse, MessageResponse, validation};
use crate::constants::auth::SESSION_COOKIE;
use crate::db::{Address, ProfileUpdate, User};
use crate::tokens::TokenError;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct ProfileUpdateRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<Address>,
}

/// The account resolved by the auth gate, stashed in request extensions for
/// handlers downstream.
#[derive(Clone)]
pub struct AuthedUser(pub User);

// ============================================================================
// Middleware
// ============================================================================

/// Authentication gate. Credentials are accepted from:
/// 1. The session cookie (set at login)
/// 2. `Authorization: Bearer <token>` header
///
/// Every rejection looks the same to the client; the specific reason is only
/// logged.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<impl IntoResponse, ApiError> {
    let Some(token) = extract_token(&headers) else {
        tracing::debug!("Auth rejected: no credential presented");
        return Err(ApiError::not_authorized());
    };

    let user_id = state.tokens().verify_session(&token).map_err(|err| {
        match err {
            TokenError::Expired => tracing::debug!("Auth rejected: session expired"),
            TokenError::Invalid => tracing::debug!("Auth rejected: token invalid"),
        }
        ApiError::not_authorized()
    })?;

    let user = state
        .store()
        .get_user_by_id(user_id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to load user: {e}")))?;

    let Some(user) = user else {
        tracing::debug!(user_id, "Auth rejected: account no longer exists");
        return Err(ApiError::not_authorized());
    };

    tracing::Span::current().record("user_id", user.id);
    request.extensions_mut().insert(AuthedUser(user));

    Ok(next.run(request).await)
}

/// Role gate; must run after [`auth_middleware`].
pub async fn admin_middleware(request: Request, next: Next) -> Result<impl IntoResponse, ApiError> {
    let is_admin = request
        .extensions()
        .get::<AuthedUser>()
        .is_some_and(|authed| authed.0.is_admin());

    if !is_admin {
        return Err(ApiError::Forbidden("Access denied. Admin only.".to_string()));
    }

    Ok(next.run(request).await)
}

/// Pull the session token out of the request. The cookie wins over the
/// Authorization header when both are present.
fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(cookie_header) = headers.get(header::COOKIE)
        && let Ok(cookies) = cookie_header.to_str()
    {
        for cookie in cookies.split(';') {
            if let Some(rest) = cookie.trim().strip_prefix(SESSION_COOKIE)
                && let Some(value) = rest.strip_prefix('=')
                && !value.is_empty()
            {
                return Some(value.to_string());
            }
        }
    }

    if let Some(auth_header) = headers.get(header::AUTHORIZATION)
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        let token = token.trim();
        if !token.is_empty() {
            return Some(token.to_string());
        }
    }

    None
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /auth/register
/// Create a password account and sign it in
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let name = validation::validate_name(&payload.name)?;
    let email = validation::validate_email(&payload.email)?.to_lowercase();
    validation::validate_password(&payload.password)?;

    let user = state
        .auth_service()
        .register(name, &email, &payload.password)
        .await?;

    tracing::info!(user_id = user.id, "Account registered");

    let session = establish_session(&state, user).await?;
    Ok((StatusCode::CREATED, session))
}

/// POST /auth/login
/// Authenticate with email and password
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let email = validation::validate_email(&payload.email)?.to_lowercase();
    validation::validate_password(&payload.password)?;

    let user = state.auth_service().login(&email, &payload.password).await?;

    establish_session(&state, user).await
}

/// POST /auth/logout
/// Expire the session cookie
pub async fn logout(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let secure = state.config().read().await.server.secure_cookies;

    (
        AppendHeaders([(header::SET_COOKIE, clear_session_cookie(secure))]),
        Json(ApiResponse::success(MessageResponse::new(
            "Logged out successfully",
        ))),
    )
}

/// GET /auth/profile
pub async fn get_profile(
    Extension(AuthedUser(user)): Extension<AuthedUser>,
) -> Json<ApiResponse<User>> {
    Json(ApiResponse::success(user))
}

/// PUT /auth/profile
/// Update name, phone or address; email and role are not client-mutable
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(AuthedUser(user)): Extension<AuthedUser>,
    Json(payload): Json<ProfileUpdateRequest>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    let name = payload
        .name
        .map(|name| validation::validate_name(&name).map(str::to_string))
        .transpose()?;

    let updated = state
        .auth_service()
        .update_profile(
            user.id,
            ProfileUpdate {
                name,
                phone: payload.phone,
                address: payload.address,
            },
        )
        .await?;

    Ok(Json(ApiResponse::success(updated)))
}

// ============================================================================
// Helpers
// ============================================================================

/// Issue a session token for the user and package it as a cookie plus JSON
/// body. Shared by password login, registration and the OAuth finalize step.
pub(super) async fn establish_session(
    state: &Arc<AppState>,
    user: User,
) -> Result<
    (
        AppendHeaders<[(header::HeaderName, String); 1]>,
        Json<ApiResponse<AuthResponse>>,
    ),
    ApiError,
> {
    let token = state
        .tokens()
        .issue_session(user.id)
        .map_err(|_| ApiError::internal("Failed to issue session token"))?;

    let secure = state.config().read().await.server.secure_cookies;
    let max_age = state.tokens().session_ttl().num_seconds();
    let cookie = session_cookie(&token, max_age, secure);

    Ok((
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Json(ApiResponse::success(AuthResponse { user, token })),
    ))
}

/// `SameSite=Strict` requires the Secure flag, so both follow the
/// `secure_cookies` setting together; plain-HTTP development gets Lax.
fn session_cookie(token: &str, max_age_seconds: i64, secure: bool) -> String {
    if secure {
        format!(
            "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Strict; Secure; Max-Age={max_age_seconds}"
        )
    } else {
        format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_seconds}")
    }
}

fn clear_session_cookie(secure: bool) -> String {
    session_cookie("", 0, secure)
}
