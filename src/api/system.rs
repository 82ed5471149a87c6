//! Service-level endpoints: the root banner and the health probe.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;

use super::{ApiResponse, AppState, HealthResponse, MessageResponse};

/// `GET /`
///
/// Plain banner for load balancers and the curious; not wrapped in the
/// response envelope.
pub async fn banner() -> Json<MessageResponse> {
    Json(MessageResponse::new("QuickCart API is running"))
}

/// `GET /api/system/health`
///
/// Reports degraded with a 503 when the database does not answer.
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let database = state.store().ping().await.is_ok();

    let (status, label) = if database {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        status,
        Json(ApiResponse::success(HealthResponse {
            status: label.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime: state.start_time.elapsed().as_secs(),
            database,
        })),
    )
}
