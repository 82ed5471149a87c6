use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::auth::AuthedUser;
use super::{ApiError, ApiResponse, AppState, validation};
use crate::db::{OrderView, ShippingAddress};
use crate::services::OrderItemInput;

// ============================================================================
// Request Types
// ============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    #[serde(default)]
    pub items: Vec<OrderItemInput>,
    pub shipping_address: ShippingAddress,
    #[serde(default = "default_payment_method")]
    pub payment_method: String,
}

fn default_payment_method() -> String {
    "cash".to_string()
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn place_order(
    State(state): State<Arc<AppState>>,
    Extension(AuthedUser(user)): Extension<AuthedUser>,
    Json(payload): Json<PlaceOrderRequest>,
) -> Result<(StatusCode, Json<ApiResponse<OrderView>>), ApiError> {
    let order = state
        .order_service()
        .place(
            user.id,
            payload.items,
            payload.shipping_address,
            &payload.payment_method,
        )
        .await?;

    tracing::info!(
        order_id = order.id,
        user_id = user.id,
        total = order.total_amount,
        "Order placed"
    );

    Ok((StatusCode::CREATED, Json(ApiResponse::success(order))))
}

pub async fn list_my_orders(
    State(state): State<Arc<AppState>>,
    Extension(AuthedUser(user)): Extension<AuthedUser>,
) -> Result<Json<ApiResponse<Vec<OrderView>>>, ApiError> {
    let orders = state.order_service().list_for_user(user.id).await?;
    Ok(Json(ApiResponse::success(orders)))
}

pub async fn get_order(
    State(state): State<Arc<AppState>>,
    Extension(AuthedUser(user)): Extension<AuthedUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<OrderView>>, ApiError> {
    validation::validate_id(id)?;

    let order = state
        .order_service()
        .get(id, user.id, user.is_admin())
        .await?;

    Ok(Json(ApiResponse::success(order)))
}

pub async fn list_all_orders(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<OrderView>>>, ApiError> {
    let orders = state.order_service().list_all().await?;
    Ok(Json(ApiResponse::success(orders)))
}

pub async fn update_order_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<ApiResponse<OrderView>>, ApiError> {
    validation::validate_id(id)?;

    let order = state
        .order_service()
        .update_status(id, &payload.status)
        .await?;

    tracing::info!(order_id = id, status = %order.status, "Order status updated");

    Ok(Json(ApiResponse::success(order)))
}
