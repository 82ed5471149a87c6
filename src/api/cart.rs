use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::auth::AuthedUser;
use super::{ApiError, ApiResponse, AppState, CartDto, MessageResponse, validation};
use crate::services::SyncItem;

// ============================================================================
// Request Types
// ============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: i32,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

const fn default_quantity() -> i32 {
    1
}

#[derive(Deserialize)]
pub struct UpdateCartRequest {
    pub quantity: i32,
}

/// `items` stays optional so a malformed guest cart yields a 400 with a clear
/// message instead of a bare deserialization error.
#[derive(Deserialize)]
pub struct SyncCartRequest {
    pub items: Option<Vec<SyncItem>>,
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn get_cart(
    State(state): State<Arc<AppState>>,
    Extension(AuthedUser(user)): Extension<AuthedUser>,
) -> Result<Json<ApiResponse<CartDto>>, ApiError> {
    let items = state.cart_service().cart(user.id).await?;
    Ok(Json(ApiResponse::success(CartDto { items })))
}

pub async fn add_to_cart(
    State(state): State<Arc<AppState>>,
    Extension(AuthedUser(user)): Extension<AuthedUser>,
    Json(payload): Json<AddToCartRequest>,
) -> Result<Json<ApiResponse<CartDto>>, ApiError> {
    validation::validate_id(payload.product_id)?;

    let items = state
        .cart_service()
        .add(user.id, payload.product_id, payload.quantity)
        .await?;

    Ok(Json(ApiResponse::success(CartDto { items })))
}

pub async fn update_cart_item(
    State(state): State<Arc<AppState>>,
    Extension(AuthedUser(user)): Extension<AuthedUser>,
    Path(product_id): Path<i32>,
    Json(payload): Json<UpdateCartRequest>,
) -> Result<Json<ApiResponse<CartDto>>, ApiError> {
    validation::validate_id(product_id)?;

    let items = state
        .cart_service()
        .update(user.id, product_id, payload.quantity)
        .await?;

    Ok(Json(ApiResponse::success(CartDto { items })))
}

pub async fn remove_from_cart(
    State(state): State<Arc<AppState>>,
    Extension(AuthedUser(user)): Extension<AuthedUser>,
    Path(product_id): Path<i32>,
) -> Result<Json<ApiResponse<CartDto>>, ApiError> {
    validation::validate_id(product_id)?;

    let items = state.cart_service().remove(user.id, product_id).await?;

    Ok(Json(ApiResponse::success(CartDto { items })))
}

pub async fn clear_cart(
    State(state): State<Arc<AppState>>,
    Extension(AuthedUser(user)): Extension<AuthedUser>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.cart_service().clear(user.id).await?;

    Ok(Json(ApiResponse::success(MessageResponse::new(
        "Cart cleared successfully",
    ))))
}

pub async fn sync_cart(
    State(state): State<Arc<AppState>>,
    Extension(AuthedUser(user)): Extension<AuthedUser>,
    Json(payload): Json<SyncCartRequest>,
) -> Result<Json<ApiResponse<CartDto>>, ApiError> {
    let Some(items) = payload.items else {
        return Err(ApiError::validation("Invalid cart data"));
    };

    let items = state.cart_service().sync(user.id, &items).await?;

    Ok(Json(ApiResponse::success(CartDto { items })))
}
