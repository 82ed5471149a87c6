use axum::{
    Extension, Json,
    extract::{Path, State},
};
use std::sync::Arc;

use super::auth::AuthedUser;
use super::{ApiError, ApiResponse, AppState, validation};
use crate::db::Product;

// The wishlist is a plain product set, so handlers go straight to the store;
// there is no domain logic worth a service layer here.

pub async fn get_wishlist(
    State(state): State<Arc<AppState>>,
    Extension(AuthedUser(user)): Extension<AuthedUser>,
) -> Result<Json<ApiResponse<Vec<Product>>>, ApiError> {
    let products = state.store().wishlist_products(user.id).await?;
    Ok(Json(ApiResponse::success(products)))
}

pub async fn add_to_wishlist(
    State(state): State<Arc<AppState>>,
    Extension(AuthedUser(user)): Extension<AuthedUser>,
    Path(product_id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<Product>>>, ApiError> {
    validation::validate_id(product_id)?;

    if state.store().get_product(product_id).await?.is_none() {
        return Err(ApiError::NotFound("Product not found".to_string()));
    }

    state.store().add_to_wishlist(user.id, product_id).await?;

    let products = state.store().wishlist_products(user.id).await?;
    Ok(Json(ApiResponse::success(products)))
}

pub async fn remove_from_wishlist(
    State(state): State<Arc<AppState>>,
    Extension(AuthedUser(user)): Extension<AuthedUser>,
    Path(product_id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<Product>>>, ApiError> {
    validation::validate_id(product_id)?;

    state
        .store()
        .remove_from_wishlist(user.id, product_id)
        .await?;

    let products = state.store().wishlist_products(user.id).await?;
    Ok(Json(ApiResponse::success(products)))
}
