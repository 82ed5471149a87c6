use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, MessageResponse, ProductListResponse, validation};
use crate::constants::catalog;
use crate::db::{CatalogQuery, NewProduct, Product, ProductPatch};

// ============================================================================
// Request Types
// ============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListQuery {
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub rating: Option<f64>,
    pub search: Option<String>,
    pub sort: Option<String>,
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_page_size")]
    pub limit: u64,
}

const fn default_page() -> u64 {
    1
}

const fn default_page_size() -> u64 {
    catalog::DEFAULT_PAGE_SIZE
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub category: String,
    pub image: String,
    #[serde(default)]
    pub stock: i32,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub reviews: i32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub image: Option<String>,
    pub stock: Option<i32>,
    pub rating: Option<f64>,
    pub reviews: Option<i32>,
    pub is_active: Option<bool>,
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn list_products(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ProductListQuery>,
) -> Result<Json<ApiResponse<ProductListResponse>>, ApiError> {
    let query = CatalogQuery {
        category: params.category,
        min_price: params.min_price,
        max_price: params.max_price,
        min_rating: params.rating,
        search: params.search,
        sort: params.sort,
        page: params.page.max(1),
        page_size: params.limit.clamp(1, 100),
    };
    let page = query.page;

    let (products, pages, total) = state.store().list_products(query).await?;

    Ok(Json(ApiResponse::success(ProductListResponse {
        products,
        page,
        pages,
        total,
    })))
}

pub async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Product>>, ApiError> {
    validation::validate_id(id)?;

    let product = state
        .store()
        .get_product(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?;

    Ok(Json(ApiResponse::success(product)))
}

pub async fn create_product(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Product>>), ApiError> {
    validation::validate_title(&payload.title)?;
    validation::validate_price(payload.price)?;
    validation::validate_category(&payload.category)?;
    validation::validate_image(&payload.image)?;
    validation::validate_stock(payload.stock)?;
    validation::validate_rating(payload.rating)?;

    let product = state
        .store()
        .create_product(NewProduct {
            title: payload.title.trim().to_string(),
            description: payload.description,
            price: payload.price,
            category: payload.category,
            image: payload.image.trim().to_string(),
            stock: payload.stock,
            rating: payload.rating,
            num_reviews: payload.reviews.max(0),
        })
        .await?;

    tracing::info!(product_id = product.id, title = %product.title, "Product created");

    Ok((StatusCode::CREATED, Json(ApiResponse::success(product))))
}

pub async fn update_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateProductRequest>,
) -> Result<Json<ApiResponse<Product>>, ApiError> {
    validation::validate_id(id)?;

    if let Some(title) = &payload.title {
        validation::validate_title(title)?;
    }
    if let Some(price) = payload.price {
        validation::validate_price(price)?;
    }
    if let Some(category) = &payload.category {
        validation::validate_category(category)?;
    }
    if let Some(image) = &payload.image {
        validation::validate_image(image)?;
    }
    if let Some(stock) = payload.stock {
        validation::validate_stock(stock)?;
    }
    if let Some(rating) = payload.rating {
        validation::validate_rating(rating)?;
    }

    let patch = ProductPatch {
        title: payload.title.map(|t| t.trim().to_string()),
        description: payload.description,
        price: payload.price,
        category: payload.category,
        image: payload.image.map(|i| i.trim().to_string()),
        stock: payload.stock,
        rating: payload.rating,
        num_reviews: payload.reviews,
        is_active: payload.is_active,
    };

    let product = state
        .store()
        .update_product(id, patch)
        .await?
        .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?;

    Ok(Json(ApiResponse::success(product)))
}

pub async fn delete_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    validation::validate_id(id)?;

    if !state.store().delete_product(id).await? {
        return Err(ApiError::NotFound("Product not found".to_string()));
    }

    tracing::info!(product_id = id, "Product removed");

    Ok(Json(ApiResponse::success(MessageResponse::new(
        "Product removed successfully",
    ))))
}
