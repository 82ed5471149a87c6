use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, StatsResponse, UserListResponse};
use crate::constants::{admin, orders};
use crate::db::{CategorySales, RevenueBucket};

// ============================================================================
// Request Types
// ============================================================================

#[derive(Deserialize)]
pub struct UserListQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_user_page_size")]
    pub limit: u64,
    pub search: Option<String>,
}

const fn default_page() -> u64 {
    1
}

const fn default_user_page_size() -> u64 {
    admin::USER_PAGE_SIZE
}

#[derive(Deserialize)]
pub struct RevenueQuery {
    pub period: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn get_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<StatsResponse>>, ApiError> {
    let store = state.store();

    let total_users = store.count_customers().await?;
    let total_products = store.count_products().await?;
    let total_orders = store.count_orders().await?;
    let total_revenue = store.total_revenue().await?;
    let recent_orders = store
        .list_all_orders(Some(orders::DASHBOARD_RECENT_LIMIT))
        .await?;
    let orders_by_status = store.orders_by_status().await?;

    Ok(Json(ApiResponse::success(StatsResponse {
        total_users,
        total_products,
        total_orders,
        total_revenue,
        recent_orders,
        orders_by_status,
    })))
}

pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Query(params): Query<UserListQuery>,
) -> Result<Json<ApiResponse<UserListResponse>>, ApiError> {
    let page = params.page.max(1);
    let limit = params.limit.clamp(1, 100);

    let (users, total_pages, total_users) =
        state.store().list_users(page, limit, params.search).await?;

    Ok(Json(ApiResponse::success(UserListResponse {
        users,
        total_pages,
        current_page: page,
        total_users,
    })))
}

pub async fn revenue_analytics(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RevenueQuery>,
) -> Result<Json<ApiResponse<Vec<RevenueBucket>>>, ApiError> {
    let period = params.period.as_deref().unwrap_or("month");

    let buckets = state.store().revenue_by_period(period).await?;

    Ok(Json(ApiResponse::success(buckets)))
}

pub async fn category_analytics(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<CategorySales>>>, ApiError> {
    let sales = state.store().category_sales().await?;
    Ok(Json(ApiResponse::success(sales)))
}
