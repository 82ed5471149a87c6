use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{delete, get, post, put},
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::clients::google::GoogleClient;
use crate::config::Config;
use crate::services::{AuthService, CartService, OrderService};
use crate::state::SharedState;
use crate::tokens::{ConsumedTokens, TokenService};

mod admin;
pub mod auth;
mod cart;
mod error;
mod oauth;
mod observability;
mod orders;
mod products;
mod system;
mod types;
mod validation;
mod wishlist;

pub use error::ApiError;
pub use types::*;

use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Arc<RwLock<Config>> {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn tokens(&self) -> &Arc<TokenService> {
        &self.shared.tokens
    }

    #[must_use]
    pub fn consumed_tokens(&self) -> &Arc<ConsumedTokens> {
        &self.shared.consumed_tokens
    }

    #[must_use]
    pub fn google(&self) -> &Option<Arc<GoogleClient>> {
        &self.shared.google
    }

    #[must_use]
    pub fn auth_service(&self) -> &Arc<dyn AuthService> {
        &self.shared.auth_service
    }

    #[must_use]
    pub fn cart_service(&self) -> &Arc<dyn CartService> {
        &self.shared.cart_service
    }

    #[must_use]
    pub fn order_service(&self) -> &Arc<dyn OrderService> {
        &self.shared.order_service
    }
}

#[must_use]
pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    })
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared, prometheus_handle))
}

pub async fn router(state: Arc<AppState>) -> Router {
    let cors_origins = {
        let config = state.config().read().await;
        config.server.cors_allowed_origins.clone()
    };

    let protected_routes = create_protected_router(state.clone());
    let admin_routes = create_admin_router(state.clone());

    let api_router = Router::new()
        .merge(protected_routes)
        .merge(admin_routes)
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/google", get(oauth::google_start))
        .route("/auth/google/callback", get(oauth::google_callback))
        .route("/auth/oauth/finalize", get(oauth::finalize))
        // Catalog reads are public; mutations share the path, so the admin
        // gate goes on the method router rather than a separate router.
        .route("/products", get(products::list_products))
        .route(
            "/products",
            post(products::create_product)
                .route_layer(middleware::from_fn(auth::admin_middleware))
                .route_layer(middleware::from_fn_with_state(
                    state.clone(),
                    auth::auth_middleware,
                )),
        )
        .route("/products/{id}", get(products::get_product))
        .route(
            "/products/{id}",
            put(products::update_product)
                .delete(products::delete_product)
                .route_layer(middleware::from_fn(auth::admin_middleware))
                .route_layer(middleware::from_fn_with_state(
                    state.clone(),
                    auth::auth_middleware,
                )),
        )
        .route("/system/health", get(system::health))
        .with_state(state.clone());

    // Cookie auth needs credentialed CORS, and credentialed CORS cannot use
    // wildcards, so the wildcard branch stays credential-less.
    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            .allow_credentials(true)
    };

    Router::new()
        .route("/", get(system::banner))
        .nest("/api", api_router)
        .layer(cors_layer)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::logging_middleware))
        .layer(middleware::from_fn(
            observability::security_headers_middleware,
        ))
}

fn create_protected_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/profile", get(auth::get_profile))
        .route("/auth/profile", put(auth::update_profile))
        .route("/cart", get(cart::get_cart))
        .route("/cart/add", post(cart::add_to_cart))
        .route("/cart/sync", post(cart::sync_cart))
        .route("/cart/update/{product_id}", put(cart::update_cart_item))
        .route("/cart/remove/{product_id}", delete(cart::remove_from_cart))
        .route("/cart/clear", delete(cart::clear_cart))
        .route("/orders", post(orders::place_order))
        .route("/orders", get(orders::list_my_orders))
        .route("/orders/{id}", get(orders::get_order))
        .route("/wishlist", get(wishlist::get_wishlist))
        .route("/wishlist/{product_id}", post(wishlist::add_to_wishlist))
        .route(
            "/wishlist/{product_id}",
            delete(wishlist::remove_from_wishlist),
        )
        .route_layer(middleware::from_fn_with_state(state, auth::auth_middleware))
}

// Auth is added after the role check so it wraps it and runs first; the role
// check then reads the user the auth layer stashed in extensions.
fn create_admin_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/orders/admin/all", get(orders::list_all_orders))
        .route("/orders/{id}/status", put(orders::update_order_status))
        .route("/admin/stats", get(admin::get_stats))
        .route("/admin/users", get(admin::list_users))
        .route("/admin/analytics/revenue", get(admin::revenue_analytics))
        .route("/admin/analytics/category", get(admin::category_analytics))
        .route("/system/metrics", get(observability::get_metrics))
        .route_layer(middleware::from_fn(auth::admin_middleware))
        .route_layer(middleware::from_fn_with_state(state, auth::auth_middleware))
}
