use std::sync::Arc;
use tokio::sync::RwLock;

use crate::clients::google::GoogleClient;
use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AuthService, CartService, OrderService, SeaOrmAuthService, SeaOrmCartService,
    SeaOrmOrderService,
};
use crate::tokens::{ConsumedTokens, TokenService};

/// Build a shared HTTP client with reasonable defaults for API calls.
/// This client should be reused across all HTTP-based services to enable
/// connection pooling and avoid socket exhaustion.
fn build_shared_http_client(timeout_seconds: u64) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_seconds))
        .user_agent("QuickCart/1.0")
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))
}

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub tokens: Arc<TokenService>,

    /// Exchange token jtis already redeemed, so a leaked redirect URL cannot
    /// be replayed into a second session.
    pub consumed_tokens: Arc<ConsumedTokens>,

    /// `None` when Google credentials are not configured; the OAuth routes
    /// then redirect back to the storefront with an error marker.
    pub google: Option<Arc<GoogleClient>>,

    pub auth_service: Arc<dyn AuthService>,

    pub cart_service: Arc<dyn CartService>,

    pub order_service: Arc<dyn OrderService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let tokens = Arc::new(TokenService::new(&config.auth));
        let consumed_tokens = Arc::new(ConsumedTokens::default());

        let google = if config.google.is_configured() {
            let http_client = build_shared_http_client(30)?;
            Some(Arc::new(GoogleClient::new(http_client, &config.google)))
        } else {
            tracing::warn!("Google OAuth credentials missing; Google sign-in is disabled");
            None
        };

        let auth_service: Arc<dyn AuthService> = Arc::new(SeaOrmAuthService::new(
            store.clone(),
            config.security.clone(),
        ));

        let cart_service: Arc<dyn CartService> = Arc::new(SeaOrmCartService::new(store.clone()));

        let order_service: Arc<dyn OrderService> =
            Arc::new(SeaOrmOrderService::new(store.clone()));

        let config = Arc::new(RwLock::new(config));

        Ok(Self {
            config,
            store,
            tokens,
            consumed_tokens,
            google,
            auth_service,
            cart_service,
            order_service,
        })
    }
}
