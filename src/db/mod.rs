use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::entities::orders;

pub mod migrator;
pub mod repositories;

pub use repositories::analytics::{CategorySales, RevenueBucket, StatusCount};
pub use repositories::cart::CartLine;
pub use repositories::order::{
    CustomerSummary, NewOrder, NewOrderItem, OrderItemView, OrderView, ShippingAddress,
};
pub use repositories::product::{CatalogQuery, NewProduct, Product, ProductPatch};
pub use repositories::user::{Address, NewUser, ProfileUpdate, User, hash_password};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn product_repo(&self) -> repositories::product::ProductRepository {
        repositories::product::ProductRepository::new(self.conn.clone())
    }

    fn cart_repo(&self) -> repositories::cart::CartRepository {
        repositories::cart::CartRepository::new(self.conn.clone())
    }

    fn order_repo(&self) -> repositories::order::OrderRepository {
        repositories::order::OrderRepository::new(self.conn.clone())
    }

    fn wishlist_repo(&self) -> repositories::wishlist::WishlistRepository {
        repositories::wishlist::WishlistRepository::new(self.conn.clone())
    }

    fn analytics_repo(&self) -> repositories::analytics::AnalyticsRepository {
        repositories::analytics::AnalyticsRepository::new(self.conn.clone())
    }

    // ========== Users ==========

    pub async fn create_user(&self, new_user: NewUser) -> Result<User> {
        self.user_repo().create(new_user).await
    }

    pub async fn get_user_by_id(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.user_repo().get_by_email(email).await
    }

    pub async fn get_user_for_oauth(
        &self,
        google_id: &str,
        email: &str,
    ) -> Result<Option<User>> {
        self.user_repo()
            .get_by_google_id_or_email(google_id, email)
            .await
    }

    pub async fn link_google_id(&self, id: i32, google_id: &str) -> Result<User> {
        self.user_repo().link_google_id(id, google_id).await
    }

    pub async fn verify_user_password(&self, email: &str, password: &str) -> Result<bool> {
        self.user_repo().verify_password(email, password).await
    }

    pub async fn update_user_profile(
        &self,
        id: i32,
        update: ProfileUpdate,
    ) -> Result<Option<User>> {
        self.user_repo().update_profile(id, update).await
    }

    pub async fn list_users(
        &self,
        page: u64,
        page_size: u64,
        search: Option<String>,
    ) -> Result<(Vec<User>, u64, u64)> {
        self.user_repo().list(page, page_size, search).await
    }

    pub async fn count_customers(&self) -> Result<u64> {
        self.user_repo().count_customers().await
    }

    // ========== Products ==========

    pub async fn list_products(&self, query: CatalogQuery) -> Result<(Vec<Product>, u64, u64)> {
        self.product_repo().list(query).await
    }

    pub async fn get_product(&self, id: i32) -> Result<Option<Product>> {
        self.product_repo().get(id).await
    }

    pub async fn get_products_by_ids(&self, ids: &[i32]) -> Result<Vec<Product>> {
        self.product_repo().get_many(ids).await
    }

    pub async fn create_product(&self, new_product: NewProduct) -> Result<Product> {
        self.product_repo().create(new_product).await
    }

    pub async fn update_product(&self, id: i32, patch: ProductPatch) -> Result<Option<Product>> {
        self.product_repo().update(id, patch).await
    }

    pub async fn delete_product(&self, id: i32) -> Result<bool> {
        self.product_repo().delete(id).await
    }

    pub async fn count_products(&self) -> Result<u64> {
        self.product_repo().count().await
    }

    // ========== Cart ==========

    pub async fn cart_lines(&self, user_id: i32) -> Result<Vec<CartLine>> {
        self.cart_repo().lines(user_id).await
    }

    pub async fn get_cart_line(
        &self,
        user_id: i32,
        product_id: i32,
    ) -> Result<Option<crate::entities::cart_items::Model>> {
        self.cart_repo().get_line(user_id, product_id).await
    }

    pub async fn insert_cart_line(
        &self,
        user_id: i32,
        product_id: i32,
        quantity: i32,
    ) -> Result<()> {
        self.cart_repo()
            .insert_line(user_id, product_id, quantity)
            .await
    }

    pub async fn set_cart_quantity(
        &self,
        line: crate::entities::cart_items::Model,
        quantity: i32,
    ) -> Result<()> {
        self.cart_repo().set_quantity(line, quantity).await
    }

    pub async fn remove_cart_line(&self, user_id: i32, product_id: i32) -> Result<bool> {
        self.cart_repo().remove_line(user_id, product_id).await
    }

    pub async fn clear_cart(&self, user_id: i32) -> Result<()> {
        self.cart_repo().clear(user_id).await
    }

    // ========== Orders ==========

    pub async fn create_order(&self, new_order: NewOrder) -> Result<OrderView> {
        self.order_repo().create(new_order).await
    }

    pub async fn orders_for_user(&self, user_id: i32) -> Result<Vec<OrderView>> {
        self.order_repo().list_for_user(user_id).await
    }

    pub async fn get_order(&self, id: i32) -> Result<Option<OrderView>> {
        self.order_repo().get(id).await
    }

    pub async fn get_order_model(&self, id: i32) -> Result<Option<orders::Model>> {
        self.order_repo().get_model(id).await
    }

    pub async fn list_all_orders(&self, limit: Option<u64>) -> Result<Vec<OrderView>> {
        self.order_repo().list_all(limit).await
    }

    pub async fn set_order_status(
        &self,
        order: orders::Model,
        status: &str,
        payment_status: Option<&str>,
    ) -> Result<OrderView> {
        self.order_repo()
            .set_status(order, status, payment_status)
            .await
    }

    pub async fn count_orders(&self) -> Result<u64> {
        self.order_repo().count().await
    }

    // ========== Wishlist ==========

    pub async fn wishlist_products(&self, user_id: i32) -> Result<Vec<Product>> {
        self.wishlist_repo().products(user_id).await
    }

    pub async fn add_to_wishlist(&self, user_id: i32, product_id: i32) -> Result<()> {
        self.wishlist_repo().add(user_id, product_id).await
    }

    pub async fn remove_from_wishlist(&self, user_id: i32, product_id: i32) -> Result<bool> {
        self.wishlist_repo().remove(user_id, product_id).await
    }

    // ========== Analytics ==========

    pub async fn total_revenue(&self) -> Result<f64> {
        self.analytics_repo().total_revenue().await
    }

    pub async fn orders_by_status(&self) -> Result<Vec<StatusCount>> {
        self.analytics_repo().orders_by_status().await
    }

    pub async fn revenue_by_period(&self, period: &str) -> Result<Vec<RevenueBucket>> {
        self.analytics_repo().revenue_by_period(period).await
    }

    pub async fn category_sales(&self) -> Result<Vec<CategorySales>> {
        self.analytics_repo().category_sales().await
    }
}
