//! Domain service for order placement and fulfilment.
//!
//! Placement freezes catalog data (title, price, image) into the order so
//! later product edits never rewrite history; totals are always computed
//! server-side from the frozen prices.

use serde::Deserialize;
use thiserror::Error;

use crate::db::{OrderView, ShippingAddress};

/// Errors specific to order operations.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Product not found")]
    ProductNotFound,

    #[error("Insufficient stock")]
    InsufficientStock,

    #[error("Order not found")]
    OrderNotFound,

    #[error("Not authorized to view this order")]
    Forbidden,

    #[error("Invalid order status")]
    InvalidStatus,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for OrderError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for OrderError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// One requested line of a new order. Only the product id and quantity are
/// trusted from the client; everything else is resolved from the catalog.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemInput {
    pub product_id: i32,
    pub quantity: i32,
}

/// Domain service trait for orders.
#[async_trait::async_trait]
pub trait OrderService: Send + Sync {
    /// Places an order: validates stock, freezes per-item catalog data,
    /// computes the total and decrements stock, all atomically.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::ProductNotFound`] when any line references an
    /// unknown product and [`OrderError::InsufficientStock`] when stock
    /// cannot cover a line.
    async fn place(
        &self,
        user_id: i32,
        items: Vec<OrderItemInput>,
        shipping_address: ShippingAddress,
        payment_method: &str,
    ) -> Result<OrderView, OrderError>;

    /// Returns the user's own orders, newest first.
    async fn list_for_user(&self, user_id: i32) -> Result<Vec<OrderView>, OrderError>;

    /// Fetches one order. Customers may only see their own; admins may see
    /// any.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::Forbidden`] when a customer requests an order
    /// that is not theirs.
    async fn get(&self, order_id: i32, user_id: i32, is_admin: bool)
    -> Result<OrderView, OrderError>;

    /// Returns every order with customer summaries, newest first.
    async fn list_all(&self) -> Result<Vec<OrderView>, OrderError>;

    /// Moves an order to a new status. Delivered and cancelled orders are
    /// terminal. Delivering a cash-on-delivery order also marks its payment
    /// completed.
    async fn update_status(&self, order_id: i32, status: &str) -> Result<OrderView, OrderError>;
}
