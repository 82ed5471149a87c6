//! Domain service for the shopping cart.
//!
//! The cart is a set of (product, quantity) lines per user. Line quantities
//! are kept in `1..=QUANTITY_MAX`; adds cap at the max rather than fail so a
//! shopper mashing the plus button lands on a full line, not an error page.

use serde::Deserialize;
use thiserror::Error;

use crate::db::CartLine;

/// Errors specific to cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    #[error("Product not found")]
    ProductNotFound,

    #[error("Insufficient stock")]
    InsufficientStock,

    #[error("Quantity must be between 1 and 10")]
    QuantityOutOfRange,

    #[error("Product not in cart")]
    ProductNotInCart,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for CartError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for CartError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// One line of a client-held guest cart submitted for reconciliation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncItem {
    pub product_id: i32,
    #[serde(default = "default_sync_quantity")]
    pub quantity: i32,
}

const fn default_sync_quantity() -> i32 {
    1
}

/// Domain service trait for cart operations. Every mutation returns the full
/// cart afterwards so clients never need a follow-up fetch.
#[async_trait::async_trait]
pub trait CartService: Send + Sync {
    /// Returns the user's cart lines, oldest first.
    async fn cart(&self, user_id: i32) -> Result<Vec<CartLine>, CartError>;

    /// Adds `quantity` of a product, merging into an existing line. The
    /// merged quantity caps at the per-line maximum.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ProductNotFound`] for an unknown product and
    /// [`CartError::InsufficientStock`] when stock cannot cover the
    /// requested quantity.
    async fn add(&self, user_id: i32, product_id: i32, quantity: i32)
    -> Result<Vec<CartLine>, CartError>;

    /// Sets a line to an exact quantity.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::QuantityOutOfRange`] outside `1..=10` and
    /// [`CartError::ProductNotInCart`] when the line does not exist.
    async fn update(
        &self,
        user_id: i32,
        product_id: i32,
        quantity: i32,
    ) -> Result<Vec<CartLine>, CartError>;

    /// Removes a line. Removing an absent line is a no-op.
    async fn remove(&self, user_id: i32, product_id: i32) -> Result<Vec<CartLine>, CartError>;

    /// Empties the cart.
    async fn clear(&self, user_id: i32) -> Result<(), CartError>;

    /// Reconciles a guest cart into the server cart after sign-in. For each
    /// submitted line the higher of the two quantities wins; unknown
    /// products and non-positive quantities are skipped rather than failing
    /// the whole merge.
    async fn sync(&self, user_id: i32, items: &[SyncItem]) -> Result<Vec<CartLine>, CartError>;
}
