use anyhow::{Context, Result};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

use crate::entities::prelude::*;
use crate::entities::wishlist_items;

use super::product::Product;

pub struct WishlistRepository {
    conn: DatabaseConnection,
}

impl WishlistRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// The user's saved products in the order they were added.
    pub async fn products(&self, user_id: i32) -> Result<Vec<Product>> {
        let rows = WishlistItems::find()
            .filter(wishlist_items::Column::UserId.eq(user_id))
            .order_by_asc(wishlist_items::Column::Id)
            .find_also_related(Products)
            .all(&self.conn)
            .await
            .context("Failed to query wishlist")?;

        Ok(rows
            .into_iter()
            .filter_map(|(_, product)| product.map(Product::from))
            .collect())
    }

    /// Set semantics: adding a product already present is a no-op.
    pub async fn add(&self, user_id: i32, product_id: i32) -> Result<()> {
        let exists = WishlistItems::find()
            .filter(wishlist_items::Column::UserId.eq(user_id))
            .filter(wishlist_items::Column::ProductId.eq(product_id))
            .count(&self.conn)
            .await
            .context("Failed to check wishlist membership")?
            > 0;

        if exists {
            return Ok(());
        }

        let active = wishlist_items::ActiveModel {
            user_id: Set(user_id),
            product_id: Set(product_id),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        WishlistItems::insert(active)
            .exec(&self.conn)
            .await
            .context("Failed to insert wishlist row")?;

        Ok(())
    }

    pub async fn remove(&self, user_id: i32, product_id: i32) -> Result<bool> {
        let result = WishlistItems::delete_many()
            .filter(wishlist_items::Column::UserId.eq(user_id))
            .filter(wishlist_items::Column::ProductId.eq(product_id))
            .exec(&self.conn)
            .await
            .context("Failed to remove wishlist row")?;

        Ok(result.rows_affected > 0)
    }
}
