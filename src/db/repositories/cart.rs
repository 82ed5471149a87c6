use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::Serialize;

use crate::entities::cart_items;
use crate::entities::prelude::*;

use super::product::Product;

/// A cart line resolved to display-ready product details.
#[derive(Debug, Clone, Serialize)]
pub struct CartLine {
    pub product: Product,
    pub quantity: i32,
}

pub struct CartRepository {
    conn: DatabaseConnection,
}

impl CartRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// All lines for a user in insertion order, each joined to its product.
    /// Lines whose product row has vanished are dropped from the view.
    pub async fn lines(&self, user_id: i32) -> Result<Vec<CartLine>> {
        let rows = CartItems::find()
            .filter(cart_items::Column::UserId.eq(user_id))
            .order_by_asc(cart_items::Column::Id)
            .find_also_related(Products)
            .all(&self.conn)
            .await
            .context("Failed to query cart lines")?;

        Ok(rows
            .into_iter()
            .filter_map(|(line, product)| {
                product.map(|p| CartLine {
                    product: Product::from(p),
                    quantity: line.quantity,
                })
            })
            .collect())
    }

    pub async fn get_line(
        &self,
        user_id: i32,
        product_id: i32,
    ) -> Result<Option<cart_items::Model>> {
        let line = CartItems::find()
            .filter(cart_items::Column::UserId.eq(user_id))
            .filter(cart_items::Column::ProductId.eq(product_id))
            .one(&self.conn)
            .await
            .context("Failed to query cart line")?;

        Ok(line)
    }

    pub async fn insert_line(&self, user_id: i32, product_id: i32, quantity: i32) -> Result<()> {
        let now = chrono::Utc::now().to_rfc3339();

        let active = cart_items::ActiveModel {
            user_id: Set(user_id),
            product_id: Set(product_id),
            quantity: Set(quantity),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        CartItems::insert(active)
            .exec(&self.conn)
            .await
            .context("Failed to insert cart line")?;

        Ok(())
    }

    pub async fn set_quantity(&self, line: cart_items::Model, quantity: i32) -> Result<()> {
        let now = chrono::Utc::now().to_rfc3339();

        let mut active: cart_items::ActiveModel = line.into();
        active.quantity = Set(quantity);
        active.updated_at = Set(now);
        active.update(&self.conn).await?;

        Ok(())
    }

    /// Remove one product's line. Removing an absent line is a no-op.
    pub async fn remove_line(&self, user_id: i32, product_id: i32) -> Result<bool> {
        let result = CartItems::delete_many()
            .filter(cart_items::Column::UserId.eq(user_id))
            .filter(cart_items::Column::ProductId.eq(product_id))
            .exec(&self.conn)
            .await
            .context("Failed to remove cart line")?;

        Ok(result.rows_affected > 0)
    }

    pub async fn clear(&self, user_id: i32) -> Result<()> {
        CartItems::delete_many()
            .filter(cart_items::Column::UserId.eq(user_id))
            .exec(&self.conn)
            .await
            .context("Failed to clear cart")?;

        Ok(())
    }
}
