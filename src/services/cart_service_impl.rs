//! `SeaORM` implementation of the `CartService` trait.

use crate::constants::cart::{QUANTITY_MAX, QUANTITY_MIN};
use crate::db::{CartLine, Store};
use crate::services::cart_service::{CartError, CartService, SyncItem};
use async_trait::async_trait;

pub struct SeaOrmCartService {
    store: Store,
}

impl SeaOrmCartService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CartService for SeaOrmCartService {
    async fn cart(&self, user_id: i32) -> Result<Vec<CartLine>, CartError> {
        let lines = self.store.cart_lines(user_id).await?;
        Ok(lines)
    }

    async fn add(
        &self,
        user_id: i32,
        product_id: i32,
        quantity: i32,
    ) -> Result<Vec<CartLine>, CartError> {
        if quantity < QUANTITY_MIN {
            return Err(CartError::QuantityOutOfRange);
        }

        let product = self
            .store
            .get_product(product_id)
            .await?
            .ok_or(CartError::ProductNotFound)?;

        // Stock is checked against the incoming quantity; what is already in
        // the cart does not count against it until checkout
        if product.stock < quantity {
            return Err(CartError::InsufficientStock);
        }

        match self.store.get_cart_line(user_id, product_id).await? {
            Some(line) => {
                let merged = (line.quantity + quantity).min(QUANTITY_MAX);
                self.store.set_cart_quantity(line, merged).await?;
            }
            None => {
                self.store
                    .insert_cart_line(user_id, product_id, quantity.min(QUANTITY_MAX))
                    .await?;
            }
        }

        let lines = self.store.cart_lines(user_id).await?;
        Ok(lines)
    }

    async fn update(
        &self,
        user_id: i32,
        product_id: i32,
        quantity: i32,
    ) -> Result<Vec<CartLine>, CartError> {
        if !(QUANTITY_MIN..=QUANTITY_MAX).contains(&quantity) {
            return Err(CartError::QuantityOutOfRange);
        }

        let line = self
            .store
            .get_cart_line(user_id, product_id)
            .await?
            .ok_or(CartError::ProductNotInCart)?;

        self.store.set_cart_quantity(line, quantity).await?;

        let lines = self.store.cart_lines(user_id).await?;
        Ok(lines)
    }

    async fn remove(&self, user_id: i32, product_id: i32) -> Result<Vec<CartLine>, CartError> {
        self.store.remove_cart_line(user_id, product_id).await?;

        let lines = self.store.cart_lines(user_id).await?;
        Ok(lines)
    }

    async fn clear(&self, user_id: i32) -> Result<(), CartError> {
        self.store.clear_cart(user_id).await?;
        Ok(())
    }

    async fn sync(&self, user_id: i32, items: &[SyncItem]) -> Result<Vec<CartLine>, CartError> {
        for item in items {
            if item.quantity < QUANTITY_MIN {
                continue;
            }

            // Products removed from the catalog since the guest cart was
            // built are silently dropped from the merge
            if self.store.get_product(item.product_id).await?.is_none() {
                continue;
            }

            match self.store.get_cart_line(user_id, item.product_id).await? {
                Some(line) => {
                    if item.quantity > line.quantity {
                        self.store.set_cart_quantity(line, item.quantity).await?;
                    }
                }
                None => {
                    self.store
                        .insert_cart_line(user_id, item.product_id, item.quantity)
                        .await?;
                }
            }
        }

        let lines = self.store.cart_lines(user_id).await?;
        Ok(lines)
    }
}
