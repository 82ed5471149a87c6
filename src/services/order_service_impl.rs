//! `SeaORM` implementation of the `OrderService` trait.

use crate::constants::orders::{PAYMENT_METHODS, STATUSES};
use crate::db::{NewOrder, NewOrderItem, OrderView, ShippingAddress, Store};
use crate::services::order_service::{OrderError, OrderItemInput, OrderService};
use async_trait::async_trait;

pub struct SeaOrmOrderService {
    store: Store,
}

impl SeaOrmOrderService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

/// Collapses repeated product ids into one line each so the stock check sees
/// the real total per product.
fn merge_lines(items: Vec<OrderItemInput>) -> Vec<OrderItemInput> {
    let mut merged: Vec<OrderItemInput> = Vec::with_capacity(items.len());

    for item in items {
        if let Some(existing) = merged.iter_mut().find(|m| m.product_id == item.product_id) {
            existing.quantity += item.quantity;
        } else {
            merged.push(item);
        }
    }

    merged
}

fn validate_shipping(address: &ShippingAddress) -> Result<(), OrderError> {
    let required = [
        &address.name,
        &address.phone,
        &address.street,
        &address.city,
        &address.state,
        &address.zip_code,
    ];

    if required.iter().any(|field| field.trim().is_empty()) {
        return Err(OrderError::Validation(
            "Shipping address is incomplete".to_string(),
        ));
    }

    Ok(())
}

#[async_trait]
impl OrderService for SeaOrmOrderService {
    async fn place(
        &self,
        user_id: i32,
        items: Vec<OrderItemInput>,
        shipping_address: ShippingAddress,
        payment_method: &str,
    ) -> Result<OrderView, OrderError> {
        if items.is_empty() {
            return Err(OrderError::Validation(
                "Order must contain at least one item".to_string(),
            ));
        }

        if !PAYMENT_METHODS.contains(&payment_method) {
            return Err(OrderError::Validation(
                "Invalid payment method".to_string(),
            ));
        }

        validate_shipping(&shipping_address)?;

        let items = merge_lines(items);

        if items.iter().any(|item| item.quantity < 1) {
            return Err(OrderError::Validation(
                "Item quantity must be at least 1".to_string(),
            ));
        }

        let ids: Vec<i32> = items.iter().map(|item| item.product_id).collect();
        let products = self.store.get_products_by_ids(&ids).await?;

        // Resolve every line against the catalog before touching stock
        let mut frozen = Vec::with_capacity(items.len());
        let mut total = 0.0;

        for item in &items {
            let product = products
                .iter()
                .find(|p| p.id == item.product_id)
                .ok_or(OrderError::ProductNotFound)?;

            if product.stock < item.quantity {
                return Err(OrderError::InsufficientStock);
            }

            total += product.price * f64::from(item.quantity);
            frozen.push(NewOrderItem {
                product_id: product.id,
                title: product.title.clone(),
                price: product.price,
                image: product.image.clone(),
                quantity: item.quantity,
            });
        }

        let order = self
            .store
            .create_order(NewOrder {
                user_id,
                items: frozen,
                total_amount: total,
                shipping_address,
                payment_method: payment_method.to_string(),
            })
            .await?;

        Ok(order)
    }

    async fn list_for_user(&self, user_id: i32) -> Result<Vec<OrderView>, OrderError> {
        let orders = self.store.orders_for_user(user_id).await?;
        Ok(orders)
    }

    async fn get(
        &self,
        order_id: i32,
        user_id: i32,
        is_admin: bool,
    ) -> Result<OrderView, OrderError> {
        let order = self
            .store
            .get_order(order_id)
            .await?
            .ok_or(OrderError::OrderNotFound)?;

        if order.user_id != user_id && !is_admin {
            return Err(OrderError::Forbidden);
        }

        Ok(order)
    }

    async fn list_all(&self) -> Result<Vec<OrderView>, OrderError> {
        let orders = self.store.list_all_orders(None).await?;
        Ok(orders)
    }

    async fn update_status(&self, order_id: i32, status: &str) -> Result<OrderView, OrderError> {
        if !STATUSES.contains(&status) {
            return Err(OrderError::InvalidStatus);
        }

        let order = self
            .store
            .get_order_model(order_id)
            .await?
            .ok_or(OrderError::OrderNotFound)?;

        match order.status.as_str() {
            "delivered" => {
                return Err(OrderError::Validation(
                    "Delivered orders cannot be updated".to_string(),
                ));
            }
            "cancelled" => {
                return Err(OrderError::Validation(
                    "Cancelled orders cannot be updated".to_string(),
                ));
            }
            _ => {}
        }

        // Cash on delivery settles when the parcel lands
        let payment_status = (status == "delivered"
            && order.payment_method == "cash"
            && order.payment_status == "pending")
            .then_some("completed");

        let updated = self
            .store
            .set_order_status(order, status, payment_status)
            .await?;

        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(product_id: i32, quantity: i32) -> OrderItemInput {
        OrderItemInput {
            product_id,
            quantity,
        }
    }

    fn address() -> ShippingAddress {
        ShippingAddress {
            name: "Casey Jordan".to_string(),
            phone: "+91 98765 43210".to_string(),
            street: "42 MG Road".to_string(),
            city: "Bengaluru".to_string(),
            state: "Karnataka".to_string(),
            zip_code: "560001".to_string(),
            country: "India".to_string(),
        }
    }

    #[test]
    fn test_merge_lines_sums_duplicates() {
        let merged = merge_lines(vec![line(3, 2), line(7, 1), line(3, 4)]);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].product_id, 3);
        assert_eq!(merged[0].quantity, 6);
        assert_eq!(merged[1].product_id, 7);
        assert_eq!(merged[1].quantity, 1);
    }

    #[test]
    fn test_merge_lines_keeps_distinct_lines() {
        let merged = merge_lines(vec![line(1, 1), line(2, 2), line(3, 3)]);

        assert_eq!(merged.len(), 3);
        assert_eq!(merged[2].quantity, 3);
    }

    #[test]
    fn test_merge_lines_empty() {
        assert!(merge_lines(Vec::new()).is_empty());
    }

    #[test]
    fn test_validate_shipping_accepts_complete_address() {
        assert!(validate_shipping(&address()).is_ok());
    }

    #[test]
    fn test_validate_shipping_rejects_blank_fields() {
        let mut missing_city = address();
        missing_city.city = String::new();
        assert!(validate_shipping(&missing_city).is_err());

        let mut whitespace_zip = address();
        whitespace_zip.zip_code = "   ".to_string();
        assert!(matches!(
            validate_shipping(&whitespace_zip),
            Err(OrderError::Validation(msg)) if msg == "Shipping address is incomplete"
        ));
    }
}
