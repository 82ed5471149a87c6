use anyhow::{Context, Result};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, LoaderTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};

use crate::entities::prelude::*;
use crate::entities::{order_items, orders, products, users};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub name: String,
    pub phone: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    #[serde(default = "default_country")]
    pub country: String,
}

fn default_country() -> String {
    "India".to_string()
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemView {
    pub product_id: i32,
    pub title: String,
    pub price: f64,
    pub image: String,
    pub quantity: i32,
}

impl From<order_items::Model> for OrderItemView {
    fn from(model: order_items::Model) -> Self {
        Self {
            product_id: model.product_id,
            title: model.title,
            price: model.price,
            image: model.image,
            quantity: model.quantity,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSummary {
    pub id: i32,
    pub name: String,
    pub email: String,
}

/// Order as served to clients. `user` carries the customer summary on
/// back-office queries and is omitted on a customer's own views.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub id: i32,
    pub user_id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<CustomerSummary>,
    pub items: Vec<OrderItemView>,
    pub total_amount: f64,
    pub status: String,
    pub shipping_address: ShippingAddress,
    pub payment_method: String,
    pub payment_status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl OrderView {
    fn from_parts(
        order: orders::Model,
        items: Vec<order_items::Model>,
        user: Option<users::Model>,
    ) -> Self {
        Self {
            id: order.id,
            user_id: order.user_id,
            user: user.map(|u| CustomerSummary {
                id: u.id,
                name: u.name,
                email: u.email,
            }),
            items: items.into_iter().map(OrderItemView::from).collect(),
            total_amount: order.total_amount,
            status: order.status,
            shipping_address: ShippingAddress {
                name: order.shipping_name,
                phone: order.shipping_phone,
                street: order.shipping_street,
                city: order.shipping_city,
                state: order.shipping_state,
                zip_code: order.shipping_zip_code,
                country: order.shipping_country,
            },
            payment_method: order.payment_method,
            payment_status: order.payment_status,
            payment_id: order.payment_id,
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}

/// Line item already resolved against the catalog, ready to freeze.
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: i32,
    pub title: String,
    pub price: f64,
    pub image: String,
    pub quantity: i32,
}

#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: i32,
    pub items: Vec<NewOrderItem>,
    pub total_amount: f64,
    pub shipping_address: ShippingAddress,
    pub payment_method: String,
}

pub struct OrderRepository {
    conn: DatabaseConnection,
}

impl OrderRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Write the order, its frozen line items and the stock decrements in one
    /// transaction so a failure leaves the catalog untouched.
    pub async fn create(&self, new_order: NewOrder) -> Result<OrderView> {
        let txn = self.conn.begin().await?;
        let now = chrono::Utc::now().to_rfc3339();

        let inserted = Orders::insert(orders::ActiveModel {
            user_id: Set(new_order.user_id),
            status: Set("pending".to_string()),
            total_amount: Set(new_order.total_amount),
            shipping_name: Set(new_order.shipping_address.name.clone()),
            shipping_phone: Set(new_order.shipping_address.phone.clone()),
            shipping_street: Set(new_order.shipping_address.street.clone()),
            shipping_city: Set(new_order.shipping_address.city.clone()),
            shipping_state: Set(new_order.shipping_address.state.clone()),
            shipping_zip_code: Set(new_order.shipping_address.zip_code.clone()),
            shipping_country: Set(new_order.shipping_address.country.clone()),
            payment_method: Set(new_order.payment_method),
            payment_status: Set("pending".to_string()),
            payment_id: Set(None),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        })
        .exec(&txn)
        .await?;

        let order_id = inserted.last_insert_id;

        let item_models: Vec<order_items::ActiveModel> = new_order
            .items
            .iter()
            .map(|item| order_items::ActiveModel {
                order_id: Set(order_id),
                product_id: Set(item.product_id),
                title: Set(item.title.clone()),
                price: Set(item.price),
                image: Set(item.image.clone()),
                quantity: Set(item.quantity),
                ..Default::default()
            })
            .collect();

        OrderItems::insert_many(item_models).exec(&txn).await?;

        for item in &new_order.items {
            Products::update_many()
                .col_expr(
                    products::Column::Stock,
                    Expr::col(products::Column::Stock).sub(item.quantity),
                )
                .filter(products::Column::Id.eq(item.product_id))
                .exec(&txn)
                .await?;
        }

        let order_model = Orders::find_by_id(order_id)
            .one(&txn)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Failed to retrieve created order"))?;
        let items = OrderItems::find()
            .filter(order_items::Column::OrderId.eq(order_id))
            .all(&txn)
            .await?;

        txn.commit().await?;

        Ok(OrderView::from_parts(order_model, items, None))
    }

    pub async fn list_for_user(&self, user_id: i32) -> Result<Vec<OrderView>> {
        let order_models = Orders::find()
            .filter(orders::Column::UserId.eq(user_id))
            .order_by_desc(orders::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("Failed to query orders for user")?;

        let items = order_models.load_many(OrderItems, &self.conn).await?;

        Ok(order_models
            .into_iter()
            .zip(items)
            .map(|(order, items)| OrderView::from_parts(order, items, None))
            .collect())
    }

    pub async fn get(&self, id: i32) -> Result<Option<OrderView>> {
        let order = Orders::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query order")?;

        let Some(order) = order else {
            return Ok(None);
        };

        let items = OrderItems::find()
            .filter(order_items::Column::OrderId.eq(order.id))
            .all(&self.conn)
            .await?;

        Ok(Some(OrderView::from_parts(order, items, None)))
    }

    pub async fn get_model(&self, id: i32) -> Result<Option<orders::Model>> {
        let order = Orders::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query order")?;

        Ok(order)
    }

    /// All orders newest first with the customer summary attached, optionally
    /// capped (the dashboard shows only the most recent few).
    pub async fn list_all(&self, limit: Option<u64>) -> Result<Vec<OrderView>> {
        let mut query = Orders::find()
            .order_by_desc(orders::Column::CreatedAt)
            .find_also_related(Users);

        if let Some(limit) = limit {
            query = query.limit(limit);
        }

        let rows = query
            .all(&self.conn)
            .await
            .context("Failed to query all orders")?;

        let (order_models, customers): (Vec<_>, Vec<_>) = rows.into_iter().unzip();
        let items = order_models.load_many(OrderItems, &self.conn).await?;

        Ok(order_models
            .into_iter()
            .zip(items)
            .zip(customers)
            .map(|((order, items), user)| OrderView::from_parts(order, items, user))
            .collect())
    }

    pub async fn set_status(
        &self,
        order: orders::Model,
        status: &str,
        payment_status: Option<&str>,
    ) -> Result<OrderView> {
        let now = chrono::Utc::now().to_rfc3339();
        let order_id = order.id;

        let mut active: orders::ActiveModel = order.into();
        active.status = Set(status.to_string());
        if let Some(payment_status) = payment_status {
            active.payment_status = Set(payment_status.to_string());
        }
        active.updated_at = Set(now);
        let updated = active.update(&self.conn).await?;

        let items = OrderItems::find()
            .filter(order_items::Column::OrderId.eq(order_id))
            .all(&self.conn)
            .await?;

        Ok(OrderView::from_parts(updated, items, None))
    }

    pub async fn count(&self) -> Result<u64> {
        let count = Orders::find()
            .count(&self.conn)
            .await
            .context("Failed to count orders")?;

        Ok(count)
    }
}
