use anyhow::{Context, Result};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QuerySelect,
    Statement,
};
use serde::Serialize;

use crate::entities::orders;
use crate::entities::prelude::*;

#[derive(Debug, Clone, Serialize)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RevenueBucket {
    pub period: String,
    pub revenue: f64,
    pub orders: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategorySales {
    pub category: String,
    pub revenue: f64,
    pub count: i64,
}

/// Read-only aggregations for the back-office dashboard. Cancelled orders are
/// excluded from every revenue figure.
pub struct AnalyticsRepository {
    conn: DatabaseConnection,
}

impl AnalyticsRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn total_revenue(&self) -> Result<f64> {
        let total: Option<Option<f64>> = Orders::find()
            .select_only()
            .column_as(orders::Column::TotalAmount.sum(), "total")
            .filter(orders::Column::Status.ne("cancelled"))
            .into_tuple()
            .one(&self.conn)
            .await
            .context("Failed to sum revenue")?;

        Ok(total.flatten().unwrap_or(0.0))
    }

    pub async fn orders_by_status(&self) -> Result<Vec<StatusCount>> {
        let rows: Vec<(String, i64)> = Orders::find()
            .select_only()
            .column(orders::Column::Status)
            .column_as(orders::Column::Id.count(), "count")
            .group_by(orders::Column::Status)
            .into_tuple()
            .all(&self.conn)
            .await
            .context("Failed to group orders by status")?;

        Ok(rows
            .into_iter()
            .map(|(status, count)| StatusCount { status, count })
            .collect())
    }

    /// Revenue and order counts bucketed by `strftime` over the RFC 3339
    /// `created_at` column, ascending by bucket.
    pub async fn revenue_by_period(&self, period: &str) -> Result<Vec<RevenueBucket>> {
        let format = match period {
            "day" => "%Y-%m-%d",
            "week" => "%W",
            "year" => "%Y",
            // "month" and anything unrecognized
            _ => "%Y-%m",
        };

        let backend = self.conn.get_database_backend();
        let stmt = Statement::from_sql_and_values(
            backend,
            "SELECT strftime(?, created_at) AS bucket, \
                    SUM(total_amount) AS revenue, \
                    COUNT(*) AS order_count \
             FROM orders \
             WHERE status <> 'cancelled' \
             GROUP BY bucket \
             ORDER BY bucket ASC",
            [format.into()],
        );

        let rows = self
            .conn
            .query_all(stmt)
            .await
            .context("Failed to query revenue analytics")?;

        let mut buckets = Vec::with_capacity(rows.len());
        for row in rows {
            buckets.push(RevenueBucket {
                period: row.try_get("", "bucket")?,
                revenue: row.try_get("", "revenue")?,
                orders: row.try_get("", "order_count")?,
            });
        }

        Ok(buckets)
    }

    /// Revenue (frozen line price times quantity) and units sold per category,
    /// highest revenue first.
    pub async fn category_sales(&self) -> Result<Vec<CategorySales>> {
        let backend = self.conn.get_database_backend();
        let stmt = Statement::from_string(
            backend,
            "SELECT p.category AS category, \
                    SUM(oi.price * oi.quantity) AS revenue, \
                    SUM(oi.quantity) AS unit_count \
             FROM order_items oi \
             JOIN orders o ON o.id = oi.order_id \
             JOIN products p ON p.id = oi.product_id \
             WHERE o.status <> 'cancelled' \
             GROUP BY p.category \
             ORDER BY revenue DESC"
                .to_string(),
        );

        let rows = self
            .conn
            .query_all(stmt)
            .await
            .context("Failed to query category analytics")?;

        let mut sales = Vec::with_capacity(rows.len());
        for row in rows {
            sales.push(CategorySales {
                category: row.try_get("", "category")?,
                revenue: row.try_get("", "revenue")?,
                count: row.try_get("", "unit_count")?,
            });
        }

        Ok(sales)
    }
}
