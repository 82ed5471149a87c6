use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use serde::Serialize;

use crate::entities::products;

/// Catalog entry as served to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub image: String,
    pub stock: i32,
    pub rating: f64,
    pub reviews: i32,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<products::Model> for Product {
    fn from(model: products::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            price: model.price,
            category: model.category,
            image: model.image,
            stock: model.stock,
            rating: model.rating,
            reviews: model.num_reviews,
            is_active: model.is_active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Filters and ordering for the public catalog listing. Only active products
/// are ever returned through this path.
#[derive(Debug, Clone, Default)]
pub struct CatalogQuery {
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_rating: Option<f64>,
    pub search: Option<String>,
    pub sort: Option<String>,
    pub page: u64,
    pub page_size: u64,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub image: String,
    pub stock: i32,
    pub rating: f64,
    pub num_reviews: i32,
}

/// Partial update; absent fields keep their stored values.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub image: Option<String>,
    pub stock: Option<i32>,
    pub rating: Option<f64>,
    pub num_reviews: Option<i32>,
    pub is_active: Option<bool>,
}

pub struct ProductRepository {
    conn: DatabaseConnection,
}

impl ProductRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Browse the active catalog. Returns (products, total pages, total items).
    pub async fn list(&self, query: CatalogQuery) -> Result<(Vec<Product>, u64, u64)> {
        let mut find = products::Entity::find().filter(products::Column::IsActive.eq(true));

        if let Some(category) = query.category {
            find = find.filter(products::Column::Category.eq(category));
        }

        if let Some(min) = query.min_price {
            find = find.filter(products::Column::Price.gte(min));
        }

        if let Some(max) = query.max_price {
            find = find.filter(products::Column::Price.lte(max));
        }

        if let Some(rating) = query.min_rating {
            find = find.filter(products::Column::Rating.gte(rating));
        }

        if let Some(term) = query.search {
            // SQLite LIKE is case-insensitive for ASCII, matching the
            // storefront's expectation for free-text search.
            find = find.filter(
                Condition::any()
                    .add(products::Column::Title.contains(&term))
                    .add(products::Column::Description.contains(&term)),
            );
        }

        find = match query.sort.as_deref() {
            Some("price-asc") => find.order_by_asc(products::Column::Price),
            Some("price-desc") => find.order_by_desc(products::Column::Price),
            Some("rating") => find.order_by_desc(products::Column::Rating),
            _ => find.order_by_desc(products::Column::CreatedAt),
        };

        let paginator = find.paginate(&self.conn, query.page_size);
        let counts = paginator.num_items_and_pages().await?;
        let items = paginator.fetch_page(query.page.saturating_sub(1)).await?;

        Ok((
            items.into_iter().map(Product::from).collect(),
            counts.number_of_pages,
            counts.number_of_items,
        ))
    }

    /// Fetch by id regardless of the active flag; carts and orders may still
    /// reference a product that was later hidden from the listing.
    pub async fn get(&self, id: i32) -> Result<Option<Product>> {
        let product = products::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query product by ID")?;

        Ok(product.map(Product::from))
    }

    pub async fn get_many(&self, ids: &[i32]) -> Result<Vec<Product>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let items = products::Entity::find()
            .filter(products::Column::Id.is_in(ids.iter().copied()))
            .all(&self.conn)
            .await
            .context("Failed to query products by IDs")?;

        Ok(items.into_iter().map(Product::from).collect())
    }

    pub async fn create(&self, new_product: NewProduct) -> Result<Product> {
        let now = chrono::Utc::now().to_rfc3339();

        let active = products::ActiveModel {
            title: Set(new_product.title),
            description: Set(new_product.description),
            price: Set(new_product.price),
            category: Set(new_product.category),
            image: Set(new_product.image),
            stock: Set(new_product.stock),
            rating: Set(new_product.rating),
            num_reviews: Set(new_product.num_reviews),
            is_active: Set(true),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert product")?;

        Ok(Product::from(model))
    }

    pub async fn update(&self, id: i32, patch: ProductPatch) -> Result<Option<Product>> {
        let product = products::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query product for update")?;

        let Some(product) = product else {
            return Ok(None);
        };

        let now = chrono::Utc::now().to_rfc3339();

        let mut active: products::ActiveModel = product.into();
        if let Some(title) = patch.title {
            active.title = Set(title);
        }
        if let Some(description) = patch.description {
            active.description = Set(description);
        }
        if let Some(price) = patch.price {
            active.price = Set(price);
        }
        if let Some(category) = patch.category {
            active.category = Set(category);
        }
        if let Some(image) = patch.image {
            active.image = Set(image);
        }
        if let Some(stock) = patch.stock {
            active.stock = Set(stock);
        }
        if let Some(rating) = patch.rating {
            active.rating = Set(rating);
        }
        if let Some(num_reviews) = patch.num_reviews {
            active.num_reviews = Set(num_reviews);
        }
        if let Some(is_active) = patch.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(now);
        let model = active.update(&self.conn).await?;

        Ok(Some(Product::from(model)))
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = products::Entity::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete product")?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count(&self) -> Result<u64> {
        let count = products::Entity::find()
            .count(&self.conn)
            .await
            .context("Failed to count products")?;

        Ok(count)
    }
}
