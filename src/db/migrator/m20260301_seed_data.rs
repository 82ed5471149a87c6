use crate::entities::prelude::*;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const ADMIN_EMAIL: &str = "admin@quickcart.dev";
const ADMIN_PASSWORD: &[u8] = b"changeme";

/// Hash the bootstrap admin password using Argon2id
fn hash_admin_password() -> String {
    use argon2::{
        Argon2,
        password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
    };

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(ADMIN_PASSWORD, &salt)
        .expect("Failed to hash admin password")
        .to_string()
}

/// Demo catalog covering every category so a fresh install has something to
/// browse. (title, description, price, category, image, stock, rating, reviews)
const DEMO_PRODUCTS: &[(&str, &str, f64, &str, &str, i32, f64, i32)] = &[
    (
        "Wireless Noise-Cancelling Headphones",
        "Premium over-ear headphones with active noise cancellation, 30-hour battery life and plush ear cushions.",
        249.99,
        "Electronics",
        "https://images.unsplash.com/photo-1505740420928-5e560c06d30e?w=800&q=80",
        50,
        4.8,
        420,
    ),
    (
        "Smart Fitness Watch",
        "Water-resistant smartwatch that tracks heart rate, sleep and workouts, with a week of battery on a single charge.",
        399.0,
        "Electronics",
        "https://images.unsplash.com/photo-1523275335684-37898b6baf30?w=800&q=80",
        30,
        4.5,
        210,
    ),
    (
        "Professional DSLR Camera Kit",
        "24MP DSLR with 4K video, bundled with an 18-55mm lens and a padded carrying bag.",
        899.99,
        "Electronics",
        "https://images.unsplash.com/photo-1516035069371-29a1b244cc32?w=800&q=80",
        12,
        4.9,
        85,
    ),
    (
        "Classic Denim Jacket",
        "Stonewashed denim jacket with a relaxed fit and button front. A wardrobe staple that only gets better with age.",
        89.99,
        "Men",
        "https://images.unsplash.com/photo-1551028719-00167b16eac5?w=800&q=80",
        40,
        4.4,
        180,
    ),
    (
        "Slim Fit Oxford Shirt",
        "Breathable cotton oxford in a tailored cut, ready for the office or the weekend.",
        49.5,
        "Men",
        "https://images.unsplash.com/photo-1596755094514-f87e34085b2c?w=800&q=80",
        60,
        4.2,
        95,
    ),
    (
        "Floral Summer Dress",
        "Lightweight midi dress in a vintage floral print with a flattering wrap silhouette.",
        64.99,
        "Women",
        "https://images.unsplash.com/photo-1515372039744-b8f02a3ae446?w=800&q=80",
        45,
        4.6,
        230,
    ),
    (
        "Knitted Wool Cardigan",
        "Soft merino-blend cardigan with ribbed cuffs, perfect for layering through the colder months.",
        79.0,
        "Women",
        "https://images.unsplash.com/photo-1434389677669-e08b4cac3105?w=800&q=80",
        35,
        4.3,
        120,
    ),
    (
        "Kids Dinosaur Hoodie",
        "Cozy fleece-lined hoodie with a spiked hood and roaring dinosaur print. Machine washable, kid approved.",
        34.99,
        "Kids",
        "https://images.unsplash.com/photo-1503454537195-1dcabb73ffb9?w=800&q=80",
        80,
        4.7,
        310,
    ),
    (
        "Junior Canvas Sneakers",
        "Durable low-top sneakers with reinforced toes and easy velcro straps for small feet on the move.",
        42.0,
        "Kids",
        "https://images.unsplash.com/photo-1542291026-7eec264c27ff?w=800&q=80",
        55,
        4.1,
        75,
    ),
    (
        "Leather Crossbody Bag",
        "Full-grain leather bag with an adjustable strap, brass hardware and room for a tablet.",
        119.99,
        "Accessories",
        "https://images.unsplash.com/photo-1514989940723-e8e51635b782?w=800&q=80",
        25,
        4.5,
        140,
    ),
    (
        "Polarized Aviator Sunglasses",
        "Classic aviators with UV400 polarized lenses and a lightweight metal frame.",
        129.0,
        "Accessories",
        "https://images.unsplash.com/photo-1572635196237-14b3f281503f?w=800&q=80",
        100,
        4.6,
        300,
    ),
    (
        "Insulated Steel Water Bottle",
        "Double-walled stainless bottle that keeps drinks cold for 24 hours or hot for 12.",
        24.99,
        "Other",
        "https://images.unsplash.com/photo-1602143407151-7111542de6e8?w=800&q=80",
        150,
        4.4,
        520,
    ),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let now = chrono::Utc::now().to_rfc3339();

        // Bootstrap admin so the back-office is reachable on a fresh install.
        let insert = sea_orm_migration::sea_query::Query::insert()
            .into_table(Users)
            .columns([
                crate::entities::users::Column::Email,
                crate::entities::users::Column::PasswordHash,
                crate::entities::users::Column::Name,
                crate::entities::users::Column::Role,
                crate::entities::users::Column::CreatedAt,
                crate::entities::users::Column::UpdatedAt,
            ])
            .values_panic([
                ADMIN_EMAIL.into(),
                hash_admin_password().into(),
                "Admin".into(),
                "admin".into(),
                now.clone().into(),
                now.clone().into(),
            ])
            .to_owned();

        manager.exec_stmt(insert).await?;

        for (title, description, price, category, image, stock, rating, reviews) in DEMO_PRODUCTS {
            let insert = sea_orm_migration::sea_query::Query::insert()
                .into_table(Products)
                .columns([
                    crate::entities::products::Column::Title,
                    crate::entities::products::Column::Description,
                    crate::entities::products::Column::Price,
                    crate::entities::products::Column::Category,
                    crate::entities::products::Column::Image,
                    crate::entities::products::Column::Stock,
                    crate::entities::products::Column::Rating,
                    crate::entities::products::Column::NumReviews,
                    crate::entities::products::Column::IsActive,
                    crate::entities::products::Column::CreatedAt,
                    crate::entities::products::Column::UpdatedAt,
                ])
                .values_panic([
                    (*title).into(),
                    (*description).into(),
                    (*price).into(),
                    (*category).into(),
                    (*image).into(),
                    (*stock).into(),
                    (*rating).into(),
                    (*reviews).into(),
                    true.into(),
                    now.clone().into(),
                    now.clone().into(),
                ])
                .to_owned();

            manager.exec_stmt(insert).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let delete = sea_orm_migration::sea_query::Query::delete()
            .from_table(Users)
            .and_where(
                Expr::col(crate::entities::users::Column::Email).eq(ADMIN_EMAIL),
            )
            .to_owned();
        manager.exec_stmt(delete).await?;

        let delete = sea_orm_migration::sea_query::Query::delete()
            .from_table(Products)
            .to_owned();
        manager.exec_stmt(delete).await?;

        Ok(())
    }
}
