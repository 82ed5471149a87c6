pub mod analytics;
pub mod cart;
pub mod order;
pub mod product;
pub mod user;
pub mod wishlist;
