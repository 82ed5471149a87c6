pub mod prelude;

pub mod cart_items;
pub mod order_items;
pub mod orders;
pub mod products;
pub mod users;
pub mod wishlist_items;
