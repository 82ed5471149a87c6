pub use super::cart_items::Entity as CartItems;
pub use super::order_items::Entity as OrderItems;
pub use super::orders::Entity as Orders;
pub use super::products::Entity as Products;
pub use super::users::Entity as Users;
pub use super::wishlist_items::Entity as WishlistItems;
