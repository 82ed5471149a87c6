pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService, OAuthLogin};
pub use auth_service_impl::SeaOrmAuthService;

pub mod cart_service;
pub mod cart_service_impl;
pub use cart_service::{CartError, CartService, SyncItem};
pub use cart_service_impl::SeaOrmCartService;

pub mod order_service;
pub mod order_service_impl;
pub use order_service::{OrderError, OrderItemInput, OrderService};
pub use order_service_impl::SeaOrmOrderService;
