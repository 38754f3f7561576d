//! Business logic, between the HTTP handlers and the stores.

pub mod auth_service;
pub mod cart_service;
pub mod order_service;
pub mod payment;
pub mod payment_mock;
pub mod payment_stripe;

pub use cart_service::CartService;
pub use order_service::OrderService;
pub use payment::PaymentGateway;
pub use payment_mock::MockGateway;
pub use payment_stripe::StripeGateway;
