use crate::config::AppConfig;
use crate::services::{CartService, OrderService};
use crate::store::{ProductStore, UserStore};
use std::sync::Arc;

/// Shared per-worker state: configuration plus the injected capabilities the
/// handlers need. Stores and the payment gateway are trait objects so tests
/// and local development can swap in the in-memory/mock implementations.
#[derive(Clone)]
pub struct AppState {
  pub config: Arc<AppConfig>,
  pub products: Arc<dyn ProductStore>,
  pub users: Arc<dyn UserStore>,
  pub cart_service: CartService,
  pub order_service: OrderService,
}
