//! Storage seams. Each store is an injected capability so the services can be
//! exercised against the in-memory implementations in tests while production
//! runs on Postgres.

pub mod memory;
pub mod postgres;

use crate::errors::Result;
use crate::models::{CartItem, Order, OrderPatch, PaymentStatus, Product, User};
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
pub trait ProductStore: Send + Sync {
  /// All products, newest first.
  async fn list(&self) -> Result<Vec<Product>>;
  async fn get(&self, id: Uuid) -> Result<Option<Product>>;
  async fn insert(&self, product: Product) -> Result<Product>;
  /// Returns false when no product with that id existed.
  async fn delete(&self, id: Uuid) -> Result<bool>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
  async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;
  async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
  async fn insert(&self, user: User) -> Result<User>;
}

#[async_trait]
pub trait CartStore: Send + Sync {
  async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<CartItem>>;
  async fn find_by_user_and_product(&self, user_id: Uuid, product_id: Uuid) -> Result<Option<CartItem>>;
  /// A line by id, only if it belongs to the given user.
  async fn find_for_user(&self, user_id: Uuid, line_id: Uuid) -> Result<Option<CartItem>>;
  async fn insert(&self, item: CartItem) -> Result<CartItem>;
  async fn set_quantity(&self, line_id: Uuid, quantity: i32) -> Result<()>;
  async fn delete(&self, line_id: Uuid) -> Result<()>;
  async fn clear_for_user(&self, user_id: Uuid) -> Result<()>;
}

#[async_trait]
pub trait OrderStore: Send + Sync {
  async fn insert(&self, order: Order) -> Result<Order>;
  /// All orders, most recent first. Store-wide: not scoped to a user.
  async fn list_newest_first(&self) -> Result<Vec<Order>>;
  async fn get(&self, id: Uuid) -> Result<Option<Order>>;
  async fn find_by_session_id(&self, session_id: &str) -> Result<Option<Order>>;
  /// Applies the allow-listed fields present in the patch. Returns the updated
  /// order, or None when no order with that id exists.
  async fn update(&self, id: Uuid, patch: OrderPatch) -> Result<Option<Order>>;
  /// Flips payment status for the order holding this checkout session id.
  async fn set_payment_status_by_session(&self, session_id: &str, status: PaymentStatus) -> Result<Option<Order>>;
  /// Returns false when no order with that id existed.
  async fn delete(&self, id: Uuid) -> Result<bool>;
}
