//! In-memory store implementations. Used by the test suite and by local
//! development without a database; the Postgres implementations are the
//! production path.

use crate::errors::Result;
use crate::models::{CartItem, Order, OrderPatch, PaymentStatus, Product, User};
use crate::store::{CartStore, OrderStore, ProductStore, UserStore};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, Default)]
pub struct MemoryProductStore {
  products: RwLock<HashMap<Uuid, Product>>,
}

#[async_trait]
impl ProductStore for MemoryProductStore {
  async fn list(&self) -> Result<Vec<Product>> {
    let mut products: Vec<Product> = self.products.read().values().cloned().collect();
    products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(products)
  }

  async fn get(&self, id: Uuid) -> Result<Option<Product>> {
    Ok(self.products.read().get(&id).cloned())
  }

  async fn insert(&self, product: Product) -> Result<Product> {
    self.products.write().insert(product.id, product.clone());
    Ok(product)
  }

  async fn delete(&self, id: Uuid) -> Result<bool> {
    Ok(self.products.write().remove(&id).is_some())
  }
}

#[derive(Debug, Default)]
pub struct MemoryUserStore {
  users: RwLock<HashMap<Uuid, User>>,
}

#[async_trait]
impl UserStore for MemoryUserStore {
  async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
    Ok(self.users.read().get(&id).cloned())
  }

  async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
    Ok(self.users.read().values().find(|u| u.email == email).cloned())
  }

  async fn insert(&self, user: User) -> Result<User> {
    self.users.write().insert(user.id, user.clone());
    Ok(user)
  }
}

#[derive(Debug, Default)]
pub struct MemoryCartStore {
  items: RwLock<HashMap<Uuid, CartItem>>,
}

#[async_trait]
impl CartStore for MemoryCartStore {
  async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<CartItem>> {
    let mut items: Vec<CartItem> = self
      .items
      .read()
      .values()
      .filter(|item| item.user_id == user_id)
      .cloned()
      .collect();
    items.sort_by(|a, b| a.added_at.cmp(&b.added_at));
    Ok(items)
  }

  async fn find_by_user_and_product(&self, user_id: Uuid, product_id: Uuid) -> Result<Option<CartItem>> {
    Ok(
      self
        .items
        .read()
        .values()
        .find(|item| item.user_id == user_id && item.product_id == product_id)
        .cloned(),
    )
  }

  async fn find_for_user(&self, user_id: Uuid, line_id: Uuid) -> Result<Option<CartItem>> {
    Ok(
      self
        .items
        .read()
        .get(&line_id)
        .filter(|item| item.user_id == user_id)
        .cloned(),
    )
  }

  async fn insert(&self, item: CartItem) -> Result<CartItem> {
    self.items.write().insert(item.id, item.clone());
    Ok(item)
  }

  async fn set_quantity(&self, line_id: Uuid, quantity: i32) -> Result<()> {
    if let Some(item) = self.items.write().get_mut(&line_id) {
      item.quantity = quantity;
    }
    Ok(())
  }

  async fn delete(&self, line_id: Uuid) -> Result<()> {
    self.items.write().remove(&line_id);
    Ok(())
  }

  async fn clear_for_user(&self, user_id: Uuid) -> Result<()> {
    self.items.write().retain(|_, item| item.user_id != user_id);
    Ok(())
  }
}

#[derive(Debug, Default)]
pub struct MemoryOrderStore {
  orders: RwLock<HashMap<Uuid, Order>>,
}

fn apply_patch(order: &mut Order, patch: OrderPatch) {
  if let Some(status) = patch.status {
    order.status = status;
  }
  if let Some(payment_status) = patch.payment_status {
    order.payment_status = payment_status;
  }
  if let Some(delivery_date) = patch.delivery_date {
    order.delivery_date = Some(delivery_date);
  }
  if let Some(notes) = patch.notes {
    order.notes = Some(notes);
  }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
  async fn insert(&self, order: Order) -> Result<Order> {
    self.orders.write().insert(order.id, order.clone());
    Ok(order)
  }

  async fn list_newest_first(&self) -> Result<Vec<Order>> {
    let mut orders: Vec<Order> = self.orders.read().values().cloned().collect();
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(orders)
  }

  async fn get(&self, id: Uuid) -> Result<Option<Order>> {
    Ok(self.orders.read().get(&id).cloned())
  }

  async fn find_by_session_id(&self, session_id: &str) -> Result<Option<Order>> {
    Ok(
      self
        .orders
        .read()
        .values()
        .find(|order| order.session_id.as_deref() == Some(session_id))
        .cloned(),
    )
  }

  async fn update(&self, id: Uuid, patch: OrderPatch) -> Result<Option<Order>> {
    let mut orders = self.orders.write();
    match orders.get_mut(&id) {
      Some(order) => {
        apply_patch(order, patch);
        Ok(Some(order.clone()))
      }
      None => Ok(None),
    }
  }

  async fn set_payment_status_by_session(&self, session_id: &str, status: PaymentStatus) -> Result<Option<Order>> {
    let mut orders = self.orders.write();
    let order = orders
      .values_mut()
      .find(|order| order.session_id.as_deref() == Some(session_id));
    match order {
      Some(order) => {
        order.payment_status = status;
        Ok(Some(order.clone()))
      }
      None => Ok(None),
    }
  }

  async fn delete(&self, id: Uuid) -> Result<bool> {
    Ok(self.orders.write().remove(&id).is_some())
  }
}
