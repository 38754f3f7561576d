//! sqlx/Postgres implementations of the store traits. Order snapshots
//! (customer contact, line items) are kept as JSONB columns since they are
//! written once at checkout and read back whole.

use crate::errors::Result;
use crate::models::{CartItem, Customer, Order, OrderLine, OrderPatch, PaymentMethod, PaymentStatus, Product, User};
use crate::store::{CartStore, OrderStore, ProductStore, UserStore};
use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct PgProductStore {
  pool: PgPool,
}

impl PgProductStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl ProductStore for PgProductStore {
  async fn list(&self) -> Result<Vec<Product>> {
    let products = sqlx::query_as::<_, Product>(
      "SELECT id, name, description, category, old_price, price, image_url, created_at \
       FROM products ORDER BY created_at DESC",
    )
    .fetch_all(&self.pool)
    .await?;
    Ok(products)
  }

  async fn get(&self, id: Uuid) -> Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(
      "SELECT id, name, description, category, old_price, price, image_url, created_at \
       FROM products WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&self.pool)
    .await?;
    Ok(product)
  }

  async fn insert(&self, product: Product) -> Result<Product> {
    sqlx::query(
      "INSERT INTO products (id, name, description, category, old_price, price, image_url, created_at) \
       VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
    )
    .bind(product.id)
    .bind(&product.name)
    .bind(&product.description)
    .bind(&product.category)
    .bind(product.old_price)
    .bind(product.price)
    .bind(&product.image_url)
    .bind(product.created_at)
    .execute(&self.pool)
    .await?;
    Ok(product)
  }

  async fn delete(&self, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
      .bind(id)
      .execute(&self.pool)
      .await?;
    Ok(result.rows_affected() > 0)
  }
}

#[derive(Debug, Clone)]
pub struct PgUserStore {
  pool: PgPool,
}

impl PgUserStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl UserStore for PgUserStore {
  async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
      "SELECT id, name, email, password_hash, created_at FROM users WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&self.pool)
    .await?;
    Ok(user)
  }

  async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
      "SELECT id, name, email, password_hash, created_at FROM users WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(&self.pool)
    .await?;
    Ok(user)
  }

  async fn insert(&self, user: User) -> Result<User> {
    sqlx::query("INSERT INTO users (id, name, email, password_hash, created_at) VALUES ($1, $2, $3, $4, $5)")
      .bind(user.id)
      .bind(&user.name)
      .bind(&user.email)
      .bind(&user.password_hash)
      .bind(user.created_at)
      .execute(&self.pool)
      .await?;
    Ok(user)
  }
}

#[derive(Debug, Clone)]
pub struct PgCartStore {
  pool: PgPool,
}

impl PgCartStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl CartStore for PgCartStore {
  async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<CartItem>> {
    let items = sqlx::query_as::<_, CartItem>(
      "SELECT id, user_id, product_id, quantity, added_at FROM cart_items \
       WHERE user_id = $1 ORDER BY added_at",
    )
    .bind(user_id)
    .fetch_all(&self.pool)
    .await?;
    Ok(items)
  }

  async fn find_by_user_and_product(&self, user_id: Uuid, product_id: Uuid) -> Result<Option<CartItem>> {
    let item = sqlx::query_as::<_, CartItem>(
      "SELECT id, user_id, product_id, quantity, added_at FROM cart_items \
       WHERE user_id = $1 AND product_id = $2",
    )
    .bind(user_id)
    .bind(product_id)
    .fetch_optional(&self.pool)
    .await?;
    Ok(item)
  }

  async fn find_for_user(&self, user_id: Uuid, line_id: Uuid) -> Result<Option<CartItem>> {
    let item = sqlx::query_as::<_, CartItem>(
      "SELECT id, user_id, product_id, quantity, added_at FROM cart_items \
       WHERE id = $1 AND user_id = $2",
    )
    .bind(line_id)
    .bind(user_id)
    .fetch_optional(&self.pool)
    .await?;
    Ok(item)
  }

  async fn insert(&self, item: CartItem) -> Result<CartItem> {
    sqlx::query("INSERT INTO cart_items (id, user_id, product_id, quantity, added_at) VALUES ($1, $2, $3, $4, $5)")
      .bind(item.id)
      .bind(item.user_id)
      .bind(item.product_id)
      .bind(item.quantity)
      .bind(item.added_at)
      .execute(&self.pool)
      .await?;
    Ok(item)
  }

  async fn set_quantity(&self, line_id: Uuid, quantity: i32) -> Result<()> {
    sqlx::query("UPDATE cart_items SET quantity = $2 WHERE id = $1")
      .bind(line_id)
      .bind(quantity)
      .execute(&self.pool)
      .await?;
    Ok(())
  }

  async fn delete(&self, line_id: Uuid) -> Result<()> {
    sqlx::query("DELETE FROM cart_items WHERE id = $1")
      .bind(line_id)
      .execute(&self.pool)
      .await?;
    Ok(())
  }

  async fn clear_for_user(&self, user_id: Uuid) -> Result<()> {
    sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
      .bind(user_id)
      .execute(&self.pool)
      .await?;
    Ok(())
  }
}

#[derive(Debug, Clone)]
pub struct PgOrderStore {
  pool: PgPool,
}

impl PgOrderStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

const ORDER_COLUMNS: &str = "id, order_id, user_id, customer, items, shipping, payment_method, payment_status, \
                             session_id, payment_intent_id, notes, delivery_date, status, created_at";

fn order_from_row(row: &PgRow) -> std::result::Result<Order, sqlx::Error> {
  let payment_method_raw: String = row.try_get("payment_method")?;
  let payment_method = PaymentMethod::parse(&payment_method_raw)
    .ok_or_else(|| sqlx::Error::Decode(format!("unknown payment method '{}'", payment_method_raw).into()))?;
  let payment_status_raw: String = row.try_get("payment_status")?;
  let payment_status = PaymentStatus::parse(&payment_status_raw)
    .ok_or_else(|| sqlx::Error::Decode(format!("unknown payment status '{}'", payment_status_raw).into()))?;
  let Json(customer): Json<Customer> = row.try_get("customer")?;
  let Json(items): Json<Vec<OrderLine>> = row.try_get("items")?;

  Ok(Order {
    id: row.try_get("id")?,
    order_id: row.try_get("order_id")?,
    user_id: row.try_get("user_id")?,
    customer,
    items,
    shipping: row.try_get("shipping")?,
    payment_method,
    payment_status,
    session_id: row.try_get("session_id")?,
    payment_intent_id: row.try_get("payment_intent_id")?,
    notes: row.try_get("notes")?,
    delivery_date: row.try_get("delivery_date")?,
    status: row.try_get("status")?,
    created_at: row.try_get("created_at")?,
  })
}

#[async_trait]
impl OrderStore for PgOrderStore {
  async fn insert(&self, order: Order) -> Result<Order> {
    sqlx::query(
      "INSERT INTO orders (id, order_id, user_id, customer, items, shipping, payment_method, payment_status, \
       session_id, payment_intent_id, notes, delivery_date, status, created_at) \
       VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)",
    )
    .bind(order.id)
    .bind(&order.order_id)
    .bind(order.user_id)
    .bind(Json(&order.customer))
    .bind(Json(&order.items))
    .bind(order.shipping)
    .bind(order.payment_method.as_str())
    .bind(order.payment_status.as_str())
    .bind(&order.session_id)
    .bind(&order.payment_intent_id)
    .bind(&order.notes)
    .bind(order.delivery_date)
    .bind(&order.status)
    .bind(order.created_at)
    .execute(&self.pool)
    .await?;
    Ok(order)
  }

  async fn list_newest_first(&self) -> Result<Vec<Order>> {
    let rows = sqlx::query(&format!(
      "SELECT {} FROM orders ORDER BY created_at DESC",
      ORDER_COLUMNS
    ))
    .fetch_all(&self.pool)
    .await?;
    let orders = rows.iter().map(order_from_row).collect::<std::result::Result<_, _>>()?;
    Ok(orders)
  }

  async fn get(&self, id: Uuid) -> Result<Option<Order>> {
    let row = sqlx::query(&format!("SELECT {} FROM orders WHERE id = $1", ORDER_COLUMNS))
      .bind(id)
      .fetch_optional(&self.pool)
      .await?;
    Ok(row.as_ref().map(order_from_row).transpose()?)
  }

  async fn find_by_session_id(&self, session_id: &str) -> Result<Option<Order>> {
    let row = sqlx::query(&format!("SELECT {} FROM orders WHERE session_id = $1", ORDER_COLUMNS))
      .bind(session_id)
      .fetch_optional(&self.pool)
      .await?;
    Ok(row.as_ref().map(order_from_row).transpose()?)
  }

  async fn update(&self, id: Uuid, patch: OrderPatch) -> Result<Option<Order>> {
    let row = sqlx::query(&format!(
      "UPDATE orders SET \
         status = COALESCE($2, status), \
         payment_status = COALESCE($3, payment_status), \
         delivery_date = COALESCE($4, delivery_date), \
         notes = COALESCE($5, notes) \
       WHERE id = $1 RETURNING {}",
      ORDER_COLUMNS
    ))
    .bind(id)
    .bind(patch.status)
    .bind(patch.payment_status.map(|s| s.as_str()))
    .bind(patch.delivery_date)
    .bind(patch.notes)
    .fetch_optional(&self.pool)
    .await?;
    Ok(row.as_ref().map(order_from_row).transpose()?)
  }

  async fn set_payment_status_by_session(&self, session_id: &str, status: PaymentStatus) -> Result<Option<Order>> {
    let row = sqlx::query(&format!(
      "UPDATE orders SET payment_status = $2 WHERE session_id = $1 RETURNING {}",
      ORDER_COLUMNS
    ))
    .bind(session_id)
    .bind(status.as_str())
    .fetch_optional(&self.pool)
    .await?;
    Ok(row.as_ref().map(order_from_row).transpose()?)
  }

  async fn delete(&self, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM orders WHERE id = $1")
      .bind(id)
      .execute(&self.pool)
      .await?;
    Ok(result.rows_affected() > 0)
  }
}
