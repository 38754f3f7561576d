use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One line of a user's cart. At most one line exists per (user, product);
/// repeated adds merge into the existing line instead of creating another.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
  pub id: Uuid,
  pub user_id: Uuid,
  pub product_id: Uuid,
  pub quantity: i32,
  pub added_at: DateTime<Utc>,
}

impl CartItem {
  pub fn new(user_id: Uuid, product_id: Uuid, quantity: i32) -> Self {
    Self {
      id: Uuid::new_v4(),
      user_id,
      product_id,
      quantity,
      added_at: Utc::now(),
    }
  }
}
