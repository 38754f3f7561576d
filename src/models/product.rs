use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
  pub id: Uuid,
  pub name: String,
  pub description: Option<String>,
  pub category: Option<String>,
  /// Pre-discount price, shown struck through by the UI.
  pub old_price: Option<f64>,
  pub price: f64,
  /// Path under `/uploads` if an image was attached at creation.
  pub image_url: Option<String>,
  pub created_at: DateTime<Utc>,
}

impl Product {
  pub fn new(
    name: String,
    description: Option<String>,
    category: Option<String>,
    old_price: Option<f64>,
    price: f64,
    image_url: Option<String>,
  ) -> Self {
    Self {
      id: Uuid::new_v4(),
      name,
      description,
      category,
      old_price,
      price,
      image_url,
      created_at: Utc::now(),
    }
  }
}
