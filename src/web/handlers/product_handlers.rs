use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use futures_util::StreamExt as _;
use serde_json::json;
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::Product;
use crate::state::AppState;

pub async fn list_products(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let products = state.products.list().await?;
  Ok(HttpResponse::Ok().json(products))
}

fn multipart_error(e: actix_multipart::MultipartError) -> AppError {
  AppError::Validation(format!("Invalid multipart payload: {}", e))
}

async fn read_field_bytes(field: &mut actix_multipart::Field) -> Result<Vec<u8>, AppError> {
  let mut bytes = Vec::new();
  while let Some(chunk) = field.next().await {
    bytes.extend_from_slice(&chunk.map_err(multipart_error)?);
  }
  Ok(bytes)
}

/// Creates a product from a multipart form: text fields plus an optional
/// `image` file, which is written to the uploads directory under a
/// timestamp-prefixed name and served back via `/uploads`.
#[instrument(name = "handler::create_product", skip_all)]
pub async fn create_product(state: web::Data<AppState>, mut payload: Multipart) -> Result<HttpResponse, AppError> {
  let mut fields: HashMap<String, String> = HashMap::new();
  let mut image_url: Option<String> = None;

  while let Some(entry) = payload.next().await {
    let mut field = entry.map_err(multipart_error)?;
    let name = field.name().to_string();

    if name == "image" {
      let original_filename = field.content_disposition().get_filename().map(str::to_string);
      let bytes = read_field_bytes(&mut field).await?;
      if let Some(original) = original_filename.filter(|_| !bytes.is_empty()) {
        // Keep the original name for inspectability, but never its path parts.
        let safe_name = original.replace(['/', '\\'], "_");
        let stored_name = format!("{}-{}", Utc::now().timestamp_millis(), safe_name);
        let target = Path::new(&state.config.uploads_dir).join(&stored_name);
        tokio::fs::write(&target, &bytes)
          .await
          .map_err(|e| AppError::Internal(format!("Failed to store uploaded image: {}", e)))?;
        info!(file = %stored_name, "Product image stored");
        image_url = Some(format!("/uploads/{}", stored_name));
      }
    } else {
      let bytes = read_field_bytes(&mut field).await?;
      fields.insert(name, String::from_utf8_lossy(&bytes).into_owned());
    }
  }

  let name = fields
    .get("name")
    .map(|s| s.trim().to_string())
    .filter(|s| !s.is_empty())
    .ok_or_else(|| AppError::Validation("Product name is required".to_string()))?;
  let price = fields
    .get("price")
    .and_then(|raw| raw.trim().parse::<f64>().ok())
    .ok_or_else(|| AppError::Validation("Valid price is required".to_string()))?;
  let old_price = fields.get("oldPrice").and_then(|raw| raw.trim().parse::<f64>().ok());
  let description = fields.get("description").cloned().filter(|s| !s.is_empty());
  let category = fields.get("category").cloned().filter(|s| !s.is_empty());

  let product = state
    .products
    .insert(Product::new(name, description, category, old_price, price, image_url))
    .await?;
  Ok(HttpResponse::Created().json(product))
}

#[instrument(name = "handler::delete_product", skip_all, fields(product_id = %path))]
pub async fn delete_product(state: web::Data<AppState>, path: web::Path<Uuid>) -> Result<HttpResponse, AppError> {
  if state.products.delete(path.into_inner()).await? {
    Ok(HttpResponse::Ok().json(json!({ "message": "Product removed" })))
  } else {
    Err(AppError::NotFound("Product not found".to_string()))
  }
}
