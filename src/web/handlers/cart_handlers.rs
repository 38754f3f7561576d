use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::errors::AppError;
use crate::services::cart_service::CartMutation;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartPayload {
  /// Either key identifies the product; `itemId` is the legacy alias.
  pub product_id: Option<Uuid>,
  pub item_id: Option<Uuid>,
  pub quantity: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateQuantityPayload {
  pub quantity: i32,
}

#[instrument(name = "handler::get_cart", skip_all, fields(user_id = %auth.user.id))]
pub async fn get_cart(state: web::Data<AppState>, auth: AuthenticatedUser) -> Result<HttpResponse, AppError> {
  let lines = state.cart_service.list(auth.user.id).await?;
  Ok(HttpResponse::Ok().json(lines))
}

#[instrument(name = "handler::add_to_cart", skip_all, fields(user_id = %auth.user.id))]
pub async fn add_to_cart(
  state: web::Data<AppState>,
  auth: AuthenticatedUser,
  payload: web::Json<AddToCartPayload>,
) -> Result<HttpResponse, AppError> {
  let product_id = payload.product_id.or(payload.item_id);
  let (product_id, quantity) = match (product_id, payload.quantity) {
    (Some(product_id), Some(quantity)) => (product_id, quantity),
    _ => {
      return Err(AppError::Validation(
        "Product identifier (productId or itemId) and quantity (number) are required".to_string(),
      ))
    }
  };

  match state.cart_service.add(auth.user.id, product_id, quantity).await? {
    CartMutation::Created(line) => Ok(HttpResponse::Created().json(line)),
    CartMutation::Updated(line) => Ok(HttpResponse::Ok().json(line)),
    CartMutation::Removed { id } => Ok(HttpResponse::Ok().json(json!({ "message": "Item removed", "id": id }))),
  }
}

#[instrument(name = "handler::update_cart_item", skip_all, fields(user_id = %auth.user.id, line_id = %path))]
pub async fn update_cart_item(
  state: web::Data<AppState>,
  auth: AuthenticatedUser,
  path: web::Path<Uuid>,
  payload: web::Json<UpdateQuantityPayload>,
) -> Result<HttpResponse, AppError> {
  let line = state
    .cart_service
    .update_quantity(auth.user.id, path.into_inner(), payload.quantity)
    .await?;
  Ok(HttpResponse::Ok().json(line))
}

#[instrument(name = "handler::delete_cart_item", skip_all, fields(user_id = %auth.user.id, line_id = %path))]
pub async fn delete_cart_item(
  state: web::Data<AppState>,
  auth: AuthenticatedUser,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  match state.cart_service.remove(auth.user.id, path.into_inner()).await? {
    CartMutation::Removed { id } => Ok(HttpResponse::Ok().json(json!({ "message": "Item deleted", "id": id }))),
    _ => Err(AppError::Internal("Unexpected cart mutation".to_string())),
  }
}

#[instrument(name = "handler::clear_cart", skip_all, fields(user_id = %auth.user.id))]
pub async fn clear_cart(state: web::Data<AppState>, auth: AuthenticatedUser) -> Result<HttpResponse, AppError> {
  state.cart_service.clear(auth.user.id).await?;
  Ok(HttpResponse::Ok().json(json!({ "message": "Cart cleared" })))
}
