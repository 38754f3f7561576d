use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{Customer, OrderLine, OrderPatch};
use crate::services::order_service::CreateOrderInput;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderPayload {
  pub customer: Customer,
  #[serde(default)]
  pub items: Vec<OrderLine>,
  pub payment_method: Option<String>,
  pub notes: Option<String>,
  pub delivery_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct ConfirmQuery {
  pub session_id: Option<String>,
}

#[instrument(name = "handler::create_order", skip_all, fields(user_id = %auth.user.id))]
pub async fn create_order(
  state: web::Data<AppState>,
  auth: AuthenticatedUser,
  payload: web::Json<CreateOrderPayload>,
) -> Result<HttpResponse, AppError> {
  let payload = payload.into_inner();
  let placed = state
    .order_service
    .create_order(
      auth.user.id,
      CreateOrderInput {
        customer: payload.customer,
        items: payload.items,
        payment_method: payload.payment_method,
        notes: payload.notes,
        delivery_date: payload.delivery_date,
      },
    )
    .await?;
  Ok(HttpResponse::Created().json(json!({
    "order": placed.order,
    "checkoutUrl": placed.checkout_url,
  })))
}

#[instrument(name = "handler::confirm_payment", skip_all, fields(user_id = %auth.user.id))]
pub async fn confirm_payment(
  state: web::Data<AppState>,
  auth: AuthenticatedUser,
  query: web::Query<ConfirmQuery>,
) -> Result<HttpResponse, AppError> {
  let session_id = query
    .into_inner()
    .session_id
    .ok_or_else(|| AppError::Validation("session_id required".to_string()))?;
  let order = state.order_service.confirm_payment(&session_id).await?;
  Ok(HttpResponse::Ok().json(order))
}

// The read/update/delete endpoints below are store-wide on purpose: the
// original API exposes them without any ownership check.

pub async fn list_orders(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let orders = state.order_service.list_orders().await?;
  Ok(HttpResponse::Ok().json(orders))
}

pub async fn get_order(state: web::Data<AppState>, path: web::Path<Uuid>) -> Result<HttpResponse, AppError> {
  let order = state.order_service.get_order(path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(order))
}

#[instrument(name = "handler::update_order", skip_all, fields(order_id = %path))]
pub async fn update_order(
  state: web::Data<AppState>,
  path: web::Path<Uuid>,
  payload: web::Json<OrderPatch>,
) -> Result<HttpResponse, AppError> {
  let order = state
    .order_service
    .update_order(path.into_inner(), payload.into_inner())
    .await?;
  Ok(HttpResponse::Ok().json(order))
}

#[instrument(name = "handler::delete_order", skip_all, fields(order_id = %path))]
pub async fn delete_order(state: web::Data<AppState>, path: web::Path<Uuid>) -> Result<HttpResponse, AppError> {
  state.order_service.delete_order(path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(json!({ "message": "Order deleted successfully" })))
}
