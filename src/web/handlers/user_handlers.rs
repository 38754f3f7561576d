use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::models::User;
use crate::services::auth_service;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterPayload {
  pub name: String,
  pub email: String,
  pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginPayload {
  pub email: String,
  pub password: String,
}

#[instrument(name = "handler::register", skip_all, fields(email = %payload.email))]
pub async fn register(
  state: web::Data<AppState>,
  payload: web::Json<RegisterPayload>,
) -> Result<HttpResponse, AppError> {
  let payload = payload.into_inner();
  if payload.name.trim().is_empty() || payload.email.trim().is_empty() {
    return Err(AppError::Validation("Name and email are required".to_string()));
  }
  if state.users.find_by_email(&payload.email).await?.is_some() {
    return Err(AppError::Validation("User already exists".to_string()));
  }

  let password_hash = auth_service::hash_password(&payload.password)?;
  let user = state
    .users
    .insert(User::new(payload.name, payload.email, password_hash))
    .await?;
  let token = auth_service::issue_token(user.id, &state.config.jwt_secret, state.config.jwt_ttl_secs)?;

  info!(user_id = %user.id, "User registered");
  Ok(HttpResponse::Created().json(json!({ "success": true, "token": token, "user": user })))
}

#[instrument(name = "handler::login", skip_all, fields(email = %payload.email))]
pub async fn login(state: web::Data<AppState>, payload: web::Json<LoginPayload>) -> Result<HttpResponse, AppError> {
  let payload = payload.into_inner();
  let user = state
    .users
    .find_by_email(&payload.email)
    .await?
    .ok_or_else(|| AppError::Auth("Invalid email or password".to_string()))?;

  if !auth_service::verify_password(&user.password_hash, &payload.password)? {
    return Err(AppError::Auth("Invalid email or password".to_string()));
  }

  let token = auth_service::issue_token(user.id, &state.config.jwt_secret, state.config.jwt_ttl_secs)?;
  Ok(HttpResponse::Ok().json(json!({ "success": true, "token": token, "user": user })))
}
