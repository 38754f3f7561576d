//! Request extractors shared by the handlers.

use crate::errors::AppError;
use crate::models::User;
use crate::services::auth_service;
use crate::state::AppState;
use actix_web::http::header;
use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

/// The identity gating all cart and order-creation operations. Resolves the
/// signed token (cookie first, then bearer header) and loads the user record
/// fresh, so tokens for deleted users stop working immediately.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
  pub user: User,
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
  let header_value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
  header_value.strip_prefix("Bearer ").map(str::to_string)
}

impl FromRequest for AuthenticatedUser {
  type Error = AppError;
  type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    let state = req.app_data::<web::Data<AppState>>().cloned();
    let token = req
      .cookie("token")
      .map(|cookie| cookie.value().to_string())
      .or_else(|| bearer_token(req));

    Box::pin(async move {
      let state = state.ok_or_else(|| AppError::Internal("Application state not configured".to_string()))?;
      let token = token.ok_or_else(|| AppError::Auth("Not authorized - token missing".to_string()))?;

      let user_id = auth_service::verify_token(&token, &state.config.jwt_secret)?;
      match state.users.find_by_id(user_id).await? {
        Some(user) => Ok(AuthenticatedUser { user }),
        None => {
          warn!(%user_id, "Token verified but user no longer exists");
          Err(AppError::Auth("User no longer exists".to_string()))
        }
      }
    })
  }
}
