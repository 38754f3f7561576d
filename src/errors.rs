use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("{0}")]
  Validation(String),

  #[error("{0}")]
  Auth(String),

  #[error("{0}")]
  NotFound(String),

  /// The gateway reports the checkout session as not yet paid. Reported to the
  /// client as a 400, not treated as a server fault.
  #[error("Payment not completed")]
  PaymentNotCompleted,

  #[error("Payment provider error: {0}")]
  Gateway(String),

  #[error("Database error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Configuration error: {0}")]
  Config(String),

  #[error("Internal server error: {0}")]
  Internal(String),
}

// Allow anyhow::Error to be converted into AppError::Internal for convenience
// in handlers using `?` on functions returning anyhow::Result.
impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    if err.is::<sqlx::Error>() {
      match err.downcast::<sqlx::Error>() {
        Ok(db_err) => AppError::Sqlx(db_err),
        Err(other) => AppError::Internal(other.to_string()),
      }
    } else {
      AppError::Internal(err.to_string())
    }
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Validation(_) | AppError::PaymentNotCompleted => StatusCode::BAD_REQUEST,
      AppError::Auth(_) => StatusCode::UNAUTHORIZED,
      AppError::NotFound(_) => StatusCode::NOT_FOUND,
      AppError::Gateway(_) | AppError::Sqlx(_) | AppError::Config(_) | AppError::Internal(_) => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
    }
  }

  fn error_response(&self) -> HttpResponse {
    if self.status_code().is_server_error() {
      tracing::error!(application_error = %self, "Responding with server error");
    }
    // Every error body is `{"message": ...}` so the UI can render it directly.
    let message = match self {
      AppError::Validation(m) | AppError::Auth(m) | AppError::NotFound(m) => m.clone(),
      AppError::PaymentNotCompleted => "Payment not completed".to_string(),
      AppError::Gateway(_) => "Payment provider error".to_string(),
      AppError::Sqlx(_) => "Database operation failed".to_string(),
      AppError::Config(_) => "Server configuration error".to_string(),
      AppError::Internal(_) => "Server Error".to_string(),
    };
    HttpResponse::build(self.status_code()).json(json!({ "message": message }))
  }
}

// Define a Result type alias for the application
pub type Result<T, E = AppError> = std::result::Result<T, E>;
