use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;

/// Which payment gateway implementation to wire in at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentProvider {
  Stripe,
  Mock,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub database_url: String,

  /// Base URL of the storefront UI; checkout success/cancel redirects point here.
  pub frontend_url: String,
  /// Origins allowed by CORS (the UI dev servers by default).
  pub allowed_origins: Vec<String>,

  /// ISO currency code the whole store operates in.
  pub store_currency: String,

  pub payment_provider: PaymentProvider,
  pub stripe_secret_key: Option<String>,
  pub stripe_api_base: String,

  pub jwt_secret: String,
  /// Token lifetime in seconds.
  pub jwt_ttl_secs: i64,

  /// Filesystem directory product images are written to and served from.
  pub uploads_dir: String,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let get_env = |var_name: &str| {
      env::var(var_name).map_err(|e| AppError::Config(format!("Missing environment variable '{}': {}", var_name, e)))
    };

    let server_host = get_env("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let server_port = get_env("SERVER_PORT")
      .unwrap_or_else(|_| "4000".to_string())
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;
    let database_url = get_env("DATABASE_URL")?;

    let frontend_url = get_env("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:5173".to_string());
    let allowed_origins = get_env("ALLOWED_ORIGINS")
      .unwrap_or_else(|_| "http://localhost:5173,http://localhost:5174".to_string())
      .split(',')
      .map(|origin| origin.trim().to_string())
      .filter(|origin| !origin.is_empty())
      .collect();

    let store_currency = get_env("STORE_CURRENCY").unwrap_or_else(|_| "inr".to_string());

    let payment_provider = match get_env("PAYMENT_PROVIDER")
      .unwrap_or_else(|_| "mock".to_string())
      .to_lowercase()
      .as_str()
    {
      "stripe" => PaymentProvider::Stripe,
      "mock" => PaymentProvider::Mock,
      other => {
        return Err(AppError::Config(format!(
          "Unknown PAYMENT_PROVIDER '{}' (expected 'stripe' or 'mock')",
          other
        )))
      }
    };
    let stripe_secret_key = get_env("STRIPE_SECRET_KEY").ok();
    if payment_provider == PaymentProvider::Stripe && stripe_secret_key.is_none() {
      return Err(AppError::Config(
        "STRIPE_SECRET_KEY is required when PAYMENT_PROVIDER=stripe".to_string(),
      ));
    }
    let stripe_api_base = get_env("STRIPE_API_BASE").unwrap_or_else(|_| "https://api.stripe.com".to_string());

    let jwt_secret = get_env("JWT_SECRET")?;
    let jwt_ttl_secs = get_env("JWT_TTL_SECS")
      .unwrap_or_else(|_| (7 * 24 * 3600).to_string())
      .parse::<i64>()
      .map_err(|e| AppError::Config(format!("Invalid JWT_TTL_SECS: {}", e)))?;

    let uploads_dir = get_env("UPLOADS_DIR").unwrap_or_else(|_| "uploads".to_string());

    tracing::info!("Application configuration loaded successfully.");

    Ok(Self {
      server_host,
      server_port,
      database_url,
      frontend_url,
      allowed_origins,
      store_currency,
      payment_provider,
      stripe_secret_key,
      stripe_api_base,
      jwt_secret,
      jwt_ttl_secs,
      uploads_dir,
    })
  }
}
