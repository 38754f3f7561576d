use actix_cors::Cors;
use actix_files::Files;
use actix_web::{web, App, HttpServer};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

use storefront_backend::config::{AppConfig, PaymentProvider};
use storefront_backend::services::{CartService, MockGateway, OrderService, PaymentGateway, StripeGateway};
use storefront_backend::state::AppState;
use storefront_backend::store::postgres::{PgCartStore, PgOrderStore, PgProductStore, PgUserStore};
use storefront_backend::web::configure_app_routes;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO)
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .with_span_events(FmtSpan::CLOSE)
    .init();

  tracing::info!("Starting storefront server...");

  let config = match AppConfig::from_env() {
    Ok(cfg) => Arc::new(cfg),
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      panic!("Configuration error: {}", e);
    }
  };

  let db_pool = match PgPool::connect(&config.database_url).await {
    Ok(pool) => {
      tracing::info!("Successfully connected to the database.");
      pool
    }
    Err(e) => {
      tracing::error!(error = %e, "Failed to connect to the database.");
      panic!("Database connection error: {}", e);
    }
  };

  std::fs::create_dir_all(&config.uploads_dir)?;

  let products = Arc::new(PgProductStore::new(db_pool.clone()));
  let users = Arc::new(PgUserStore::new(db_pool.clone()));
  let cart = Arc::new(PgCartStore::new(db_pool.clone()));
  let orders = Arc::new(PgOrderStore::new(db_pool.clone()));

  let gateway: Arc<dyn PaymentGateway> = match config.payment_provider {
    PaymentProvider::Stripe => {
      let secret_key = config
        .stripe_secret_key
        .clone()
        .unwrap_or_default(); // presence already validated by AppConfig
      Arc::new(StripeGateway::new(secret_key, config.stripe_api_base.clone()))
    }
    PaymentProvider::Mock => {
      tracing::warn!("PAYMENT_PROVIDER=mock: checkout sessions are simulated in-process.");
      Arc::new(MockGateway::new())
    }
  };

  let app_state = AppState {
    config: config.clone(),
    products: products.clone(),
    users,
    cart_service: CartService::new(cart, products),
    order_service: OrderService::new(
      orders,
      gateway,
      config.store_currency.clone(),
      config.frontend_url.clone(),
    ),
  };

  let server_address = format!("{}:{}", config.server_host, config.server_port);
  tracing::info!("Attempting to bind server to {}...", server_address);

  let uploads_dir = config.uploads_dir.clone();
  let allowed_origins = config.allowed_origins.clone();
  HttpServer::new(move || {
    let cors = allowed_origins
      .iter()
      .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
      .allow_any_method()
      .allow_any_header()
      .supports_credentials();

    App::new()
      .app_data(web::Data::new(app_state.clone()))
      .wrap(cors)
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(configure_app_routes)
      .service(Files::new("/uploads", uploads_dir.clone()))
  })
  .bind(&server_address)?
  .run()
  .await
}
