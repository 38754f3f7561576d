use actix_web::{web, HttpResponse};

use crate::errors::AppError;
use crate::web::handlers::{cart_handlers, order_handlers, product_handlers, user_handlers};

async fn health() -> HttpResponse {
  HttpResponse::Ok().body("API Working")
}

/// Route table. Cart and order-creation endpoints require an authenticated
/// user via the `AuthenticatedUser` extractor; order read/update/delete and
/// the catalog are public.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg
    // Malformed JSON bodies surface in the same `{"message"}` shape as every
    // other validation failure.
    .app_data(web::JsonConfig::default().error_handler(|err, _req| AppError::Validation(err.to_string()).into()))
    .route("/", web::get().to(health))
    .service(
      web::scope("/api/user")
        .route("/register", web::post().to(user_handlers::register))
        .route("/login", web::post().to(user_handlers::login)),
    )
    .service(
      web::scope("/api/cart")
        .route("", web::get().to(cart_handlers::get_cart))
        .route("", web::post().to(cart_handlers::add_to_cart))
        .route("/clear", web::post().to(cart_handlers::clear_cart))
        .route("/{id}", web::put().to(cart_handlers::update_cart_item))
        .route("/{id}", web::delete().to(cart_handlers::delete_cart_item)),
    )
    .service(
      web::scope("/api/orders")
        .route("", web::post().to(order_handlers::create_order))
        .route("/confirm", web::get().to(order_handlers::confirm_payment))
        .route("", web::get().to(order_handlers::list_orders))
        .route("/{id}", web::get().to(order_handlers::get_order))
        .route("/{id}", web::put().to(order_handlers::update_order))
        .route("/{id}", web::delete().to(order_handlers::delete_order)),
    )
    .service(
      web::scope("/api/items")
        .route("", web::get().to(product_handlers::list_products))
        .route("", web::post().to(product_handlers::create_product))
        .route("/{id}", web::delete().to(product_handlers::delete_product)),
    );
}
