//! End-to-end tests over the HTTP surface, running the real route table and
//! handlers against the in-memory stores and the mock payment gateway.

use actix_web::{test, web, App};
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

use storefront_backend::config::{AppConfig, PaymentProvider};
use storefront_backend::models::{Product, User};
use storefront_backend::services::{auth_service, CartService, MockGateway, OrderService};
use storefront_backend::state::AppState;
use storefront_backend::store::memory::{MemoryCartStore, MemoryOrderStore, MemoryProductStore, MemoryUserStore};
use storefront_backend::store::{ProductStore, UserStore};
use storefront_backend::web::configure_app_routes;

const JWT_SECRET: &str = "integration-test-secret";

fn test_config() -> AppConfig {
  AppConfig {
    server_host: "127.0.0.1".to_string(),
    server_port: 0,
    database_url: "postgres://unused".to_string(),
    frontend_url: "http://localhost:5173".to_string(),
    allowed_origins: vec!["http://localhost:5173".to_string()],
    store_currency: "inr".to_string(),
    payment_provider: PaymentProvider::Mock,
    stripe_secret_key: None,
    stripe_api_base: "https://api.stripe.com".to_string(),
    jwt_secret: JWT_SECRET.to_string(),
    jwt_ttl_secs: 3600,
    uploads_dir: "uploads".to_string(),
  }
}

struct TestHarness {
  state: AppState,
  gateway: Arc<MockGateway>,
  products: Arc<MemoryProductStore>,
  users: Arc<MemoryUserStore>,
}

fn harness() -> TestHarness {
  let products = Arc::new(MemoryProductStore::default());
  let users = Arc::new(MemoryUserStore::default());
  let cart = Arc::new(MemoryCartStore::default());
  let orders = Arc::new(MemoryOrderStore::default());
  let gateway = Arc::new(MockGateway::new());
  let config = Arc::new(test_config());

  let state = AppState {
    config: config.clone(),
    products: products.clone(),
    users: users.clone(),
    cart_service: CartService::new(cart, products.clone()),
    order_service: OrderService::new(
      orders,
      gateway.clone(),
      config.store_currency.clone(),
      config.frontend_url.clone(),
    ),
  };
  TestHarness {
    state,
    gateway,
    products,
    users,
  }
}

async fn seed_user(harness: &TestHarness) -> (Uuid, String) {
  let hash = auth_service::hash_password("pa55word!").unwrap();
  let user = harness
    .users
    .insert(User::new("Asha".to_string(), "asha@example.com".to_string(), hash))
    .await
    .unwrap();
  let token = auth_service::issue_token(user.id, JWT_SECRET, 3600).unwrap();
  (user.id, token)
}

async fn seed_product(harness: &TestHarness) -> Uuid {
  let product = Product::new("Tea".to_string(), None, Some("beverages".to_string()), None, 10.0, None);
  let id = product.id;
  harness.products.insert(product).await.unwrap();
  id
}

macro_rules! app {
  ($harness:expr) => {
    test::init_service(
      App::new()
        .app_data(web::Data::new($harness.state.clone()))
        .configure(configure_app_routes),
    )
    .await
  };
}

fn checkout_body(payment_method: &str) -> Value {
  json!({
    "customer": { "name": "Asha", "email": "asha@example.com", "address": "12 Hill Road" },
    "items": [{ "id": "sku1", "name": "Tea", "price": 10, "quantity": 2 }],
    "paymentMethod": payment_method,
  })
}

#[actix_web::test]
async fn cart_requires_a_token() {
  let harness = harness();
  let app = app!(harness);

  let resp = test::call_service(&app, test::TestRequest::get().uri("/api/cart").to_request()).await;
  assert_eq!(resp.status(), 401);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["message"], "Not authorized - token missing");
}

#[actix_web::test]
async fn deleted_user_token_is_rejected() {
  let harness = harness();
  let app = app!(harness);

  // Valid signature, but no matching user record.
  let token = auth_service::issue_token(Uuid::new_v4(), JWT_SECRET, 3600).unwrap();
  let resp = test::call_service(
    &app,
    test::TestRequest::get()
      .uri("/api/cart")
      .insert_header(("Authorization", format!("Bearer {}", token)))
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), 401);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["message"], "User no longer exists");
}

#[actix_web::test]
async fn adding_twice_merges_the_cart_line() {
  let harness = harness();
  let (_, token) = seed_user(&harness).await;
  let product_id = seed_product(&harness).await;
  let app = app!(harness);

  let first = test::call_service(
    &app,
    test::TestRequest::post()
      .uri("/api/cart")
      .insert_header(("Authorization", format!("Bearer {}", token)))
      .set_json(json!({ "productId": product_id, "quantity": 2 }))
      .to_request(),
  )
  .await;
  assert_eq!(first.status(), 201);

  let second = test::call_service(
    &app,
    test::TestRequest::post()
      .uri("/api/cart")
      .insert_header(("Authorization", format!("Bearer {}", token)))
      .set_json(json!({ "productId": product_id, "quantity": 3 }))
      .to_request(),
  )
  .await;
  assert_eq!(second.status(), 200);
  let merged: Value = test::read_body_json(second).await;
  assert_eq!(merged["quantity"], 5);
  assert_eq!(merged["product"]["name"], "Tea");

  let listed: Value = test::call_and_read_body_json(
    &app,
    test::TestRequest::get()
      .uri("/api/cart")
      .insert_header(("Authorization", format!("Bearer {}", token)))
      .to_request(),
  )
  .await;
  assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn add_to_cart_without_quantity_is_a_400() {
  let harness = harness();
  let (_, token) = seed_user(&harness).await;
  let product_id = seed_product(&harness).await;
  let app = app!(harness);

  let resp = test::call_service(
    &app,
    test::TestRequest::post()
      .uri("/api/cart")
      .insert_header(("Authorization", format!("Bearer {}", token)))
      .set_json(json!({ "productId": product_id }))
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), 400);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(
    body["message"],
    "Product identifier (productId or itemId) and quantity (number) are required"
  );
}

#[actix_web::test]
async fn item_id_alias_works_for_add_to_cart() {
  let harness = harness();
  let (_, token) = seed_user(&harness).await;
  let product_id = seed_product(&harness).await;
  let app = app!(harness);

  let resp = test::call_service(
    &app,
    test::TestRequest::post()
      .uri("/api/cart")
      .insert_header(("Authorization", format!("Bearer {}", token)))
      .set_json(json!({ "itemId": product_id, "quantity": 1 }))
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), 201);
}

#[actix_web::test]
async fn cod_checkout_creates_a_paid_order_without_redirect() {
  let harness = harness();
  let (_, token) = seed_user(&harness).await;
  let app = app!(harness);

  let resp = test::call_service(
    &app,
    test::TestRequest::post()
      .uri("/api/orders")
      .insert_header(("Authorization", format!("Bearer {}", token)))
      .set_json(checkout_body("COD"))
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), 201);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["order"]["paymentStatus"], "Paid");
  assert_eq!(body["order"]["paymentMethod"], "Cash on Delivery");
  assert_eq!(body["order"]["items"][0]["price"], 10.0);
  assert_eq!(body["order"]["sessionId"], Value::Null);
  assert_eq!(body["checkoutUrl"], Value::Null);
}

#[actix_web::test]
async fn online_checkout_confirms_through_the_gateway() {
  let harness = harness();
  let (_, token) = seed_user(&harness).await;
  let gateway = harness.gateway.clone();
  let app = app!(harness);

  let created: Value = test::call_and_read_body_json(
    &app,
    test::TestRequest::post()
      .uri("/api/orders")
      .insert_header(("Authorization", format!("Bearer {}", token)))
      .set_json(checkout_body("Online"))
      .to_request(),
  )
  .await;
  assert_eq!(created["order"]["paymentStatus"], "Unpaid");
  assert!(created["checkoutUrl"].as_str().unwrap().starts_with("https://"));
  let session_id = created["order"]["sessionId"].as_str().unwrap().to_string();

  // Confirming before the provider reports "paid" changes nothing.
  let early = test::call_service(
    &app,
    test::TestRequest::get()
      .uri(&format!("/api/orders/confirm?session_id={}", session_id))
      .insert_header(("Authorization", format!("Bearer {}", token)))
      .to_request(),
  )
  .await;
  assert_eq!(early.status(), 400);
  let early_body: Value = test::read_body_json(early).await;
  assert_eq!(early_body["message"], "Payment not completed");

  gateway.mark_paid(&session_id);
  let confirmed: Value = test::call_and_read_body_json(
    &app,
    test::TestRequest::get()
      .uri(&format!("/api/orders/confirm?session_id={}", session_id))
      .insert_header(("Authorization", format!("Bearer {}", token)))
      .to_request(),
  )
  .await;
  assert_eq!(confirmed["paymentStatus"], "Paid");
}

#[actix_web::test]
async fn order_reads_and_updates_are_public() {
  let harness = harness();
  let (_, token) = seed_user(&harness).await;
  let app = app!(harness);

  let created: Value = test::call_and_read_body_json(
    &app,
    test::TestRequest::post()
      .uri("/api/orders")
      .insert_header(("Authorization", format!("Bearer {}", token)))
      .set_json(checkout_body("COD"))
      .to_request(),
  )
  .await;
  let order_id = created["order"]["id"].as_str().unwrap().to_string();

  // No token on any of these.
  let listed: Value = test::call_and_read_body_json(&app, test::TestRequest::get().uri("/api/orders").to_request()).await;
  assert_eq!(listed.as_array().unwrap().len(), 1);

  let updated: Value = test::call_and_read_body_json(
    &app,
    test::TestRequest::put()
      .uri(&format!("/api/orders/{}", order_id))
      .set_json(json!({ "status": "shipped", "somethingElse": "ignored" }))
      .to_request(),
  )
  .await;
  assert_eq!(updated["status"], "shipped");

  let deleted: Value = test::call_and_read_body_json(
    &app,
    test::TestRequest::delete()
      .uri(&format!("/api/orders/{}", order_id))
      .to_request(),
  )
  .await;
  assert_eq!(deleted["message"], "Order deleted successfully");
}

#[actix_web::test]
async fn missing_order_is_a_404_with_message() {
  let harness = harness();
  let app = app!(harness);

  let resp = test::call_service(
    &app,
    test::TestRequest::delete()
      .uri(&format!("/api/orders/{}", Uuid::new_v4()))
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), 404);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["message"], "Order not found");
}

#[actix_web::test]
async fn register_then_login_then_use_the_cart() {
  let harness = harness();
  let product_id = seed_product(&harness).await;
  let app = app!(harness);

  let registered = test::call_service(
    &app,
    test::TestRequest::post()
      .uri("/api/user/register")
      .set_json(json!({ "name": "Ravi", "email": "ravi@example.com", "password": "s3cret!" }))
      .to_request(),
  )
  .await;
  assert_eq!(registered.status(), 201);

  let login: Value = test::call_and_read_body_json(
    &app,
    test::TestRequest::post()
      .uri("/api/user/login")
      .set_json(json!({ "email": "ravi@example.com", "password": "s3cret!" }))
      .to_request(),
  )
  .await;
  assert_eq!(login["success"], true);
  let token = login["token"].as_str().unwrap().to_string();

  let resp = test::call_service(
    &app,
    test::TestRequest::post()
      .uri("/api/cart")
      .insert_header(("Authorization", format!("Bearer {}", token)))
      .set_json(json!({ "productId": product_id, "quantity": 1 }))
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), 201);
}

#[actix_web::test]
async fn deleting_a_missing_product_is_a_404() {
  let harness = harness();
  let app = app!(harness);

  let resp = test::call_service(
    &app,
    test::TestRequest::delete()
      .uri(&format!("/api/items/{}", Uuid::new_v4()))
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), 404);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["message"], "Product not found");
}
