//! The order lifecycle: checkout snapshot, payment path selection, and
//! reconciliation of hosted-checkout confirmations back into order state.

use crate::errors::{AppError, Result};
use crate::models::{Customer, Order, OrderLine, OrderPatch, PaymentMethod, PaymentStatus};
use crate::services::payment::{CheckoutSessionRequest, PaymentGateway, SessionLineItem};
use crate::store::OrderStore;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CreateOrderInput {
  pub customer: Customer,
  pub items: Vec<OrderLine>,
  /// Raw payment method string from the client; "COD" means cash on delivery,
  /// anything else is treated as online payment.
  pub payment_method: Option<String>,
  pub notes: Option<String>,
  pub delivery_date: Option<DateTime<Utc>>,
}

/// A freshly created order plus, on the online payment path, the hosted
/// checkout URL the client must be redirected to.
#[derive(Debug, Clone)]
pub struct PlacedOrder {
  pub order: Order,
  pub checkout_url: Option<String>,
}

#[derive(Clone)]
pub struct OrderService {
  orders: Arc<dyn OrderStore>,
  gateway: Arc<dyn PaymentGateway>,
  currency: String,
  frontend_url: String,
}

impl OrderService {
  pub fn new(orders: Arc<dyn OrderStore>, gateway: Arc<dyn PaymentGateway>, currency: String, frontend_url: String) -> Self {
    Self {
      orders,
      gateway,
      currency,
      frontend_url,
    }
  }

  /// Creates an order from the checkout payload. Cash-on-delivery orders are
  /// persisted immediately as Paid; online payment orders are persisted as
  /// Unpaid only after the checkout session has been created, so a gateway
  /// failure leaves nothing behind.
  #[instrument(name = "orders::create", skip(self, input), fields(user_id = %user_id))]
  pub async fn create_order(&self, user_id: Uuid, input: CreateOrderInput) -> Result<PlacedOrder> {
    if input.items.is_empty() {
      return Err(AppError::Validation("Invalid or empty items array".to_string()));
    }

    let payment_method = PaymentMethod::from_request_value(input.payment_method.as_deref().unwrap_or(""));
    let order_id = format!("ORD-{}", Uuid::new_v4());

    let (payment_status, session, checkout_url) = match payment_method {
      PaymentMethod::OnlinePayment => {
        let request = CheckoutSessionRequest {
          currency: self.currency.clone(),
          line_items: input
            .items
            .iter()
            .map(|line| SessionLineItem {
              name: line.name.clone(),
              unit_amount: (line.price * 100.0).round() as i64,
              quantity: i64::from(line.quantity),
            })
            .collect(),
          customer_email: input.customer.email.clone(),
          // The session id placeholder is substituted by the provider on redirect.
          success_url: format!("{}/myorders/verify?session_id={{CHECKOUT_SESSION_ID}}", self.frontend_url),
          cancel_url: format!("{}/checkout?payment_status=cancel", self.frontend_url),
          order_id: order_id.clone(),
        };
        let session = self.gateway.create_checkout_session(request).await?;
        let url = session.url.clone();
        (PaymentStatus::Unpaid, Some(session), Some(url))
      }
      PaymentMethod::CashOnDelivery => (PaymentStatus::Paid, None, None),
    };

    let order = Order {
      id: Uuid::new_v4(),
      order_id,
      user_id,
      customer: input.customer,
      items: input.items,
      shipping: 0.0,
      payment_method,
      payment_status,
      session_id: session.as_ref().map(|s| s.id.clone()),
      payment_intent_id: session.and_then(|s| s.payment_intent),
      notes: input.notes,
      delivery_date: input.delivery_date,
      status: "pending".to_string(),
      created_at: Utc::now(),
    };
    let order = self.orders.insert(order).await?;
    info!(order_id = %order.order_id, method = payment_method.as_str(), "Order created");

    Ok(PlacedOrder { order, checkout_url })
  }

  /// Reconciles a completed hosted checkout back into order state. The only
  /// sanctioned Unpaid -> Paid transition for online payment orders.
  #[instrument(name = "orders::confirm_payment", skip(self))]
  pub async fn confirm_payment(&self, session_id: &str) -> Result<Order> {
    if session_id.is_empty() {
      return Err(AppError::Validation("session_id required".to_string()));
    }

    let status = self.gateway.retrieve_session(session_id).await?;
    if !status.is_paid() {
      warn!(payment_status = %status.payment_status, "Session not paid at confirmation time");
      return Err(AppError::PaymentNotCompleted);
    }

    let order = self
      .orders
      .set_payment_status_by_session(session_id, PaymentStatus::Paid)
      .await?
      .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;
    info!(order_id = %order.order_id, "Payment confirmed");
    Ok(order)
  }

  /// All orders, most recent first. Deliberately store-wide.
  pub async fn list_orders(&self) -> Result<Vec<Order>> {
    self.orders.list_newest_first().await
  }

  pub async fn get_order(&self, id: Uuid) -> Result<Order> {
    self
      .orders
      .get(id)
      .await?
      .ok_or_else(|| AppError::NotFound("Order not found".to_string()))
  }

  /// Applies the allow-listed fields present in the patch; everything else in
  /// the request has already been dropped by deserialization.
  #[instrument(name = "orders::update", skip(self, patch))]
  pub async fn update_order(&self, id: Uuid, patch: OrderPatch) -> Result<Order> {
    self
      .orders
      .update(id, patch)
      .await?
      .ok_or_else(|| AppError::NotFound("Order not found".to_string()))
  }

  /// Hard delete; no soft-delete or audit trail.
  #[instrument(name = "orders::delete", skip(self))]
  pub async fn delete_order(&self, id: Uuid) -> Result<()> {
    if self.orders.delete(id).await? {
      Ok(())
    } else {
      Err(AppError::NotFound("Order not found".to_string()))
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::services::payment_mock::MockGateway;
  use crate::store::memory::MemoryOrderStore;

  fn service() -> (OrderService, Arc<MemoryOrderStore>, Arc<MockGateway>) {
    let orders = Arc::new(MemoryOrderStore::default());
    let gateway = Arc::new(MockGateway::new());
    let service = OrderService::new(
      orders.clone(),
      gateway.clone(),
      "inr".to_string(),
      "http://localhost:5173".to_string(),
    );
    (service, orders, gateway)
  }

  fn checkout_input(payment_method: &str) -> CreateOrderInput {
    CreateOrderInput {
      customer: Customer {
        name: "Asha".to_string(),
        email: "asha@example.com".to_string(),
        address: "12 Hill Road".to_string(),
      },
      items: vec![OrderLine {
        id: "sku1".to_string(),
        name: "Tea".to_string(),
        price: 10.0,
        quantity: 2,
        image_url: None,
      }],
      payment_method: Some(payment_method.to_string()),
      notes: None,
      delivery_date: None,
    }
  }

  #[tokio::test]
  async fn cod_order_is_created_paid_with_no_session() {
    let (service, _, _) = service();
    let placed = service.create_order(Uuid::new_v4(), checkout_input("COD")).await.unwrap();

    assert_eq!(placed.order.payment_method, PaymentMethod::CashOnDelivery);
    assert_eq!(placed.order.payment_status, PaymentStatus::Paid);
    assert!(placed.order.session_id.is_none());
    assert!(placed.checkout_url.is_none());
    assert_eq!(placed.order.items[0].price, 10.0);
    assert!(placed.order.order_id.starts_with("ORD-"));
  }

  #[tokio::test]
  async fn any_other_method_goes_through_the_gateway_unpaid() {
    let (service, _, _) = service();
    // Unexpected strings fall through to online payment rather than erroring.
    let placed = service
      .create_order(Uuid::new_v4(), checkout_input("definitely-not-a-method"))
      .await
      .unwrap();

    assert_eq!(placed.order.payment_method, PaymentMethod::OnlinePayment);
    assert_eq!(placed.order.payment_status, PaymentStatus::Unpaid);
    assert!(placed.order.session_id.is_some());
    assert!(placed.order.payment_intent_id.is_some());
    assert!(placed.checkout_url.is_some());
  }

  #[tokio::test]
  async fn empty_items_are_rejected() {
    let (service, _, _) = service();
    let mut input = checkout_input("COD");
    input.items.clear();
    let result = service.create_order(Uuid::new_v4(), input).await;
    assert!(matches!(result, Err(AppError::Validation(_))));
  }

  #[tokio::test]
  async fn gateway_failure_persists_no_order() {
    let (service, orders, gateway) = service();
    gateway.set_fail_session_create(true);

    let result = service.create_order(Uuid::new_v4(), checkout_input("card")).await;
    assert!(matches!(result, Err(AppError::Gateway(_))));
    assert!(orders.list_newest_first().await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn confirm_on_unpaid_session_leaves_order_untouched() {
    let (service, orders, _) = service();
    let placed = service.create_order(Uuid::new_v4(), checkout_input("card")).await.unwrap();
    let session_id = placed.order.session_id.clone().unwrap();

    let result = service.confirm_payment(&session_id).await;
    assert!(matches!(result, Err(AppError::PaymentNotCompleted)));

    let order = orders.get(placed.order.id).await.unwrap().unwrap();
    assert_eq!(order.payment_status, PaymentStatus::Unpaid);
  }

  #[tokio::test]
  async fn confirm_flips_exactly_the_matching_order() {
    let (service, orders, gateway) = service();
    let first = service.create_order(Uuid::new_v4(), checkout_input("card")).await.unwrap();
    let second = service.create_order(Uuid::new_v4(), checkout_input("card")).await.unwrap();
    let session_id = first.order.session_id.clone().unwrap();

    gateway.mark_paid(&session_id);
    let confirmed = service.confirm_payment(&session_id).await.unwrap();
    assert_eq!(confirmed.id, first.order.id);
    assert_eq!(confirmed.payment_status, PaymentStatus::Paid);

    let untouched = orders.get(second.order.id).await.unwrap().unwrap();
    assert_eq!(untouched.payment_status, PaymentStatus::Unpaid);
  }

  #[tokio::test]
  async fn confirm_with_empty_session_id_is_a_validation_error() {
    let (service, _, _) = service();
    assert!(matches!(service.confirm_payment("").await, Err(AppError::Validation(_))));
  }

  #[tokio::test]
  async fn confirm_with_stale_session_id_is_not_found() {
    let (service, _, gateway) = service();
    // A paid session with no matching order, as after an order delete.
    let session = gateway
      .create_checkout_session(CheckoutSessionRequest {
        currency: "inr".to_string(),
        line_items: vec![SessionLineItem {
          name: "Tea".to_string(),
          unit_amount: 1000,
          quantity: 1,
        }],
        customer_email: "asha@example.com".to_string(),
        success_url: "http://localhost:5173/ok".to_string(),
        cancel_url: "http://localhost:5173/cancel".to_string(),
        order_id: "ORD-dangling".to_string(),
      })
      .await
      .unwrap();
    gateway.mark_paid(&session.id);

    let result = service.confirm_payment(&session.id).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
  }

  #[tokio::test]
  async fn session_carries_rounded_minor_unit_amounts() {
    let (service, _, gateway) = service();
    let mut input = checkout_input("card");
    input.items[0].price = 10.555;

    let placed = service.create_order(Uuid::new_v4(), input).await.unwrap();

    // The snapshot keeps the original price; the gateway sees rounded paise.
    assert_eq!(placed.order.items[0].price, 10.555);
    let request = gateway.last_request().unwrap();
    assert_eq!(request.currency, "inr");
    assert_eq!(request.line_items.len(), 1);
    assert_eq!(request.line_items[0].unit_amount, 1056);
    assert_eq!(request.line_items[0].quantity, 2);
    assert_eq!(request.customer_email, "asha@example.com");
    assert_eq!(request.order_id, placed.order.order_id);
    assert!(request.success_url.contains("session_id={CHECKOUT_SESSION_ID}"));
  }

  #[tokio::test]
  async fn list_is_newest_first() {
    let (service, _, _) = service();
    let first = service.create_order(Uuid::new_v4(), checkout_input("COD")).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second = service.create_order(Uuid::new_v4(), checkout_input("COD")).await.unwrap();

    let listed = service.list_orders().await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, second.order.id);
    assert_eq!(listed[1].id, first.order.id);
  }

  #[tokio::test]
  async fn update_applies_only_allow_listed_fields() {
    let (service, _, _) = service();
    let placed = service.create_order(Uuid::new_v4(), checkout_input("card")).await.unwrap();

    let patch = OrderPatch {
      status: Some("shipped".to_string()),
      payment_status: Some(PaymentStatus::Paid),
      delivery_date: None,
      notes: Some("leave at the gate".to_string()),
    };
    let updated = service.update_order(placed.order.id, patch).await.unwrap();

    assert_eq!(updated.status, "shipped");
    // Direct overwrite of payment status through the update path is permitted.
    assert_eq!(updated.payment_status, PaymentStatus::Paid);
    assert_eq!(updated.notes.as_deref(), Some("leave at the gate"));
    // Everything outside the allow-list is untouched.
    assert_eq!(updated.customer.email, placed.order.customer.email);
    assert_eq!(updated.session_id, placed.order.session_id);
  }

  #[tokio::test]
  async fn update_and_delete_unknown_order_are_not_found() {
    let (service, _, _) = service();
    assert!(matches!(
      service.update_order(Uuid::new_v4(), OrderPatch::default()).await,
      Err(AppError::NotFound(_))
    ));
    assert!(matches!(
      service.delete_order(Uuid::new_v4()).await,
      Err(AppError::NotFound(_))
    ));
  }

  #[tokio::test]
  async fn delete_removes_the_order() {
    let (service, orders, _) = service();
    let placed = service.create_order(Uuid::new_v4(), checkout_input("COD")).await.unwrap();
    service.delete_order(placed.order.id).await.unwrap();
    assert!(orders.get(placed.order.id).await.unwrap().is_none());
  }
}
