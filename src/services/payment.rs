//! Boundary to the hosted checkout provider. The order lifecycle only ever
//! talks to this trait; which implementation backs it is a wiring decision
//! made at startup (Stripe in production, the mock elsewhere).

use crate::errors::Result;
use async_trait::async_trait;

/// One line of a checkout session, unit amount in the smallest currency unit.
#[derive(Debug, Clone)]
pub struct SessionLineItem {
  pub name: String,
  pub unit_amount: i64,
  pub quantity: i64,
}

#[derive(Debug, Clone)]
pub struct CheckoutSessionRequest {
  pub currency: String,
  pub line_items: Vec<SessionLineItem>,
  pub customer_email: String,
  pub success_url: String,
  pub cancel_url: String,
  /// Correlation metadata: the human-readable order identifier.
  pub order_id: String,
}

/// What the provider hands back when a session is created.
#[derive(Debug, Clone)]
pub struct CheckoutSession {
  pub id: String,
  pub payment_intent: Option<String>,
  /// Where the client is redirected to complete payment.
  pub url: String,
}

#[derive(Debug, Clone)]
pub struct SessionStatus {
  pub payment_status: String,
}

impl SessionStatus {
  pub fn is_paid(&self) -> bool {
    self.payment_status == "paid"
  }
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
  async fn create_checkout_session(&self, request: CheckoutSessionRequest) -> Result<CheckoutSession>;
  async fn retrieve_session(&self, session_id: &str) -> Result<SessionStatus>;
}
