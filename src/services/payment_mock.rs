//! In-process payment gateway double. Stands in for the hosted provider in
//! tests and local development: sessions live in a map, start unpaid, and are
//! flipped to paid out of band with [`MockGateway::mark_paid`].

use crate::errors::{AppError, Result};
use crate::services::payment::{CheckoutSession, CheckoutSessionRequest, PaymentGateway, SessionStatus};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::{info, instrument};
use uuid::Uuid;

#[derive(Debug, Default)]
pub struct MockGateway {
  sessions: RwLock<HashMap<String, String>>, // session id -> payment status
  requests: RwLock<Vec<CheckoutSessionRequest>>,
  fail_session_create: RwLock<bool>,
}

impl MockGateway {
  pub fn new() -> Self {
    Self::default()
  }

  /// Simulate the checkout completing on the provider's side.
  pub fn mark_paid(&self, session_id: &str) {
    if let Some(status) = self.sessions.write().get_mut(session_id) {
      *status = "paid".to_string();
    }
  }

  /// Make the next `create_checkout_session` calls fail, for exercising the
  /// no-order-persisted-on-gateway-failure path.
  pub fn set_fail_session_create(&self, fail: bool) {
    *self.fail_session_create.write() = fail;
  }

  /// The most recent session-create request, as the provider saw it.
  pub fn last_request(&self) -> Option<CheckoutSessionRequest> {
    self.requests.read().last().cloned()
  }
}

#[async_trait]
impl PaymentGateway for MockGateway {
  #[instrument(name = "mock_gateway::create_checkout_session", skip(self, request), fields(order_id = %request.order_id))]
  async fn create_checkout_session(&self, request: CheckoutSessionRequest) -> Result<CheckoutSession> {
    if *self.fail_session_create.read() {
      return Err(AppError::Gateway("mock session creation failure".to_string()));
    }
    if request.line_items.is_empty() {
      return Err(AppError::Gateway("checkout session needs at least one line item".to_string()));
    }

    let session_id = format!("mock_cs_{}", Uuid::new_v4().simple());
    self.sessions.write().insert(session_id.clone(), "unpaid".to_string());
    self.requests.write().push(request);
    info!(session_id = %session_id, "Mock checkout session created");
    Ok(CheckoutSession {
      id: session_id.clone(),
      payment_intent: Some(format!("mock_pi_{}", Uuid::new_v4().simple())),
      url: format!("https://checkout.example.test/pay/{}", session_id),
    })
  }

  async fn retrieve_session(&self, session_id: &str) -> Result<SessionStatus> {
    let sessions = self.sessions.read();
    let payment_status = sessions
      .get(session_id)
      .cloned()
      .ok_or_else(|| AppError::Gateway(format!("unknown session '{}'", session_id)))?;
    Ok(SessionStatus { payment_status })
  }
}
