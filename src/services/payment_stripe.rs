//! Stripe-backed [`PaymentGateway`]: hosted Checkout Sessions over the
//! form-encoded REST API.

use crate::errors::{AppError, Result};
use crate::services::payment::{CheckoutSession, CheckoutSessionRequest, PaymentGateway, SessionStatus};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, instrument};

#[derive(Debug, Clone)]
pub struct StripeGateway {
  http: reqwest::Client,
  secret_key: String,
  api_base: String,
}

impl StripeGateway {
  pub fn new(secret_key: String, api_base: String) -> Self {
    Self {
      http: reqwest::Client::new(),
      secret_key,
      api_base,
    }
  }
}

#[derive(Debug, Deserialize)]
struct StripeSessionResponse {
  id: String,
  payment_intent: Option<String>,
  url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripeSessionStatusResponse {
  payment_status: String,
}

async fn read_error_body(response: reqwest::Response) -> String {
  let status = response.status();
  let body = response.text().await.unwrap_or_default();
  format!("status {}: {}", status, body)
}

#[async_trait]
impl PaymentGateway for StripeGateway {
  #[instrument(name = "stripe::create_checkout_session", skip(self, request), fields(order_id = %request.order_id))]
  async fn create_checkout_session(&self, request: CheckoutSessionRequest) -> Result<CheckoutSession> {
    let mut form: Vec<(String, String)> = vec![
      ("mode".to_string(), "payment".to_string()),
      ("payment_method_types[0]".to_string(), "card".to_string()),
      ("customer_email".to_string(), request.customer_email),
      ("success_url".to_string(), request.success_url),
      ("cancel_url".to_string(), request.cancel_url),
      ("metadata[orderId]".to_string(), request.order_id),
    ];
    for (i, line) in request.line_items.iter().enumerate() {
      form.push((
        format!("line_items[{}][price_data][currency]", i),
        request.currency.clone(),
      ));
      form.push((
        format!("line_items[{}][price_data][product_data][name]", i),
        line.name.clone(),
      ));
      form.push((
        format!("line_items[{}][price_data][unit_amount]", i),
        line.unit_amount.to_string(),
      ));
      form.push((format!("line_items[{}][quantity]", i), line.quantity.to_string()));
    }

    let response = self
      .http
      .post(format!("{}/v1/checkout/sessions", self.api_base))
      .bearer_auth(&self.secret_key)
      .form(&form)
      .send()
      .await
      .map_err(|e| AppError::Gateway(format!("checkout session request failed: {}", e)))?;

    if !response.status().is_success() {
      return Err(AppError::Gateway(read_error_body(response).await));
    }

    let session: StripeSessionResponse = response
      .json()
      .await
      .map_err(|e| AppError::Gateway(format!("invalid checkout session response: {}", e)))?;
    let url = session
      .url
      .ok_or_else(|| AppError::Gateway("checkout session has no redirect url".to_string()))?;

    info!(session_id = %session.id, "Checkout session created");
    Ok(CheckoutSession {
      id: session.id,
      payment_intent: session.payment_intent,
      url,
    })
  }

  #[instrument(name = "stripe::retrieve_session", skip(self))]
  async fn retrieve_session(&self, session_id: &str) -> Result<SessionStatus> {
    let response = self
      .http
      .get(format!("{}/v1/checkout/sessions/{}", self.api_base, session_id))
      .bearer_auth(&self.secret_key)
      .send()
      .await
      .map_err(|e| AppError::Gateway(format!("session retrieve request failed: {}", e)))?;

    if !response.status().is_success() {
      return Err(AppError::Gateway(read_error_body(response).await));
    }

    let status: StripeSessionStatusResponse = response
      .json()
      .await
      .map_err(|e| AppError::Gateway(format!("invalid session retrieve response: {}", e)))?;
    Ok(SessionStatus {
      payment_status: status.payment_status,
    })
  }
}
