use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How the customer pays. The request carries a free-form string; the literal
/// "COD" selects cash on delivery and anything else falls through to online
/// payment, so the permissive normalization lives in one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
  #[serde(rename = "Cash on Delivery")]
  CashOnDelivery,
  #[serde(rename = "Online Payment")]
  OnlinePayment,
}

impl PaymentMethod {
  pub fn from_request_value(raw: &str) -> Self {
    if raw == "COD" {
      PaymentMethod::CashOnDelivery
    } else {
      PaymentMethod::OnlinePayment
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      PaymentMethod::CashOnDelivery => "Cash on Delivery",
      PaymentMethod::OnlinePayment => "Online Payment",
    }
  }

  pub fn parse(raw: &str) -> Option<Self> {
    match raw {
      "Cash on Delivery" => Some(PaymentMethod::CashOnDelivery),
      "Online Payment" => Some(PaymentMethod::OnlinePayment),
      _ => None,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
  Unpaid,
  Paid,
}

impl PaymentStatus {
  pub fn as_str(&self) -> &'static str {
    match self {
      PaymentStatus::Unpaid => "Unpaid",
      PaymentStatus::Paid => "Paid",
    }
  }

  pub fn parse(raw: &str) -> Option<Self> {
    match raw {
      "Unpaid" => Some(PaymentStatus::Unpaid),
      "Paid" => Some(PaymentStatus::Paid),
      _ => None,
    }
  }
}

/// Customer contact details copied onto the order at checkout, so later
/// profile edits never alter historical orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
  pub name: String,
  pub email: String,
  pub address: String,
}

/// One ordered line, snapshotted from the client's checkout payload at order
/// time. `id` is the product identifier as the storefront knows it; no live
/// reference back into the catalog is kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
  pub id: String,
  pub name: String,
  pub price: f64,
  pub quantity: i32,
  #[serde(default)]
  pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
  pub id: Uuid,
  /// Human-inspectable identifier, `ORD-` plus a random token.
  pub order_id: String,
  pub user_id: Uuid,
  pub customer: Customer,
  pub items: Vec<OrderLine>,
  pub shipping: f64,
  pub payment_method: PaymentMethod,
  pub payment_status: PaymentStatus,
  /// Hosted checkout session identifier; set only on the online payment path.
  pub session_id: Option<String>,
  pub payment_intent_id: Option<String>,
  pub notes: Option<String>,
  pub delivery_date: Option<DateTime<Utc>>,
  /// Fulfillment state. Free text, overwritten directly by the update endpoint.
  pub status: String,
  pub created_at: DateTime<Utc>,
}

/// Allow-listed mutable fields for the generic order update. Anything else in
/// the request body is silently ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPatch {
  pub status: Option<String>,
  pub payment_status: Option<PaymentStatus>,
  pub delivery_date: Option<DateTime<Utc>>,
  pub notes: Option<String>,
}
