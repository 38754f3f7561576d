//! The cart ledger. Every operation is scoped to the authenticated user;
//! repeated adds of the same product merge into the existing line.

use crate::errors::{AppError, Result};
use crate::models::{CartItem, Product};
use crate::store::{CartStore, ProductStore};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

/// A cart line with its product join-expanded, the shape every cart endpoint
/// responds with so the client never has to re-fetch. `product` is None when
/// the product has since been removed from the catalog.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
  pub id: Uuid,
  pub product: Option<Product>,
  pub quantity: i32,
}

/// Outcome of a mutating cart operation.
#[derive(Debug, Clone)]
pub enum CartMutation {
  /// First add of this product: a new line was created.
  Created(CartLine),
  /// An existing line was merged or re-quantified in place.
  Updated(CartLine),
  /// The line was removed; only the tombstone id remains.
  Removed { id: Uuid },
}

#[derive(Clone)]
pub struct CartService {
  cart: Arc<dyn CartStore>,
  products: Arc<dyn ProductStore>,
}

impl CartService {
  pub fn new(cart: Arc<dyn CartStore>, products: Arc<dyn ProductStore>) -> Self {
    Self { cart, products }
  }

  async fn resolve(&self, item: &CartItem) -> Result<CartLine> {
    let product = self.products.get(item.product_id).await?;
    Ok(CartLine {
      id: item.id,
      product,
      quantity: item.quantity,
    })
  }

  #[instrument(name = "cart::list", skip(self))]
  pub async fn list(&self, user_id: Uuid) -> Result<Vec<CartLine>> {
    let items = self.cart.list_for_user(user_id).await?;
    let mut lines = Vec::with_capacity(items.len());
    for item in &items {
      lines.push(self.resolve(item).await?);
    }
    Ok(lines)
  }

  /// Adds `quantity` of a product. An existing (user, product) line merges to
  /// `max(1, existing + quantity)`; a fresh line keeps the given quantity
  /// exactly as sent.
  #[instrument(name = "cart::add", skip(self))]
  pub async fn add(&self, user_id: Uuid, product_id: Uuid, quantity: i32) -> Result<CartMutation> {
    if let Some(existing) = self.cart.find_by_user_and_product(user_id, product_id).await? {
      let merged = (existing.quantity + quantity).max(1);
      if merged < 1 {
        // The clamp above keeps this from ever firing; the removal path stays
        // because the tombstone response is part of the endpoint's contract.
        self.cart.delete(existing.id).await?;
        info!(line_id = %existing.id, "Cart line removed by merge");
        return Ok(CartMutation::Removed { id: existing.id });
      }
      self.cart.set_quantity(existing.id, merged).await?;
      info!(line_id = %existing.id, quantity = merged, "Cart line merged");
      let mut line = self.resolve(&existing).await?;
      line.quantity = merged;
      return Ok(CartMutation::Updated(line));
    }

    let item = self.cart.insert(CartItem::new(user_id, product_id, quantity)).await?;
    info!(line_id = %item.id, quantity = item.quantity, "Cart line created");
    Ok(CartMutation::Created(self.resolve(&item).await?))
  }

  /// Sets a line's quantity, floored at 1. Unlike `add`, this never deletes.
  #[instrument(name = "cart::update_quantity", skip(self))]
  pub async fn update_quantity(&self, user_id: Uuid, line_id: Uuid, quantity: i32) -> Result<CartLine> {
    let item = self
      .cart
      .find_for_user(user_id, line_id)
      .await?
      .ok_or_else(|| AppError::NotFound("Cart item not found".to_string()))?;

    let floored = quantity.max(1);
    self.cart.set_quantity(item.id, floored).await?;
    let mut line = self.resolve(&item).await?;
    line.quantity = floored;
    Ok(line)
  }

  #[instrument(name = "cart::remove", skip(self))]
  pub async fn remove(&self, user_id: Uuid, line_id: Uuid) -> Result<CartMutation> {
    let item = self
      .cart
      .find_for_user(user_id, line_id)
      .await?
      .ok_or_else(|| AppError::NotFound("Cart item not found".to_string()))?;
    self.cart.delete(item.id).await?;
    Ok(CartMutation::Removed { id: item.id })
  }

  /// Empties the user's cart. A no-op when it is already empty.
  #[instrument(name = "cart::clear", skip(self))]
  pub async fn clear(&self, user_id: Uuid) -> Result<()> {
    self.cart.clear_for_user(user_id).await
  }
}
