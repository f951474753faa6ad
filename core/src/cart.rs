// core/src/cart.rs

//! Cart line items, keyed uniquely by (buyer_id, product_id). Re-adding a
//! product never creates a second row; the conflict resolves as an upsert
//! with last-write-wins on the quantity field. Every mutation returns the
//! persisted row, so callers don't need a follow-up fetch to see
//! server-authoritative state.

use crate::error::Result;
use crate::models::{CartItem, CartLine};
use crate::session::Session;
use async_trait::async_trait;
use uuid::Uuid;

/// Quantity written by a plain add-to-cart click.
pub const DEFAULT_ADD_QUANTITY: i32 = 1;

#[async_trait]
pub trait CartRepository: Send + Sync {
  /// Creates the line item for (buyer, product) or overwrites the quantity
  /// of the existing one. Requires a session; rejects quantities the stock
  /// guard refuses, including any add of an out-of-stock product.
  async fn add_or_merge(&self, session: Option<&Session>, product_id: Uuid, quantity: i32) -> Result<CartItem>;

  /// Storefront add-to-cart: `add_or_merge` with quantity 1.
  async fn add_one(&self, session: Option<&Session>, product_id: Uuid) -> Result<CartItem> {
    self.add_or_merge(session, product_id, DEFAULT_ADD_QUANTITY).await
  }

  /// Sets an explicit quantity on an existing line item. Rejects values
  /// below 1 and values over current stock; the bound is enforced here, not
  /// only by the +/- controls upstream.
  async fn set_quantity(&self, session: Option<&Session>, item_id: Uuid, quantity: i32) -> Result<CartItem>;

  /// Deletes a line item. Idempotent: an id that is already gone is treated
  /// as already satisfied, not as an error.
  async fn remove(&self, session: Option<&Session>, item_id: Uuid) -> Result<()>;

  /// The buyer's lines joined with their live product snapshot.
  async fn list(&self, session: Option<&Session>) -> Result<Vec<CartLine>>;

  /// Number of line items (not unit quantities); feeds the cart badge.
  async fn count(&self, session: Option<&Session>) -> Result<i64>;
}
