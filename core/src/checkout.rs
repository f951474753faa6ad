// core/src/checkout.rs

//! Order placement and status transitions. Placement turns the cart into
//! one order per line with an immutable price snapshot, decrementing stock
//! with a conditional update at the storage layer so two buyers cannot both
//! claim the last unit.

use crate::error::Result;
use crate::models::{Order, OrderStatus};
use crate::session::Session;
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
pub trait OrderRepository: Send + Sync {
  /// Places an order for every line in the buyer's cart, all-or-nothing:
  /// any line that no longer fits stock aborts the whole placement with no
  /// mutation. On success the cart is emptied and the created orders are
  /// returned with `status = pending` and `total_price` frozen at
  /// `price * quantity`. An empty cart places nothing and returns an empty
  /// vec.
  async fn place_from_cart(&self, session: Option<&Session>) -> Result<Vec<Order>>;

  /// Seller-driven status transition, validated against
  /// [`OrderStatus::can_transition_to`]. Scoped to the selling side; an
  /// order some other seller owns answers `NotFound`.
  async fn set_status(&self, session: Option<&Session>, order_id: Uuid, next: OrderStatus) -> Result<Order>;
}
