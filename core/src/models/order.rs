// core/src/models/order.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "order_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
  Pending,
  Shipped,
  Completed,
  Cancelled,
}

impl OrderStatus {
  /// Terminal states admit no further transition.
  pub fn is_terminal(self) -> bool {
    matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
  }

  /// Legal seller/system-driven transitions. An order only moves forward
  /// (pending -> shipped -> completed) or gets cancelled along the way.
  pub fn can_transition_to(self, next: OrderStatus) -> bool {
    use OrderStatus::*;
    matches!(
      (self, next),
      (Pending, Shipped) | (Pending, Completed) | (Pending, Cancelled) | (Shipped, Completed) | (Shipped, Cancelled)
    )
  }
}

/// A purchase snapshot created at checkout. `total_price` is
/// `product.price * quantity` at order time and never mutates afterwards,
/// unlike the live price shown in the cart.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Order {
  pub id: Uuid,
  pub buyer_id: Uuid,
  pub seller_id: Uuid,
  pub product_id: Uuid,
  pub quantity: i32,
  pub total_price: Decimal,
  pub status: OrderStatus,
  pub created_at: DateTime<Utc>,
}

/// Dashboard row: an order enriched with product title and buyer name.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RecentOrder {
  pub order_id: Uuid,
  pub product_title: String,
  pub buyer_name: Option<String>,
  pub quantity: i32,
  pub total_price: Decimal,
  pub status: OrderStatus,
  pub created_at: DateTime<Utc>,
}
