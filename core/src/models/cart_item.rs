// core/src/models/cart_item.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One line of a buyer's cart. At most one row exists per
/// (buyer_id, product_id); repeated adds merge into it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CartItem {
  pub id: Uuid,
  pub buyer_id: Uuid,
  pub product_id: Uuid,
  pub quantity: i32,
  pub added_at: DateTime<Utc>,
}

/// A cart line joined with the live product snapshot at read time.
/// Prices are never frozen at add time; totals always use `price` as read.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CartLine {
  pub item_id: Uuid,
  pub product_id: Uuid,
  pub quantity: i32,
  pub title: String,
  pub price: Decimal,
  pub images: Vec<String>,
  pub stock: i32,
}
