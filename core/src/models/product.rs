// core/src/models/product.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Physical condition of a listed product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "product_condition", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Condition {
  New,
  Used,
}

/// A seller's listing. Listings are soft-deactivated (`is_active` flips to
/// false), never deleted, so orders keep a valid product reference.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
  pub id: Uuid,
  pub seller_id: Uuid,
  pub category_id: Option<Uuid>,
  pub title: String,
  pub description: Option<String>,
  pub price: Decimal,
  pub stock: i32,
  /// Ordered image URLs; the first one is the card thumbnail.
  pub images: Vec<String>,
  pub condition: Condition,
  pub is_active: bool,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}
