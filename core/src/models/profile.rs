// core/src/models/profile.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Identity row. Buyers and sellers are not separate types; any profile may
/// act as either. Read-only from this crate's perspective.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profile {
  pub id: Uuid,
  pub full_name: Option<String>,
}
