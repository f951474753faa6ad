// core/src/error.rs

use thiserror::Error;

/// Postgres error code for a unique-constraint violation.
const PG_UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, Error)]
pub enum MarketError {
  /// A mutation was attempted without a buyer/seller session. Interaction
  /// layers recover by redirecting to the sign-in flow; this is never shown
  /// to the user as a raw error.
  #[error("authentication required")]
  Unauthenticated,

  #[error("{0} not found")]
  NotFound(String),

  /// The requested quantity does not fit the current stock. Recoverable:
  /// callers clamp to `available` and re-prompt.
  #[error("requested quantity {requested} exceeds available stock ({available})")]
  StockExceeded { requested: i32, available: i32 },

  /// A uniqueness or consistency constraint would be broken. The cart's
  /// (buyer_id, product_id) key resolves this automatically via upsert, so
  /// surfacing it means a genuinely conflicting concurrent write.
  #[error("constraint violated: {0}")]
  ConstraintViolation(String),

  #[error("invalid input: {0}")]
  Validation(String),

  /// Network or store failure. Surfaced with a generic retry-suggesting
  /// message; the failed operation is not retried automatically.
  #[error("data store error: {0}")]
  Store(#[source] sqlx::Error),

  #[error("configuration error: {0}")]
  Config(String),

  #[error("internal error: {0}")]
  Internal(String),
}

impl MarketError {
  pub fn not_found(what: impl Into<String>) -> Self {
    MarketError::NotFound(what.into())
  }

  /// Whether the failure is a transport/store fault worth suggesting a
  /// retry for, as opposed to a rule the caller broke.
  pub fn is_transient(&self) -> bool {
    matches!(self, MarketError::Store(_))
  }
}

impl From<sqlx::Error> for MarketError {
  fn from(err: sqlx::Error) -> Self {
    if let sqlx::Error::Database(db) = &err {
      if db.code().as_deref() == Some(PG_UNIQUE_VIOLATION) {
        let constraint = db.constraint().unwrap_or("unique constraint").to_string();
        return MarketError::ConstraintViolation(constraint);
      }
    }
    MarketError::Store(err)
  }
}

// Convenience for edges that bubble anyhow::Error (e.g. embedding code).
impl From<anyhow::Error> for MarketError {
  fn from(err: anyhow::Error) -> Self {
    if err.is::<sqlx::Error>() {
      return MarketError::from(err.downcast::<sqlx::Error>().unwrap());
    }
    MarketError::Internal(err.to_string())
  }
}

pub type Result<T, E = MarketError> = std::result::Result<T, E>;
