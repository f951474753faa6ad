// core/src/stock.rs

//! Stock guard: the bound-checking rule keeping cart and order quantities
//! within available inventory. UI affordances (disabling +/- controls) are
//! built on top of this, never instead of it; stock can change between
//! render and mutation, so the stores re-apply the bound inside their
//! conditional statements as well.

use crate::error::{MarketError, Result};

/// Rejects quantities below one. Shared by every mutation entry point.
pub fn validate_requested(requested: i32) -> Result<()> {
  if requested < 1 {
    return Err(MarketError::Validation(format!(
      "quantity must be at least 1, got {}",
      requested
    )));
  }
  Ok(())
}

/// Full guard: returns the accepted quantity, or rejects with no mutation
/// performed. Stock 0 blocks even the initial add-to-cart.
pub fn clamp(requested: i32, available: i32) -> Result<i32> {
  validate_requested(requested)?;
  if requested > available {
    return Err(MarketError::StockExceeded {
      requested,
      available,
    });
  }
  Ok(requested)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn rejects_quantities_below_one() {
    assert!(matches!(clamp(0, 5), Err(MarketError::Validation(_))));
    assert!(matches!(clamp(-3, 5), Err(MarketError::Validation(_))));
  }

  #[test]
  fn rejects_quantities_over_stock() {
    match clamp(6, 5) {
      Err(MarketError::StockExceeded { requested, available }) => {
        assert_eq!((requested, available), (6, 5));
      }
      other => panic!("expected StockExceeded, got {:?}", other),
    }
  }

  #[test]
  fn accepts_exact_stock() {
    assert_eq!(clamp(5, 5).unwrap(), 5);
    assert_eq!(clamp(1, 5).unwrap(), 1);
  }

  #[test]
  fn zero_stock_blocks_any_request() {
    assert!(matches!(clamp(1, 0), Err(MarketError::StockExceeded { .. })));
  }
}
