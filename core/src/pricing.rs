// core/src/pricing.rs

//! Totals for a set of cart lines. All monetary arithmetic is exact
//! `Decimal`; nothing is rounded mid-calculation. Rounding happens only when
//! a presentation layer formats a figure for display.

use crate::models::CartLine;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// Fixed tax rate (19%). Not configurable per region in this core.
pub const TAX_RATE: Decimal = dec!(0.19);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Totals {
  pub subtotal: Decimal,
  pub tax: Decimal,
  pub total: Decimal,
}

impl Totals {
  pub const ZERO: Totals = Totals {
    subtotal: dec!(0),
    tax: dec!(0),
    total: dec!(0),
  };
}

/// Folds (unit price, quantity) pairs into subtotal, tax, and grand total.
/// An empty cart yields all zeros, not an error.
pub fn compute_totals<I>(items: I) -> Totals
where
  I: IntoIterator<Item = (Decimal, i32)>,
{
  let subtotal: Decimal = items
    .into_iter()
    .map(|(price, quantity)| price * Decimal::from(quantity))
    .sum();
  let tax = subtotal * TAX_RATE;
  Totals {
    subtotal,
    tax,
    total: subtotal + tax,
  }
}

/// Totals over joined cart lines, using the live price read with each line.
pub fn cart_totals(lines: &[CartLine]) -> Totals {
  compute_totals(lines.iter().map(|line| (line.price, line.quantity)))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_cart_totals_are_zero() {
    let totals = compute_totals(Vec::<(Decimal, i32)>::new());
    assert_eq!(totals, Totals::ZERO);
  }

  #[test]
  fn totals_sum_lines_and_apply_tax() {
    let totals = compute_totals([(dec!(1000), 2), (dec!(500), 1)]);
    assert_eq!(totals.subtotal, dec!(2500));
    assert_eq!(totals.tax, dec!(475));
    assert_eq!(totals.total, dec!(2975));
  }

  #[test]
  fn no_rounding_before_the_end() {
    // 0.10 * 3 = 0.30; tax 0.057 stays at full precision.
    let totals = compute_totals([(dec!(0.10), 3)]);
    assert_eq!(totals.subtotal, dec!(0.30));
    assert_eq!(totals.tax, dec!(0.057));
    assert_eq!(totals.total, dec!(0.357));
  }
}
