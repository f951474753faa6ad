// core/src/seller.rs

//! Seller dashboard aggregation: metrics derived from the order and product
//! collections for one seller.

use crate::error::Result;
use crate::models::{OrderStatus, RecentOrder};
use crate::session::Session;
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashSet;

/// How many enriched orders the dashboard shows.
pub const RECENT_ORDERS_PAGE_SIZE: usize = 5;

/// Which order statuses count toward the sales total.
///
/// The historical behavior sums over ALL statuses, pending and cancelled
/// included; that stays the default so existing dashboards keep their
/// numbers, and a caller that wants completed-only revenue can say so.
#[derive(Debug, Clone, Default)]
pub struct SalesFilter {
  pub include_statuses: Option<HashSet<OrderStatus>>,
}

impl SalesFilter {
  /// Sum over every order regardless of status.
  pub fn all_statuses() -> Self {
    Self::default()
  }

  pub fn only(statuses: impl IntoIterator<Item = OrderStatus>) -> Self {
    Self {
      include_statuses: Some(statuses.into_iter().collect()),
    }
  }

  pub fn admits(&self, status: OrderStatus) -> bool {
    match &self.include_statuses {
      None => true,
      Some(set) => set.contains(&status),
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct SellerDashboard {
  pub total_sales: Decimal,
  pub active_products: i64,
  pub pending_orders: i64,
  pub recent_orders: Vec<RecentOrder>,
}

/// Folds (total_price, status) pairs into (sales total, pending count).
/// Shared by both store backends so the aggregation cannot drift. The
/// pending count always counts `pending` rows; the filter narrows only the
/// sales sum.
pub fn summarize_sales<I>(orders: I, filter: &SalesFilter) -> (Decimal, i64)
where
  I: IntoIterator<Item = (Decimal, OrderStatus)>,
{
  let mut total_sales = Decimal::ZERO;
  let mut pending = 0;
  for (total_price, status) in orders {
    if filter.admits(status) {
      total_sales += total_price;
    }
    if status == OrderStatus::Pending {
      pending += 1;
    }
  }
  (total_sales, pending)
}

#[async_trait]
pub trait SellerReporting: Send + Sync {
  /// Metrics for the session holder acting as a seller: sales total under
  /// `filter`, active product count, pending order count, and the
  /// [`RECENT_ORDERS_PAGE_SIZE`] most recent orders enriched with product
  /// title and buyer name, newest first.
  async fn dashboard(&self, session: Option<&Session>, filter: &SalesFilter) -> Result<SellerDashboard>;
}

#[cfg(test)]
mod tests {
  use super::*;
  use rust_decimal_macros::dec;

  #[test]
  fn default_filter_admits_every_status() {
    let orders = [
      (dec!(100), OrderStatus::Pending),
      (dec!(200), OrderStatus::Cancelled),
      (dec!(300), OrderStatus::Completed),
    ];
    let (sales, pending) = summarize_sales(orders, &SalesFilter::all_statuses());
    assert_eq!(sales, dec!(600));
    assert_eq!(pending, 1);
  }

  #[test]
  fn narrowed_filter_keeps_pending_count_intact() {
    let orders = [
      (dec!(100), OrderStatus::Pending),
      (dec!(200), OrderStatus::Cancelled),
      (dec!(300), OrderStatus::Completed),
    ];
    let filter = SalesFilter::only([OrderStatus::Completed, OrderStatus::Shipped]);
    let (sales, pending) = summarize_sales(orders, &filter);
    assert_eq!(sales, dec!(300));
    assert_eq!(pending, 1);
  }

  #[test]
  fn no_orders_means_zero_everything() {
    let (sales, pending) = summarize_sales(Vec::new(), &SalesFilter::all_statuses());
    assert_eq!(sales, Decimal::ZERO);
    assert_eq!(pending, 0);
  }
}
