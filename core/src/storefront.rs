// core/src/storefront.rs

//! Interaction boundary over the repositories: applies the recovery policy
//! for each error class and feeds the notification sink. No error here is
//! fatal; everything resolves to an [`Outcome`] the presentation layer can
//! render.
//!
//! Policy:
//! - `Unauthenticated` becomes [`Outcome::SignInRequired`] and is never
//!   surfaced as a raw error.
//! - `StockExceeded` on a quantity change is recovered by clamping to the
//!   available stock and re-applying, with a message explaining the
//!   adjustment.
//! - Store failures produce a generic retry-suggesting message through the
//!   sink; the operation is not retried automatically, the user re-triggers
//!   it.

use crate::cart::CartRepository;
use crate::checkout::OrderRepository;
use crate::error::MarketError;
use crate::models::{CartItem, CartLine, Order};
use crate::notify::NotificationSink;
use crate::pricing::{self, Totals};
use crate::session::SessionProvider;
use std::sync::Arc;
use tracing::{instrument, warn};
use uuid::Uuid;

/// How an interaction resolved. `Failed` means the user was told via the
/// sink and may re-trigger the action.
#[derive(Debug)]
pub enum Outcome<T> {
  Completed(T),
  SignInRequired,
  Failed,
}

impl<T> Outcome<T> {
  pub fn completed(self) -> Option<T> {
    match self {
      Outcome::Completed(value) => Some(value),
      _ => None,
    }
  }

  pub fn is_completed(&self) -> bool {
    matches!(self, Outcome::Completed(_))
  }
}

pub struct Storefront<S: ?Sized> {
  store: Arc<S>,
  sessions: SessionProvider,
  sink: Arc<dyn NotificationSink>,
}

impl<S> Storefront<S>
where
  S: CartRepository + OrderRepository + ?Sized,
{
  pub fn new(store: Arc<S>, sessions: SessionProvider, sink: Arc<dyn NotificationSink>) -> Self {
    Self { store, sessions, sink }
  }

  pub fn sessions(&self) -> &SessionProvider {
    &self.sessions
  }

  #[instrument(name = "storefront::add_to_cart", skip(self), fields(product_id = %product_id))]
  pub async fn add_to_cart(&self, product_id: Uuid) -> Outcome<CartItem> {
    let session = self.sessions.current();
    let result = self.store.add_one(session.as_ref(), product_id).await;
    self.settle(result, "Product added to your cart", "Could not add the product to your cart")
  }

  #[instrument(name = "storefront::change_quantity", skip(self), fields(item_id = %item_id))]
  pub async fn change_quantity(&self, item_id: Uuid, quantity: i32) -> Outcome<CartItem> {
    let session = self.sessions.current();
    if quantity < 1 {
      // Decrement control bottoms out at 1; nothing to persist.
      return Outcome::Failed;
    }
    match self.store.set_quantity(session.as_ref(), item_id, quantity).await {
      Err(MarketError::StockExceeded { available, .. }) if available > 0 => {
        let retried = self.store.set_quantity(session.as_ref(), item_id, available).await;
        self.settle(
          retried,
          &format!("Only {} in stock; quantity adjusted", available),
          "Could not update the quantity",
        )
      }
      result => self.settle(result, "Quantity updated", "Could not update the quantity"),
    }
  }

  #[instrument(name = "storefront::remove_item", skip(self), fields(item_id = %item_id))]
  pub async fn remove_item(&self, item_id: Uuid) -> Outcome<()> {
    let session = self.sessions.current();
    let result = self.store.remove(session.as_ref(), item_id).await;
    self.settle(result, "Product removed from your cart", "Could not remove the product")
  }

  /// The cart page payload: joined lines plus totals over live prices.
  #[instrument(name = "storefront::cart", skip(self))]
  pub async fn cart(&self) -> Outcome<(Vec<CartLine>, Totals)> {
    let session = self.sessions.current();
    match self.store.list(session.as_ref()).await {
      Ok(lines) => {
        let totals = pricing::cart_totals(&lines);
        Outcome::Completed((lines, totals))
      }
      Err(MarketError::Unauthenticated) => Outcome::SignInRequired,
      Err(err) => {
        warn!(error = %err, "cart fetch failed");
        self.sink.failure("Could not load your cart, please try again");
        Outcome::Failed
      }
    }
  }

  #[instrument(name = "storefront::checkout", skip(self))]
  pub async fn checkout(&self) -> Outcome<Vec<Order>> {
    let session = self.sessions.current();
    let result = self.store.place_from_cart(session.as_ref()).await;
    self.settle(result, "Order placed", "Could not complete your order")
  }

  fn settle<T>(&self, result: crate::error::Result<T>, done: &str, failed: &str) -> Outcome<T> {
    match result {
      Ok(value) => {
        self.sink.success(done);
        Outcome::Completed(value)
      }
      Err(MarketError::Unauthenticated) => Outcome::SignInRequired,
      Err(err) => {
        warn!(error = %err, "storefront mutation failed");
        let message = if err.is_transient() {
          format!("{}, please try again", failed)
        } else {
          failed.to_string()
        };
        self.sink.failure(&message);
        Outcome::Failed
      }
    }
  }
}
