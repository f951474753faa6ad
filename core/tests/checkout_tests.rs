// tests/checkout_tests.rs

//! Order placement: immutable price snapshots, conditional stock decrement,
//! all-or-nothing semantics, and status transitions.

mod common;

use common::{product, session, store_with};
use feria_core::catalog::{CatalogRepository, ProductDraft};
use feria_core::cart::CartRepository;
use feria_core::checkout::OrderRepository;
use feria_core::error::MarketError;
use feria_core::models::{Condition, OrderStatus};
use rust_decimal_macros::dec;
use uuid::Uuid;

#[tokio::test]
async fn placement_snapshots_the_price_and_clears_the_cart() {
  let seller = session(Uuid::new_v4());
  let p = product(seller.user_id, "Camera", dec!(1000), 5);
  let product_id = p.id;
  let store = store_with(vec![p]);
  let buyer = session(Uuid::new_v4());

  store.add_or_merge(Some(&buyer), product_id, 2).await.unwrap();
  let orders = store.place_from_cart(Some(&buyer)).await.unwrap();

  assert_eq!(orders.len(), 1);
  assert_eq!(orders[0].total_price, dec!(2000));
  assert_eq!(orders[0].status, OrderStatus::Pending);
  assert_eq!(orders[0].seller_id, seller.user_id);
  assert_eq!(store.count(Some(&buyer)).await.unwrap(), 0);
  assert_eq!(store.product(product_id).await.unwrap().stock, 3);

  // Repricing after the fact must not touch the snapshot.
  store
    .update_product(
      Some(&seller),
      product_id,
      ProductDraft {
        title: "Camera".into(),
        description: None,
        price: dec!(9999),
        stock: 3,
        images: vec![],
        condition: Condition::New,
        category_id: None,
      },
    )
    .await
    .unwrap();
  let shipped = store
    .set_status(Some(&seller), orders[0].id, OrderStatus::Shipped)
    .await
    .unwrap();
  assert_eq!(shipped.total_price, dec!(2000));
}

#[tokio::test]
async fn empty_cart_places_nothing() {
  let store = store_with(vec![]);
  let buyer = session(Uuid::new_v4());
  let orders = store.place_from_cart(Some(&buyer)).await.unwrap();
  assert!(orders.is_empty());
}

#[tokio::test]
async fn placement_is_all_or_nothing() {
  let seller = session(Uuid::new_v4());
  let plenty = product(seller.user_id, "Plenty", dec!(100), 10);
  let scarce = product(seller.user_id, "Scarce", dec!(100), 5);
  let (plenty_id, scarce_id) = (plenty.id, scarce.id);
  let store = store_with(vec![plenty, scarce]);
  let buyer = session(Uuid::new_v4());

  store.add_or_merge(Some(&buyer), plenty_id, 2).await.unwrap();
  store.add_or_merge(Some(&buyer), scarce_id, 3).await.unwrap();

  // Stock drops underneath the cart between add and checkout.
  store
    .update_product(
      Some(&seller),
      scarce_id,
      ProductDraft {
        title: "Scarce".into(),
        description: None,
        price: dec!(100),
        stock: 1,
        images: vec![],
        condition: Condition::New,
        category_id: None,
      },
    )
    .await
    .unwrap();

  assert!(matches!(
    store.place_from_cart(Some(&buyer)).await,
    Err(MarketError::StockExceeded {
      requested: 3,
      available: 1
    })
  ));
  // Nothing moved: stocks untouched, cart intact.
  assert_eq!(store.product(plenty_id).await.unwrap().stock, 10);
  assert_eq!(store.product(scarce_id).await.unwrap().stock, 1);
  assert_eq!(store.count(Some(&buyer)).await.unwrap(), 2);
}

#[tokio::test]
async fn two_buyers_cannot_claim_the_same_units() {
  let seller = Uuid::new_v4();
  let p = product(seller, "Limited Run", dec!(500), 5);
  let product_id = p.id;
  let store = store_with(vec![p]);
  let first = session(Uuid::new_v4());
  let second = session(Uuid::new_v4());

  // Both pass the add-time guard against the same stock of 5.
  store.add_or_merge(Some(&first), product_id, 3).await.unwrap();
  store.add_or_merge(Some(&second), product_id, 3).await.unwrap();

  assert_eq!(store.place_from_cart(Some(&first)).await.unwrap().len(), 1);
  assert_eq!(store.product(product_id).await.unwrap().stock, 2);

  // The decrement is conditional on remaining stock, so the loser of the
  // race is refused instead of driving stock negative.
  assert!(matches!(
    store.place_from_cart(Some(&second)).await,
    Err(MarketError::StockExceeded {
      requested: 3,
      available: 2
    })
  ));
  assert_eq!(store.product(product_id).await.unwrap().stock, 2);
}

#[tokio::test]
async fn status_transitions_are_validated_and_seller_scoped() {
  let seller = session(Uuid::new_v4());
  let p = product(seller.user_id, "Guitar", dec!(300), 2);
  let product_id = p.id;
  let store = store_with(vec![p]);
  let buyer = session(Uuid::new_v4());

  store.add_one(Some(&buyer), product_id).await.unwrap();
  let order_id = store.place_from_cart(Some(&buyer)).await.unwrap()[0].id;

  // Someone who is not the seller sees nothing to transition.
  assert!(matches!(
    store.set_status(Some(&buyer), order_id, OrderStatus::Shipped).await,
    Err(MarketError::NotFound(_))
  ));

  let shipped = store
    .set_status(Some(&seller), order_id, OrderStatus::Shipped)
    .await
    .unwrap();
  assert_eq!(shipped.status, OrderStatus::Shipped);

  assert!(matches!(
    store.set_status(Some(&seller), order_id, OrderStatus::Pending).await,
    Err(MarketError::Validation(_))
  ));

  store
    .set_status(Some(&seller), order_id, OrderStatus::Completed)
    .await
    .unwrap();
  // Terminal: no way out of completed.
  assert!(matches!(
    store.set_status(Some(&seller), order_id, OrderStatus::Cancelled).await,
    Err(MarketError::Validation(_))
  ));
}
