// tests/catalog_tests.rs

//! Facet semantics: conjunctive filters over active products, newest first,
//! with the home view capped and the search view unbounded.

mod common;

use common::{aged_product, category, store_with};
use feria_core::catalog::{CatalogRepository, ProductFacets, FEATURED_PAGE_SIZE};
use feria_core::models::Condition;
use feria_core::store::MemStore;
use rust_decimal_macros::dec;
use uuid::Uuid;

#[tokio::test]
async fn text_matches_title_or_description_case_insensitively() {
  let seller = Uuid::new_v4();
  let laptop = aged_product(seller, "Gaming LAPTOP", dec!(800000), 5, 10);
  let desk = {
    let mut p = aged_product(seller, "Standing Desk", dec!(150000), 2, 20);
    p.description = Some("Wide enough for a laptop and a monitor".into());
    p
  };
  let phone = aged_product(seller, "Phone", dec!(300000), 8, 30);
  let hidden = {
    let mut p = aged_product(seller, "Lapel Microphone", dec!(50000), 1, 5);
    p.is_active = false;
    p
  };
  let ids = (laptop.id, desk.id);
  let store = store_with(vec![laptop, desk, phone, hidden]);

  let hits = store.search(&ProductFacets::default().with_text("lap")).await.unwrap();
  // Newest first: the laptop (10s old) before the desk (20s old); the
  // inactive lapel mic never appears.
  assert_eq!(hits.iter().map(|p| p.id).collect::<Vec<_>>(), vec![ids.0, ids.1]);
}

#[tokio::test]
async fn blank_text_returns_every_active_product() {
  let seller = Uuid::new_v4();
  let store = store_with(vec![
    aged_product(seller, "One", dec!(1000), 1, 3),
    aged_product(seller, "Two", dec!(2000), 1, 2),
    aged_product(seller, "Three", dec!(3000), 1, 1),
  ]);

  let all = store.search(&ProductFacets::default()).await.unwrap();
  assert_eq!(all.len(), 3);
  let blank = store.search(&ProductFacets::default().with_text("  ")).await.unwrap();
  assert_eq!(blank.len(), 3);
}

#[tokio::test]
async fn multiple_words_stay_one_substring() {
  let seller = Uuid::new_v4();
  let exact = aged_product(seller, "Best gaming laptop deal", dec!(700000), 2, 10);
  let scrambled = aged_product(seller, "Laptop for gaming", dec!(600000), 2, 20);
  let exact_id = exact.id;
  let store = store_with(vec![exact, scrambled]);

  let hits = store
    .search(&ProductFacets::default().with_text("gaming laptop"))
    .await
    .unwrap();
  assert_eq!(hits.iter().map(|p| p.id).collect::<Vec<_>>(), vec![exact_id]);
}

#[tokio::test]
async fn facets_intersect() {
  let seller = Uuid::new_v4();
  let electronics = category("Electronics");
  let mut tv = aged_product(seller, "Used TV", dec!(90000), 1, 10);
  tv.condition = Condition::Used;
  tv.category_id = Some(electronics.id);
  let mut new_tv = aged_product(seller, "New TV", dec!(200000), 1, 20);
  new_tv.category_id = Some(electronics.id);
  let mut couch = aged_product(seller, "Used Couch", dec!(90000), 1, 30);
  couch.condition = Condition::Used;

  let tv_id = tv.id;
  let store = store_with(vec![tv, new_tv, couch]);
  store.insert_category(electronics.clone());

  let hits = store
    .search(
      &ProductFacets::default()
        .with_text("tv")
        .in_category(electronics.id)
        .with_condition(Condition::Used),
    )
    .await
    .unwrap();
  assert_eq!(hits.iter().map(|p| p.id).collect::<Vec<_>>(), vec![tv_id]);
}

#[tokio::test]
async fn unmatched_category_yields_zero_results_not_an_error() {
  let seller = Uuid::new_v4();
  let store = store_with(vec![aged_product(seller, "Anything", dec!(5000), 1, 1)]);
  let hits = store
    .search(&ProductFacets::default().in_category(Uuid::new_v4()))
    .await
    .unwrap();
  assert!(hits.is_empty());
}

#[tokio::test]
async fn price_bounds_are_inclusive() {
  let seller = Uuid::new_v4();
  let low = aged_product(seller, "Low", dec!(100), 1, 1);
  let mid = aged_product(seller, "Mid", dec!(500), 1, 2);
  let high = aged_product(seller, "High", dec!(900), 1, 3);
  let below = aged_product(seller, "Below", dec!(99), 1, 4);
  let above = aged_product(seller, "Above", dec!(901), 1, 5);
  let kept = vec![low.id, mid.id, high.id];
  let store = store_with(vec![low, mid, high, below, above]);

  let hits = store
    .search(&ProductFacets::default().priced_between(dec!(100), dec!(900)))
    .await
    .unwrap();
  let mut hit_ids: Vec<_> = hits.iter().map(|p| p.id).collect();
  hit_ids.sort();
  let mut expected = kept;
  expected.sort();
  assert_eq!(hit_ids, expected);
}

#[tokio::test]
async fn featured_is_capped_while_search_is_not() {
  let seller = Uuid::new_v4();
  let mut products = Vec::new();
  for age in 1..=15 {
    products.push(aged_product(seller, &format!("Item {}", age), dec!(1000), 1, age));
  }
  let newest = products[0].id;
  let store = store_with(products);

  let featured = store.featured().await.unwrap();
  assert_eq!(featured.len(), FEATURED_PAGE_SIZE as usize);
  assert_eq!(featured[0].id, newest);
  for pair in featured.windows(2) {
    assert!(pair[0].created_at >= pair[1].created_at);
  }

  let all = store.search(&ProductFacets::default()).await.unwrap();
  assert_eq!(all.len(), 15);
}

#[tokio::test]
async fn categories_come_back_sorted_by_name() {
  let store = MemStore::new();
  store.insert_category(category("Hogar"));
  store.insert_category(category("Electrónica"));
  store.insert_category(category("Vehículos"));

  let names: Vec<_> = store.categories().await.unwrap().into_iter().map(|c| c.name).collect();
  assert_eq!(names, vec!["Electrónica", "Hogar", "Vehículos"]);
}
