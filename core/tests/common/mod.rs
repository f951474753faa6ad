// tests/common/mod.rs
#![allow(dead_code)] // Allow unused helpers in this common test module

use chrono::{Duration, Utc};
use feria_core::models::{Category, Condition, Order, OrderStatus, Product, Profile};
use feria_core::notify::NotificationSink;
use feria_core::session::Session;
use feria_core::store::MemStore;
use rust_decimal::Decimal;
use std::sync::Mutex;
use uuid::Uuid;

pub fn session(user_id: Uuid) -> Session {
  Session { user_id }
}

/// An active, brand-new listing; tweak fields per test as needed.
pub fn product(seller_id: Uuid, title: &str, price: Decimal, stock: i32) -> Product {
  let now = Utc::now();
  Product {
    id: Uuid::new_v4(),
    seller_id,
    category_id: None,
    title: title.to_string(),
    description: None,
    price,
    stock,
    images: Vec::new(),
    condition: Condition::New,
    is_active: true,
    created_at: now,
    updated_at: now,
  }
}

/// Same listing, created `age_secs` in the past, for newest-first assertions.
pub fn aged_product(seller_id: Uuid, title: &str, price: Decimal, stock: i32, age_secs: i64) -> Product {
  let mut p = product(seller_id, title, price, stock);
  p.created_at = Utc::now() - Duration::seconds(age_secs);
  p
}

pub fn order(
  seller_id: Uuid,
  buyer_id: Uuid,
  product_id: Uuid,
  quantity: i32,
  total_price: Decimal,
  status: OrderStatus,
  age_secs: i64,
) -> Order {
  Order {
    id: Uuid::new_v4(),
    buyer_id,
    seller_id,
    product_id,
    quantity,
    total_price,
    status,
    created_at: Utc::now() - Duration::seconds(age_secs),
  }
}

pub fn category(name: &str) -> Category {
  Category {
    id: Uuid::new_v4(),
    name: name.to_string(),
  }
}

pub fn profile(full_name: &str) -> Profile {
  Profile {
    id: Uuid::new_v4(),
    full_name: Some(full_name.to_string()),
  }
}

pub fn store_with(products: Vec<Product>) -> MemStore {
  let store = MemStore::new();
  for p in products {
    store.insert_product(p);
  }
  store
}

/// Captures sink traffic for assertions.
#[derive(Default)]
pub struct RecordingSink {
  messages: Mutex<Vec<(bool, String)>>,
}

impl RecordingSink {
  pub fn successes(&self) -> Vec<String> {
    self
      .messages
      .lock()
      .unwrap()
      .iter()
      .filter(|(ok, _)| *ok)
      .map(|(_, m)| m.clone())
      .collect()
  }

  pub fn failures(&self) -> Vec<String> {
    self
      .messages
      .lock()
      .unwrap()
      .iter()
      .filter(|(ok, _)| !*ok)
      .map(|(_, m)| m.clone())
      .collect()
  }

  pub fn is_empty(&self) -> bool {
    self.messages.lock().unwrap().is_empty()
  }
}

impl NotificationSink for RecordingSink {
  fn success(&self, message: &str) {
    self.messages.lock().unwrap().push((true, message.to_string()));
  }

  fn failure(&self, message: &str) {
    self.messages.lock().unwrap().push((false, message.to_string()));
  }
}
