// core/src/store/memory.rs

//! In-memory backend: locked `HashMap` collections behind the same
//! repository traits as the Postgres store. Used by the test suite and for
//! embedding the core without a database. Locks are always taken in
//! products -> cart_items -> orders order.

use crate::cart::CartRepository;
use crate::catalog::{CatalogRepository, ProductDraft, ProductFacets, FEATURED_PAGE_SIZE};
use crate::checkout::OrderRepository;
use crate::error::{MarketError, Result};
use crate::models::{CartItem, CartLine, Category, Order, OrderStatus, Product, Profile, RecentOrder};
use crate::seller::{self, SalesFilter, SellerDashboard, SellerReporting, RECENT_ORDERS_PAGE_SIZE};
use crate::session::{self, Session};
use crate::stock;
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Default)]
pub struct MemStore {
  products: RwLock<HashMap<Uuid, Product>>,
  cart_items: RwLock<HashMap<Uuid, CartItem>>,
  orders: RwLock<HashMap<Uuid, Order>>,
  categories: RwLock<Vec<Category>>,
  profiles: RwLock<HashMap<Uuid, Profile>>,
}

impl MemStore {
  pub fn new() -> Self {
    Self::default()
  }

  // Seeding hooks; the storefront only ever goes through the traits.

  pub fn insert_product(&self, product: Product) {
    self.products.write().insert(product.id, product);
  }

  pub fn insert_category(&self, category: Category) {
    self.categories.write().push(category);
  }

  pub fn insert_profile(&self, profile: Profile) {
    self.profiles.write().insert(profile.id, profile);
  }

  pub fn insert_order(&self, order: Order) {
    self.orders.write().insert(order.id, order);
  }
}

#[async_trait]
impl CatalogRepository for MemStore {
  async fn search(&self, facets: &ProductFacets) -> Result<Vec<Product>> {
    let mut hits: Vec<Product> = self
      .products
      .read()
      .values()
      .filter(|product| facets.matches(product))
      .cloned()
      .collect();
    hits.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(hits)
  }

  async fn featured(&self) -> Result<Vec<Product>> {
    let mut active: Vec<Product> = self.products.read().values().filter(|p| p.is_active).cloned().collect();
    active.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    active.truncate(FEATURED_PAGE_SIZE as usize);
    Ok(active)
  }

  async fn product(&self, product_id: Uuid) -> Result<Product> {
    self
      .products
      .read()
      .get(&product_id)
      .cloned()
      .ok_or_else(|| MarketError::not_found("product"))
  }

  async fn categories(&self) -> Result<Vec<Category>> {
    let mut categories = self.categories.read().clone();
    categories.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(categories)
  }

  async fn profile(&self, profile_id: Uuid) -> Result<Profile> {
    self
      .profiles
      .read()
      .get(&profile_id)
      .cloned()
      .ok_or_else(|| MarketError::not_found("profile"))
  }

  async fn seller_products(&self, session: Option<&Session>) -> Result<Vec<Product>> {
    let seller = session::require(session)?;
    let mut mine: Vec<Product> = self
      .products
      .read()
      .values()
      .filter(|p| p.seller_id == seller.user_id)
      .cloned()
      .collect();
    mine.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(mine)
  }

  async fn create_product(&self, session: Option<&Session>, draft: ProductDraft) -> Result<Product> {
    let seller = session::require(session)?;
    draft.validate()?;
    let now = Utc::now();
    let product = Product {
      id: Uuid::new_v4(),
      seller_id: seller.user_id,
      category_id: draft.category_id,
      title: draft.title,
      description: draft.description,
      price: draft.price,
      stock: draft.stock,
      images: draft.images,
      condition: draft.condition,
      is_active: true,
      created_at: now,
      updated_at: now,
    };
    self.products.write().insert(product.id, product.clone());
    Ok(product)
  }

  async fn update_product(&self, session: Option<&Session>, product_id: Uuid, draft: ProductDraft) -> Result<Product> {
    let seller = session::require(session)?;
    draft.validate()?;
    let mut products = self.products.write();
    let product = products
      .get_mut(&product_id)
      .filter(|p| p.seller_id == seller.user_id)
      .ok_or_else(|| MarketError::not_found("product"))?;
    product.category_id = draft.category_id;
    product.title = draft.title;
    product.description = draft.description;
    product.price = draft.price;
    product.stock = draft.stock;
    product.images = draft.images;
    product.condition = draft.condition;
    product.updated_at = Utc::now();
    Ok(product.clone())
  }

  async fn deactivate_product(&self, session: Option<&Session>, product_id: Uuid) -> Result<Product> {
    let seller = session::require(session)?;
    let mut products = self.products.write();
    let product = products
      .get_mut(&product_id)
      .filter(|p| p.seller_id == seller.user_id)
      .ok_or_else(|| MarketError::not_found("product"))?;
    product.is_active = false;
    product.updated_at = Utc::now();
    Ok(product.clone())
  }
}

#[async_trait]
impl CartRepository for MemStore {
  async fn add_or_merge(&self, session: Option<&Session>, product_id: Uuid, quantity: i32) -> Result<CartItem> {
    let buyer = session::require(session)?;
    stock::validate_requested(quantity)?;

    let available = {
      let products = self.products.read();
      let product = products
        .get(&product_id)
        .filter(|p| p.is_active)
        .ok_or_else(|| MarketError::not_found("product"))?;
      product.stock
    };
    let quantity = stock::clamp(quantity, available)?;

    let mut items = self.cart_items.write();
    if let Some(existing) = items
      .values_mut()
      .find(|item| item.buyer_id == buyer.user_id && item.product_id == product_id)
    {
      // Merge is last-write-wins on the quantity field.
      existing.quantity = quantity;
      existing.added_at = Utc::now();
      return Ok(existing.clone());
    }
    let item = CartItem {
      id: Uuid::new_v4(),
      buyer_id: buyer.user_id,
      product_id,
      quantity,
      added_at: Utc::now(),
    };
    items.insert(item.id, item.clone());
    Ok(item)
  }

  async fn set_quantity(&self, session: Option<&Session>, item_id: Uuid, quantity: i32) -> Result<CartItem> {
    let buyer = session::require(session)?;
    stock::validate_requested(quantity)?;

    let products = self.products.read();
    let mut items = self.cart_items.write();
    let item = items
      .get_mut(&item_id)
      .filter(|item| item.buyer_id == buyer.user_id)
      .ok_or_else(|| MarketError::not_found("cart item"))?;
    let available = products.get(&item.product_id).map(|p| p.stock).unwrap_or(0);
    let quantity = stock::clamp(quantity, available)?;
    item.quantity = quantity;
    Ok(item.clone())
  }

  async fn remove(&self, session: Option<&Session>, item_id: Uuid) -> Result<()> {
    let buyer = session::require(session)?;
    let mut items = self.cart_items.write();
    if let Some(item) = items.get(&item_id) {
      if item.buyer_id == buyer.user_id {
        items.remove(&item_id);
      }
    }
    // An absent id is already satisfied.
    Ok(())
  }

  async fn list(&self, session: Option<&Session>) -> Result<Vec<CartLine>> {
    let buyer = session::require(session)?;
    let products = self.products.read();
    let items = self.cart_items.read();
    let mut lines: Vec<(chrono::DateTime<Utc>, CartLine)> = items
      .values()
      .filter(|item| item.buyer_id == buyer.user_id)
      .filter_map(|item| {
        let product = products.get(&item.product_id)?;
        Some((
          item.added_at,
          CartLine {
            item_id: item.id,
            product_id: product.id,
            quantity: item.quantity,
            title: product.title.clone(),
            price: product.price,
            images: product.images.clone(),
            stock: product.stock,
          },
        ))
      })
      .collect();
    lines.sort_by(|a, b| b.0.cmp(&a.0));
    Ok(lines.into_iter().map(|(_, line)| line).collect())
  }

  async fn count(&self, session: Option<&Session>) -> Result<i64> {
    let buyer = session::require(session)?;
    let count = self
      .cart_items
      .read()
      .values()
      .filter(|item| item.buyer_id == buyer.user_id)
      .count();
    Ok(count as i64)
  }
}

#[async_trait]
impl OrderRepository for MemStore {
  async fn place_from_cart(&self, session: Option<&Session>) -> Result<Vec<Order>> {
    let buyer = session::require(session)?;

    let mut products = self.products.write();
    let mut items = self.cart_items.write();
    let mut orders = self.orders.write();

    let line_ids: Vec<Uuid> = items
      .values()
      .filter(|item| item.buyer_id == buyer.user_id)
      .map(|item| item.id)
      .collect();

    // All-or-nothing: check every line before the first decrement.
    for item in items.values().filter(|item| item.buyer_id == buyer.user_id) {
      let product = products
        .get(&item.product_id)
        .ok_or_else(|| MarketError::not_found("product"))?;
      stock::clamp(item.quantity, product.stock)?;
    }

    let mut placed = Vec::with_capacity(line_ids.len());
    for item_id in &line_ids {
      let Some(item) = items.remove(item_id) else { continue };
      let Some(product) = products.get_mut(&item.product_id) else { continue };
      product.stock -= item.quantity;
      product.updated_at = Utc::now();
      let order = Order {
        id: Uuid::new_v4(),
        buyer_id: buyer.user_id,
        seller_id: product.seller_id,
        product_id: product.id,
        quantity: item.quantity,
        total_price: product.price * rust_decimal::Decimal::from(item.quantity),
        status: OrderStatus::Pending,
        created_at: Utc::now(),
      };
      orders.insert(order.id, order.clone());
      placed.push(order);
    }
    Ok(placed)
  }

  async fn set_status(&self, session: Option<&Session>, order_id: Uuid, next: OrderStatus) -> Result<Order> {
    let seller = session::require(session)?;
    let mut orders = self.orders.write();
    let order = orders
      .get_mut(&order_id)
      .filter(|order| order.seller_id == seller.user_id)
      .ok_or_else(|| MarketError::not_found("order"))?;
    if !order.status.can_transition_to(next) {
      return Err(MarketError::Validation(format!(
        "order cannot move from {:?} to {:?}",
        order.status, next
      )));
    }
    order.status = next;
    Ok(order.clone())
  }
}

#[async_trait]
impl SellerReporting for MemStore {
  async fn dashboard(&self, session: Option<&Session>, filter: &SalesFilter) -> Result<SellerDashboard> {
    let seller = session::require(session)?;

    let products = self.products.read();
    let active_products = products
      .values()
      .filter(|p| p.seller_id == seller.user_id && p.is_active)
      .count() as i64;

    let orders = self.orders.read();
    let mine: Vec<&Order> = orders.values().filter(|o| o.seller_id == seller.user_id).collect();
    let (total_sales, pending_orders) =
      seller::summarize_sales(mine.iter().map(|o| (o.total_price, o.status)), filter);

    let profiles = self.profiles.read();
    let mut recent: Vec<&Order> = mine.clone();
    recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    let recent_orders = recent
      .into_iter()
      .take(RECENT_ORDERS_PAGE_SIZE)
      .map(|order| RecentOrder {
        order_id: order.id,
        product_title: products
          .get(&order.product_id)
          .map(|p| p.title.clone())
          .unwrap_or_default(),
        buyer_name: profiles.get(&order.buyer_id).and_then(|p| p.full_name.clone()),
        quantity: order.quantity,
        total_price: order.total_price,
        status: order.status,
        created_at: order.created_at,
      })
      .collect();

    Ok(SellerDashboard {
      total_sales,
      active_products,
      pending_orders,
      recent_orders,
    })
  }
}
