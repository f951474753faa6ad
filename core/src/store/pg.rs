// core/src/store/pg.rs

//! Postgres backend. Runtime queries via `sqlx::query_as`; the catalog
//! WHERE clause comes from `ProductFacets::push_filters`, and every stock
//! bound is part of the mutating statement itself (conditional
//! INSERT/UPDATE), so a stale read can never slip an oversized quantity
//! through.

use crate::cart::CartRepository;
use crate::catalog::{CatalogRepository, ProductDraft, ProductFacets, FEATURED_PAGE_SIZE};
use crate::checkout::OrderRepository;
use crate::error::{MarketError, Result};
use crate::models::{CartItem, CartLine, Category, Order, OrderStatus, Product, Profile, RecentOrder};
use crate::seller::{self, SalesFilter, SellerDashboard, SellerReporting, RECENT_ORDERS_PAGE_SIZE};
use crate::session::{self, Session};
use crate::stock;
use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{PgPool, QueryBuilder};
use tracing::instrument;
use uuid::Uuid;

const PRODUCT_COLUMNS: &str =
  "id, seller_id, category_id, title, description, price, stock, images, condition, is_active, created_at, updated_at";

const ORDER_COLUMNS: &str = "id, buyer_id, seller_id, product_id, quantity, total_price, status, created_at";

const CART_LINES_SQL: &str = "SELECT ci.id AS item_id, ci.product_id, ci.quantity, p.title, p.price, p.images, p.stock \
   FROM cart_items ci JOIN products p ON p.id = ci.product_id \
   WHERE ci.buyer_id = $1 ORDER BY ci.added_at DESC";

/// Rows needed to turn a cart into orders.
#[derive(sqlx::FromRow)]
struct PlacementLine {
  product_id: Uuid,
  seller_id: Uuid,
  quantity: i32,
  price: Decimal,
}

#[derive(Clone)]
pub struct PgStore {
  pool: PgPool,
}

impl PgStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  /// A conditional add came back empty; work out which rule refused it.
  async fn explain_rejected_add(&self, product_id: Uuid, requested: i32) -> MarketError {
    let row: std::result::Result<Option<(i32, bool)>, sqlx::Error> =
      sqlx::query_as("SELECT stock, is_active FROM products WHERE id = $1")
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await;
    match row {
      Ok(Some((available, true))) => MarketError::StockExceeded { requested, available },
      Ok(Some((_, false))) | Ok(None) => MarketError::not_found("product"),
      Err(err) => MarketError::from(err),
    }
  }

  async fn explain_rejected_set(&self, buyer_id: Uuid, item_id: Uuid, requested: i32) -> MarketError {
    let row: std::result::Result<Option<(i32,)>, sqlx::Error> = sqlx::query_as(
      "SELECT p.stock FROM cart_items ci JOIN products p ON p.id = ci.product_id \
       WHERE ci.id = $1 AND ci.buyer_id = $2",
    )
    .bind(item_id)
    .bind(buyer_id)
    .fetch_optional(&self.pool)
    .await;
    match row {
      Ok(Some((available,))) => MarketError::StockExceeded { requested, available },
      Ok(None) => MarketError::not_found("cart item"),
      Err(err) => MarketError::from(err),
    }
  }
}

#[async_trait]
impl CatalogRepository for PgStore {
  #[instrument(name = "pg::search", skip(self, facets))]
  async fn search(&self, facets: &ProductFacets) -> Result<Vec<Product>> {
    let mut qb = QueryBuilder::new(format!("SELECT {} FROM products", PRODUCT_COLUMNS));
    facets.push_filters(&mut qb);
    qb.push(" ORDER BY created_at DESC");
    let products = qb.build_query_as::<Product>().fetch_all(&self.pool).await?;
    Ok(products)
  }

  #[instrument(name = "pg::featured", skip(self))]
  async fn featured(&self) -> Result<Vec<Product>> {
    let products = sqlx::query_as::<_, Product>(&format!(
      "SELECT {} FROM products WHERE is_active = TRUE ORDER BY created_at DESC LIMIT $1",
      PRODUCT_COLUMNS
    ))
    .bind(FEATURED_PAGE_SIZE)
    .fetch_all(&self.pool)
    .await?;
    Ok(products)
  }

  async fn product(&self, product_id: Uuid) -> Result<Product> {
    sqlx::query_as::<_, Product>(&format!("SELECT {} FROM products WHERE id = $1", PRODUCT_COLUMNS))
      .bind(product_id)
      .fetch_optional(&self.pool)
      .await?
      .ok_or_else(|| MarketError::not_found("product"))
  }

  async fn categories(&self) -> Result<Vec<Category>> {
    let categories = sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY name")
      .fetch_all(&self.pool)
      .await?;
    Ok(categories)
  }

  async fn profile(&self, profile_id: Uuid) -> Result<Profile> {
    sqlx::query_as::<_, Profile>("SELECT id, full_name FROM profiles WHERE id = $1")
      .bind(profile_id)
      .fetch_optional(&self.pool)
      .await?
      .ok_or_else(|| MarketError::not_found("profile"))
  }

  async fn seller_products(&self, session: Option<&Session>) -> Result<Vec<Product>> {
    let seller = session::require(session)?;
    let products = sqlx::query_as::<_, Product>(&format!(
      "SELECT {} FROM products WHERE seller_id = $1 ORDER BY created_at DESC",
      PRODUCT_COLUMNS
    ))
    .bind(seller.user_id)
    .fetch_all(&self.pool)
    .await?;
    Ok(products)
  }

  #[instrument(name = "pg::create_product", skip(self, session, draft))]
  async fn create_product(&self, session: Option<&Session>, draft: ProductDraft) -> Result<Product> {
    let seller = session::require(session)?;
    draft.validate()?;
    let product = sqlx::query_as::<_, Product>(&format!(
      "INSERT INTO products (id, seller_id, category_id, title, description, price, stock, images, condition, is_active, created_at, updated_at) \
       VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, TRUE, NOW(), NOW()) RETURNING {}",
      PRODUCT_COLUMNS
    ))
    .bind(Uuid::new_v4())
    .bind(seller.user_id)
    .bind(draft.category_id)
    .bind(&draft.title)
    .bind(&draft.description)
    .bind(draft.price)
    .bind(draft.stock)
    .bind(&draft.images)
    .bind(draft.condition)
    .fetch_one(&self.pool)
    .await?;
    Ok(product)
  }

  #[instrument(name = "pg::update_product", skip(self, session, draft), fields(product_id = %product_id))]
  async fn update_product(&self, session: Option<&Session>, product_id: Uuid, draft: ProductDraft) -> Result<Product> {
    let seller = session::require(session)?;
    draft.validate()?;
    sqlx::query_as::<_, Product>(&format!(
      "UPDATE products SET category_id = $3, title = $4, description = $5, price = $6, stock = $7, images = $8, condition = $9, updated_at = NOW() \
       WHERE id = $1 AND seller_id = $2 RETURNING {}",
      PRODUCT_COLUMNS
    ))
    .bind(product_id)
    .bind(seller.user_id)
    .bind(draft.category_id)
    .bind(&draft.title)
    .bind(&draft.description)
    .bind(draft.price)
    .bind(draft.stock)
    .bind(&draft.images)
    .bind(draft.condition)
    .fetch_optional(&self.pool)
    .await?
    .ok_or_else(|| MarketError::not_found("product"))
  }

  #[instrument(name = "pg::deactivate_product", skip(self, session), fields(product_id = %product_id))]
  async fn deactivate_product(&self, session: Option<&Session>, product_id: Uuid) -> Result<Product> {
    let seller = session::require(session)?;
    sqlx::query_as::<_, Product>(&format!(
      "UPDATE products SET is_active = FALSE, updated_at = NOW() WHERE id = $1 AND seller_id = $2 RETURNING {}",
      PRODUCT_COLUMNS
    ))
    .bind(product_id)
    .bind(seller.user_id)
    .fetch_optional(&self.pool)
    .await?
    .ok_or_else(|| MarketError::not_found("product"))
  }
}

#[async_trait]
impl CartRepository for PgStore {
  #[instrument(name = "pg::add_or_merge", skip(self, session), fields(product_id = %product_id))]
  async fn add_or_merge(&self, session: Option<&Session>, product_id: Uuid, quantity: i32) -> Result<CartItem> {
    let buyer = session::require(session)?;
    stock::validate_requested(quantity)?;

    // The stock bound is part of the statement: the row only materializes
    // while `stock >= quantity` holds at write time.
    let upserted = sqlx::query_as::<_, CartItem>(
      "INSERT INTO cart_items (id, buyer_id, product_id, quantity, added_at) \
       SELECT $1, $2, p.id, $4, NOW() FROM products p \
       WHERE p.id = $3 AND p.is_active = TRUE AND p.stock >= $4 \
       ON CONFLICT (buyer_id, product_id) \
       DO UPDATE SET quantity = EXCLUDED.quantity, added_at = EXCLUDED.added_at \
       RETURNING id, buyer_id, product_id, quantity, added_at",
    )
    .bind(Uuid::new_v4())
    .bind(buyer.user_id)
    .bind(product_id)
    .bind(quantity)
    .fetch_optional(&self.pool)
    .await?;

    match upserted {
      Some(item) => Ok(item),
      None => Err(self.explain_rejected_add(product_id, quantity).await),
    }
  }

  #[instrument(name = "pg::set_quantity", skip(self, session), fields(item_id = %item_id))]
  async fn set_quantity(&self, session: Option<&Session>, item_id: Uuid, quantity: i32) -> Result<CartItem> {
    let buyer = session::require(session)?;
    stock::validate_requested(quantity)?;

    let updated = sqlx::query_as::<_, CartItem>(
      "UPDATE cart_items ci SET quantity = $3 FROM products p \
       WHERE ci.id = $1 AND ci.buyer_id = $2 AND p.id = ci.product_id AND p.stock >= $3 \
       RETURNING ci.id, ci.buyer_id, ci.product_id, ci.quantity, ci.added_at",
    )
    .bind(item_id)
    .bind(buyer.user_id)
    .bind(quantity)
    .fetch_optional(&self.pool)
    .await?;

    match updated {
      Some(item) => Ok(item),
      None => Err(self.explain_rejected_set(buyer.user_id, item_id, quantity).await),
    }
  }

  #[instrument(name = "pg::remove", skip(self, session), fields(item_id = %item_id))]
  async fn remove(&self, session: Option<&Session>, item_id: Uuid) -> Result<()> {
    let buyer = session::require(session)?;
    // Idempotent: zero rows affected is already-satisfied, not an error.
    sqlx::query("DELETE FROM cart_items WHERE id = $1 AND buyer_id = $2")
      .bind(item_id)
      .bind(buyer.user_id)
      .execute(&self.pool)
      .await?;
    Ok(())
  }

  async fn list(&self, session: Option<&Session>) -> Result<Vec<CartLine>> {
    let buyer = session::require(session)?;
    let lines = sqlx::query_as::<_, CartLine>(CART_LINES_SQL)
      .bind(buyer.user_id)
      .fetch_all(&self.pool)
      .await?;
    Ok(lines)
  }

  async fn count(&self, session: Option<&Session>) -> Result<i64> {
    let buyer = session::require(session)?;
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cart_items WHERE buyer_id = $1")
      .bind(buyer.user_id)
      .fetch_one(&self.pool)
      .await?;
    Ok(count)
  }
}

#[async_trait]
impl OrderRepository for PgStore {
  #[instrument(name = "pg::place_from_cart", skip(self, session))]
  async fn place_from_cart(&self, session: Option<&Session>) -> Result<Vec<Order>> {
    let buyer = session::require(session)?;
    let mut tx = self.pool.begin().await?;

    let lines: Vec<PlacementLine> = sqlx::query_as(
      "SELECT ci.product_id, p.seller_id, ci.quantity, p.price \
       FROM cart_items ci JOIN products p ON p.id = ci.product_id \
       WHERE ci.buyer_id = $1 ORDER BY ci.added_at",
    )
    .bind(buyer.user_id)
    .fetch_all(&mut *tx)
    .await?;

    let mut orders = Vec::with_capacity(lines.len());
    for line in &lines {
      // Decrement-if-sufficient; losing the race rolls the placement back.
      let claimed = sqlx::query("UPDATE products SET stock = stock - $2, updated_at = NOW() WHERE id = $1 AND stock >= $2")
        .bind(line.product_id)
        .bind(line.quantity)
        .execute(&mut *tx)
        .await?
        .rows_affected();
      if claimed == 0 {
        let available: Option<i32> = sqlx::query_scalar("SELECT stock FROM products WHERE id = $1")
          .bind(line.product_id)
          .fetch_optional(&mut *tx)
          .await?;
        tx.rollback().await?;
        return Err(match available {
          Some(available) => MarketError::StockExceeded {
            requested: line.quantity,
            available,
          },
          None => MarketError::not_found("product"),
        });
      }

      let order = sqlx::query_as::<_, Order>(&format!(
        "INSERT INTO orders (id, buyer_id, seller_id, product_id, quantity, total_price, status, created_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, NOW()) RETURNING {}",
        ORDER_COLUMNS
      ))
      .bind(Uuid::new_v4())
      .bind(buyer.user_id)
      .bind(line.seller_id)
      .bind(line.product_id)
      .bind(line.quantity)
      .bind(line.price * Decimal::from(line.quantity))
      .bind(OrderStatus::Pending)
      .fetch_one(&mut *tx)
      .await?;
      orders.push(order);
    }

    sqlx::query("DELETE FROM cart_items WHERE buyer_id = $1")
      .bind(buyer.user_id)
      .execute(&mut *tx)
      .await?;

    tx.commit().await?;
    Ok(orders)
  }

  #[instrument(name = "pg::set_status", skip(self, session), fields(order_id = %order_id))]
  async fn set_status(&self, session: Option<&Session>, order_id: Uuid, next: OrderStatus) -> Result<Order> {
    let seller = session::require(session)?;

    let order = sqlx::query_as::<_, Order>(&format!(
      "SELECT {} FROM orders WHERE id = $1 AND seller_id = $2",
      ORDER_COLUMNS
    ))
    .bind(order_id)
    .bind(seller.user_id)
    .fetch_optional(&self.pool)
    .await?
    .ok_or_else(|| MarketError::not_found("order"))?;

    if !order.status.can_transition_to(next) {
      return Err(MarketError::Validation(format!(
        "order cannot move from {:?} to {:?}",
        order.status, next
      )));
    }

    // Conditional on the status we just read; a concurrent transition wins
    // and this one reports the conflict instead of clobbering it.
    sqlx::query_as::<_, Order>(&format!(
      "UPDATE orders SET status = $3 WHERE id = $1 AND seller_id = $2 AND status = $4 RETURNING {}",
      ORDER_COLUMNS
    ))
    .bind(order_id)
    .bind(seller.user_id)
    .bind(next)
    .bind(order.status)
    .fetch_optional(&self.pool)
    .await?
    .ok_or_else(|| MarketError::ConstraintViolation("order status changed concurrently".into()))
  }
}

#[async_trait]
impl SellerReporting for PgStore {
  #[instrument(name = "pg::dashboard", skip(self, session, filter))]
  async fn dashboard(&self, session: Option<&Session>, filter: &SalesFilter) -> Result<SellerDashboard> {
    let seller = session::require(session)?;

    let active_products: i64 =
      sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE seller_id = $1 AND is_active = TRUE")
        .bind(seller.user_id)
        .fetch_one(&self.pool)
        .await?;

    let orders: Vec<(Decimal, OrderStatus)> = sqlx::query_as("SELECT total_price, status FROM orders WHERE seller_id = $1")
      .bind(seller.user_id)
      .fetch_all(&self.pool)
      .await?;
    let (total_sales, pending_orders) = seller::summarize_sales(orders, filter);

    let recent_orders = sqlx::query_as::<_, RecentOrder>(
      "SELECT o.id AS order_id, p.title AS product_title, pr.full_name AS buyer_name, \
              o.quantity, o.total_price, o.status, o.created_at \
       FROM orders o \
       JOIN products p ON p.id = o.product_id \
       LEFT JOIN profiles pr ON pr.id = o.buyer_id \
       WHERE o.seller_id = $1 ORDER BY o.created_at DESC LIMIT $2",
    )
    .bind(seller.user_id)
    .bind(RECENT_ORDERS_PAGE_SIZE as i64)
    .fetch_all(&self.pool)
    .await?;

    Ok(SellerDashboard {
      total_sales,
      active_products,
      pending_orders,
      recent_orders,
    })
  }
}
