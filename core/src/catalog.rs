// core/src/catalog.rs

//! Catalog queries composed from search/filter facets, plus the seller-side
//! listing management. A facet set always resolves to a single query: the
//! conjunction of every active facet over active products, newest first.

use crate::error::{MarketError, Result};
use crate::models::{Category, Condition, Product, Profile};
use crate::session::Session;
use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

/// Upper bound of the default price range.
pub const PRICE_CEILING: Decimal = dec!(10000000);

/// Fixed page size of the home/featured view. The search view is unbounded.
pub const FEATURED_PAGE_SIZE: i64 = 12;

/// One filter dimension: either inactive ("all") or pinned to a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facet<T> {
  #[default]
  All,
  Only(T),
}

/// Conjunctive facet set for a catalog query. `is_active = true` is implicit
/// and cannot be switched off from the storefront.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductFacets {
  /// Free text matched as one case-insensitive substring against title and
  /// description. Multiple words stay one needle; they are not tokenized
  /// into OR terms. `None` (or blank input) is a no-op facet.
  pub text: Option<String>,
  pub category: Facet<Uuid>,
  pub condition: Facet<Condition>,
  pub price_min: Decimal,
  pub price_max: Decimal,
}

impl Default for ProductFacets {
  fn default() -> Self {
    Self {
      text: None,
      category: Facet::All,
      condition: Facet::All,
      price_min: dec!(0),
      price_max: PRICE_CEILING,
    }
  }
}

impl ProductFacets {
  /// Sets the free-text facet; blank input deactivates it.
  pub fn with_text(mut self, text: impl Into<String>) -> Self {
    let text = text.into();
    self.text = if text.trim().is_empty() { None } else { Some(text) };
    self
  }

  pub fn in_category(mut self, category_id: Uuid) -> Self {
    self.category = Facet::Only(category_id);
    self
  }

  pub fn with_condition(mut self, condition: Condition) -> Self {
    self.condition = Facet::Only(condition);
    self
  }

  pub fn priced_between(mut self, min: Decimal, max: Decimal) -> Self {
    self.price_min = min;
    self.price_max = max;
    self
  }

  /// Appends the WHERE clause for this facet set. The caller supplies the
  /// SELECT head and any ordering/limit tail.
  pub fn push_filters(&self, qb: &mut QueryBuilder<'_, Postgres>) {
    qb.push(" WHERE is_active = TRUE AND price >= ");
    qb.push_bind(self.price_min);
    qb.push(" AND price <= ");
    qb.push_bind(self.price_max);

    if let Some(text) = &self.text {
      let pattern = format!("%{}%", text);
      qb.push(" AND (title ILIKE ");
      qb.push_bind(pattern.clone());
      qb.push(" OR description ILIKE ");
      qb.push_bind(pattern);
      qb.push(")");
    }
    if let Facet::Only(category_id) = self.category {
      qb.push(" AND category_id = ");
      qb.push_bind(category_id);
    }
    if let Facet::Only(condition) = self.condition {
      qb.push(" AND condition = ");
      qb.push_bind(condition);
    }
  }

  /// In-memory counterpart of `push_filters`, applied by the embedded store
  /// so both backends answer a facet set identically.
  pub fn matches(&self, product: &Product) -> bool {
    if !product.is_active {
      return false;
    }
    if product.price < self.price_min || product.price > self.price_max {
      return false;
    }
    if let Facet::Only(category_id) = self.category {
      if product.category_id != Some(category_id) {
        return false;
      }
    }
    if let Facet::Only(condition) = self.condition {
      if product.condition != condition {
        return false;
      }
    }
    if let Some(text) = &self.text {
      let needle = text.to_lowercase();
      let title_hit = product.title.to_lowercase().contains(&needle);
      let description_hit = product
        .description
        .as_deref()
        .map(|d| d.to_lowercase().contains(&needle))
        .unwrap_or(false);
      if !title_hit && !description_hit {
        return false;
      }
    }
    true
  }
}

/// Input for creating or editing a listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductDraft {
  pub title: String,
  pub description: Option<String>,
  pub price: Decimal,
  pub stock: i32,
  pub images: Vec<String>,
  pub condition: Condition,
  pub category_id: Option<Uuid>,
}

impl ProductDraft {
  pub fn validate(&self) -> Result<()> {
    if self.title.trim().is_empty() {
      return Err(MarketError::Validation("title must not be empty".into()));
    }
    if self.price < dec!(0) {
      return Err(MarketError::Validation(format!("price must not be negative, got {}", self.price)));
    }
    if self.stock < 0 {
      return Err(MarketError::Validation(format!("stock must not be negative, got {}", self.stock)));
    }
    Ok(())
  }
}

/// Read side of the catalog plus seller listing management.
///
/// A failed query surfaces as an error to the caller; it never degrades into
/// an empty-but-ok result that would show stale data.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
  /// All active products matching the facet set, newest first, unbounded.
  async fn search(&self, facets: &ProductFacets) -> Result<Vec<Product>>;

  /// The home view: newest active products, capped at [`FEATURED_PAGE_SIZE`].
  async fn featured(&self) -> Result<Vec<Product>>;

  async fn product(&self, product_id: Uuid) -> Result<Product>;

  /// Lookup collections, sorted by name.
  async fn categories(&self) -> Result<Vec<Category>>;

  async fn profile(&self, profile_id: Uuid) -> Result<Profile>;

  /// Every listing owned by the session holder, including inactive ones.
  async fn seller_products(&self, session: Option<&Session>) -> Result<Vec<Product>>;

  async fn create_product(&self, session: Option<&Session>, draft: ProductDraft) -> Result<Product>;

  /// Edits a listing. Scoped to the owning seller; someone else's product id
  /// answers `NotFound`.
  async fn update_product(&self, session: Option<&Session>, product_id: Uuid, draft: ProductDraft) -> Result<Product>;

  /// Soft-deactivation: flips `is_active` off, keeping the row for existing
  /// orders and carts.
  async fn deactivate_product(&self, session: Option<&Session>, product_id: Uuid) -> Result<Product>;
}
