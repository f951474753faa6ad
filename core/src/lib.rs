// core/src/lib.rs

//! Feria core: the cart & catalog consistency subsystem of a marketplace
//! storefront.
//!
//! This crate owns the rules with real invariants:
//!  - Faceted catalog queries (free text, category, condition, price range)
//!    composed conjunctively over active products, newest first.
//!  - Cart line items uniquely keyed by (buyer, product), merged via upsert
//!    with last-write-wins quantities.
//!  - Stock-bounded quantities, re-checked inside the mutating statement so
//!    a stale read cannot oversell.
//!  - Exact-decimal pricing with a fixed 19% tax.
//!  - Checkout snapshots (immutable order totals) and seller dashboard
//!    aggregation.
//!
//! Everything else (page rendering, auth protocol, payments, image storage)
//! is an external collaborator. Presentation code consumes the repository
//! traits; `store::PgStore` backs them with Postgres and `store::MemStore`
//! runs the same semantics in memory.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod models;
pub mod notify;
pub mod pricing;
pub mod seller;
pub mod session;
pub mod stock;
pub mod store;
pub mod storefront;

// --- Re-exports for the Public API ---

pub use crate::cart::{CartRepository, DEFAULT_ADD_QUANTITY};
pub use crate::catalog::{CatalogRepository, Facet, ProductDraft, ProductFacets, FEATURED_PAGE_SIZE, PRICE_CEILING};
pub use crate::checkout::OrderRepository;
pub use crate::config::StoreConfig;
pub use crate::error::{MarketError, Result};
pub use crate::models::{CartItem, CartLine, Category, Condition, Order, OrderStatus, Product, Profile, RecentOrder};
pub use crate::notify::{LogSink, NotificationSink};
pub use crate::pricing::{cart_totals, compute_totals, Totals, TAX_RATE};
pub use crate::seller::{SalesFilter, SellerDashboard, SellerReporting, RECENT_ORDERS_PAGE_SIZE};
pub use crate::session::{Session, SessionProvider, SessionWatch};
pub use crate::store::{MemStore, PgStore};
pub use crate::storefront::{Outcome, Storefront};
