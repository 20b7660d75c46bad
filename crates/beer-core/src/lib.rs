//! # beer-core: Pure Business Logic for Beer Orderer
//!
//! This crate contains the ordering and pricing rules as pure functions
//! with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Beer Orderer Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/cli (terminal UI)                       │   │
//! │  │    list ──► add/remove ──► cart ──► send                        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ ViewSnapshot                           │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    beer-client                                  │   │
//! │  │    CatalogViewState, HTTP services, orders.json, config        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ beer-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────┐         │   │
//! │  │   │  money   │ │ currency │ │ catalog  │ │  order   │         │   │
//! │  │   │  Money   │ │ RateTable│ │ filter   │ │OrderStore│         │   │
//! │  │   │          │ │ pricing  │ │ sort     │ │ observers│         │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────┘         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - `BeerItem` and `Rating` with their tolerant wire decoding
//! - [`money`] - Money type with integer arithmetic
//! - [`currency`] - Supported currencies and exchange rate tables
//! - [`pricing`] - Currency conversion and display formatting
//! - [`catalog`] - Style filters and sort orders
//! - [`order`] - The order list and its observers
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use beer_core::{BeerItem, Currency, Money, OrderStore, PricingEngine, RateTable};
//!
//! let mut order = OrderStore::new();
//! let ipa = BeerItem::new(1, "IPA Gold", Money::parse_price("$5.00").unwrap());
//! order.add(ipa.clone());
//! order.add(ipa);
//!
//! let engine = PricingEngine::new(RateTable::new(Currency::Usd));
//! let live = RateTable::from_rates(Currency::Usd, [("EUR", 0.9)]).unwrap();
//! assert_eq!(engine.display(order.total_price(), Currency::Eur, Some(&live)), "9.00€");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod currency;
pub mod error;
pub mod money;
pub mod order;
pub mod pricing;
pub mod types;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use catalog::{apply_filter_and_sort, FilterOption, SortOption};
pub use currency::{Currency, RateTable};
pub use error::{CoreError, CoreResult};
pub use money::Money;
pub use order::{OrderEvent, OrderEventKind, OrderStore, SubscriptionId};
pub use pricing::PricingEngine;
pub use types::{BeerItem, Rating};
