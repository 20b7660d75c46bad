//! # beer-client: I/O Side of Beer Orderer
//!
//! Everything that touches the network or the disk, plus the view state
//! that ties it all to `beer-core`.
//!
//! ## Component Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          beer-client                                    │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     CatalogViewState                            │   │
//! │  │   filter/sort/currency ─► ViewSnapshot (watch channel)          │   │
//! │  └───────┬──────────────────────┬──────────────────────┬──────────┘   │
//! │          │                      │                      │               │
//! │  ┌───────▼────────┐   ┌────────▼─────────┐   ┌────────▼──────────┐    │
//! │  │   services     │   │   persistence    │   │     settings      │    │
//! │  │                │   │                  │   │                   │    │
//! │  │ catalog (GET)  │   │ orders.json      │   │ settings.toml     │    │
//! │  │ rates   (GET)  │   │ worker task      │   │ dark mode, currency│   │
//! │  └────────────────┘   └──────────────────┘   └───────────────────┘    │
//! │                                                                         │
//! │  config: config.toml + BEER_* environment overrides                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`config`] - Layered application configuration
//! - [`error`] - Client error types
//! - [`persistence`] - Order list file and its background writer
//! - [`services`] - HTTP catalog and exchange-rate sources
//! - [`settings`] - User preferences with change notification
//! - [`view_state`] - The orchestrating view state

pub mod config;
pub mod error;
pub mod persistence;
pub mod services;
pub mod settings;
pub mod view_state;

pub use config::AppConfig;
pub use error::{ClientError, ClientResult};
pub use persistence::{JsonFileOrderStore, OrderPersistence, PersistenceHandle, PersistenceWorker};
pub use services::{CatalogSource, HttpCatalogService, HttpRateService, RateSource};
pub use settings::{Settings, SettingsStore};
pub use view_state::{CatalogViewState, ViewSnapshot};
