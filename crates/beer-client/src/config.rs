//! # Application Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     BEER_CATALOG_URL=https://...                                       │
//! │     BEER_RATES_URL=https://.../latest/{base}                           │
//! │     BEER_DATA_DIR=/tmp/beer                                            │
//! │     BEER_HTTP_TIMEOUT_SECS=10                                          │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/beer-orderer/config.toml (Linux)                         │
//! │     ~/Library/Application Support/com.beerorderer.beer-orderer/        │
//! │                                                   config.toml (macOS)  │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [api]
//! catalog_url = "https://api.sampleapis.com/beers/ale"
//! rates_url = "https://v6.exchangerate-api.com/v6/latest/{base}"
//! timeout_secs = 15
//!
//! [storage]
//! data_dir = "/home/me/.local/share/beer-orderer"
//! orders_file = "orders.json"
//!
//! [rates.fallback]
//! USD = 1.0
//! EUR = 0.92
//! CZK = 23.5
//! ```

use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use beer_core::{Currency, RateTable};

use crate::error::{ClientError, ClientResult};

/// Placeholder substituted with the base currency code in `rates_url`.
pub const BASE_PLACEHOLDER: &str = "{base}";

// =============================================================================
// API Settings
// =============================================================================

/// Remote endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiSettings {
    /// GET endpoint returning a JSON array of beers.
    #[serde(default = "default_catalog_url")]
    pub catalog_url: String,

    /// GET endpoint template for exchange rates; must contain `{base}`.
    #[serde(default = "default_rates_url")]
    pub rates_url: String,

    /// Per-request timeout. `None` keeps the HTTP client default.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_catalog_url() -> String {
    "https://api.sampleapis.com/beers/ale".to_string()
}

fn default_rates_url() -> String {
    "https://v6.exchangerate-api.com/v6/latest/{base}".to_string()
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            catalog_url: default_catalog_url(),
            rates_url: default_rates_url(),
            timeout_secs: None,
        }
    }
}

impl ApiSettings {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

// =============================================================================
// Storage Settings
// =============================================================================

/// Where the order list is persisted.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// Directory for `orders_file`. Defaults to the platform data dir.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    #[serde(default = "default_orders_file")]
    pub orders_file: String,
}

fn default_orders_file() -> String {
    "orders.json".to_string()
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings {
            data_dir: None,
            orders_file: default_orders_file(),
        }
    }
}

// =============================================================================
// Rate Settings
// =============================================================================

/// Exchange rates used when the live rate fetch fails or lacks a currency.
#[derive(Debug, Clone, Deserialize)]
pub struct RateSettings {
    /// Factors relative to USD, keyed by currency code. Entries from the
    /// config file override the built-in ones; codes it leaves out keep
    /// their built-in factor.
    #[serde(
        default = "default_fallback_rates",
        deserialize_with = "fallback_over_defaults"
    )]
    pub fallback: BTreeMap<String, f64>,
}

fn default_fallback_rates() -> BTreeMap<String, f64> {
    BTreeMap::from([
        ("USD".to_string(), 1.0),
        ("EUR".to_string(), 0.92),
        ("CZK".to_string(), 23.5),
    ])
}

fn fallback_over_defaults<'de, D>(deserializer: D) -> Result<BTreeMap<String, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let configured = BTreeMap::<String, f64>::deserialize(deserializer)?;
    let mut merged = default_fallback_rates();
    merged.extend(
        configured
            .into_iter()
            .map(|(code, factor)| (code.trim().to_uppercase(), factor)),
    );
    Ok(merged)
}

impl Default for RateSettings {
    fn default() -> Self {
        RateSettings {
            fallback: default_fallback_rates(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub rates: RateSettings,
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (config.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ClientResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ClientResult<()> {
        validate_http_url(&self.api.catalog_url)?;

        if !self.api.rates_url.contains(BASE_PLACEHOLDER) {
            return Err(ClientError::InvalidConfig(format!(
                "rates_url must contain {}, got: {}",
                BASE_PLACEHOLDER, self.api.rates_url
            )));
        }
        validate_http_url(&self.rates_url_for(Currency::BASE))?;

        if self.api.timeout_secs == Some(0) {
            return Err(ClientError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        if self.storage.orders_file.trim().is_empty() {
            return Err(ClientError::InvalidConfig("orders_file must not be empty".into()));
        }

        self.fallback_rates()?;
        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("BEER_CATALOG_URL") {
            debug!(url = %url, "Overriding catalog URL from environment");
            self.api.catalog_url = url;
        }

        if let Some(url) = lookup("BEER_RATES_URL") {
            debug!(url = %url, "Overriding rates URL from environment");
            self.api.rates_url = url;
        }

        if let Some(dir) = lookup("BEER_DATA_DIR") {
            self.storage.data_dir = Some(PathBuf::from(dir));
        }

        if let Some(secs) = lookup("BEER_HTTP_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(s) => self.api.timeout_secs = Some(s),
                Err(_) => warn!(value = %secs, "Ignoring non-numeric BEER_HTTP_TIMEOUT_SECS"),
            }
        }
    }

    fn project_dirs() -> Option<directories::ProjectDirs> {
        directories::ProjectDirs::from("com", "beerorderer", "beer-orderer")
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Returns the default settings file path.
    pub fn default_settings_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("settings.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Directory holding the order file.
    pub fn data_dir(&self) -> PathBuf {
        self.storage
            .data_dir
            .clone()
            .or_else(|| Self::project_dirs().map(|dirs| dirs.data_dir().to_path_buf()))
            .unwrap_or_else(|| Path::new(".").to_path_buf())
    }

    /// Full path of the persisted order list.
    pub fn orders_path(&self) -> PathBuf {
        self.data_dir().join(&self.storage.orders_file)
    }

    /// The rates endpoint with `{base}` substituted.
    pub fn rates_url_for(&self, base: Currency) -> String {
        self.api.rates_url.replace(BASE_PLACEHOLDER, base.code())
    }

    /// The configured fallback rates as a table relative to USD.
    pub fn fallback_rates(&self) -> ClientResult<RateTable> {
        let pairs = self.rates.fallback.iter().map(|(code, f)| (code.clone(), *f));
        Ok(RateTable::from_rates(Currency::BASE, pairs)?)
    }
}

fn validate_http_url(raw: &str) -> ClientResult<()> {
    let url = Url::parse(raw)?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ClientError::InvalidUrl(format!(
            "URL must use http or https, got {}: {}",
            other, raw
        ))),
    }
}
