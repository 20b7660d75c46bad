//! # User Settings
//!
//! The two user preferences: dark mode and display currency.
//!
//! ## Change Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  settings screen ──► SettingsStore::update() ──► settings.toml          │
//! │                               │                                         │
//! │                               └──► watch channel ──► CatalogViewState   │
//! │                                                      .apply_settings()  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Reading never fails: a missing or unreadable file yields defaults and
//! an unknown currency code reads back as USD.

use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::watch;
use tracing::{debug, warn};

use beer_core::Currency;

use crate::error::ClientResult;

/// Persisted user preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub dark_mode: bool,

    #[serde(default, deserialize_with = "currency_or_base")]
    pub currency: Currency,
}

fn currency_or_base<'de, D>(deserializer: D) -> Result<Currency, D::Error>
where
    D: Deserializer<'de>,
{
    let code = String::deserialize(deserializer)?;
    Ok(Currency::from_code_or_base(&code))
}

/// File-backed settings with change notification.
#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    tx: watch::Sender<Settings>,
}

impl SettingsStore {
    /// Opens the store at `path`, reading current values.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let current = read_settings(&path);
        let (tx, _) = watch::channel(current);
        SettingsStore { path, tx }
    }

    /// Current values.
    pub fn current(&self) -> Settings {
        *self.tx.borrow()
    }

    /// A receiver that observes every committed change.
    pub fn subscribe(&self) -> watch::Receiver<Settings> {
        self.tx.subscribe()
    }

    /// Applies `change`, persists the result and notifies subscribers.
    ///
    /// Subscribers are only notified when a value actually changed. The
    /// new values are kept in memory even if writing the file fails.
    pub fn update(&self, change: impl FnOnce(&mut Settings)) -> ClientResult<Settings> {
        let mut next = self.current();
        change(&mut next);

        let changed = self.tx.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            *current = next;
            true
        });

        if changed {
            debug!(?next, "Settings changed");
            write_settings(&self.path, &next)?;
        }
        Ok(next)
    }

    pub fn set_currency(&self, currency: Currency) -> ClientResult<Settings> {
        self.update(|s| s.currency = currency)
    }

    pub fn set_dark_mode(&self, dark_mode: bool) -> ClientResult<Settings> {
        self.update(|s| s.dark_mode = dark_mode)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn read_settings(path: &Path) -> Settings {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Settings::default(),
        Err(e) => {
            warn!(?path, error = %e, "Failed to read settings, using defaults");
            return Settings::default();
        }
    };

    toml::from_str(&contents).unwrap_or_else(|e| {
        warn!(?path, error = %e, "Settings file is not valid TOML, using defaults");
        Settings::default()
    })
}

fn write_settings(path: &Path, settings: &Settings) -> ClientResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, toml::to_string_pretty(settings)?)?;
    Ok(())
}
