//! # Currencies and Rate Tables
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Currency Model                                       │
//! │                                                                         │
//! │  Currency (closed set)          RateTable (relative to USD)             │
//! │  ─────────────────────          ───────────────────────────             │
//! │  USD  "$"   prefix              { "USD": 1.0,                           │
//! │  EUR  "€"   suffix                "EUR": 0.92,                          │
//! │  CZK  "Kč"  suffix (spaced)       "CZK": 23.5, ... }                    │
//! │                                                                         │
//! │  Catalog prices are always USD. Conversion happens only for display.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};

// =============================================================================
// Currency
// =============================================================================

/// A currency prices can be displayed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// US dollar, the currency catalog prices are quoted in.
    #[default]
    Usd,
    /// Euro.
    Eur,
    /// Czech koruna.
    Czk,
}

impl Currency {
    /// The currency catalog prices and rate tables are expressed in.
    pub const BASE: Currency = Currency::Usd;

    /// Every supported currency, in display order.
    pub const ALL: [Currency; 3] = [Currency::Usd, Currency::Eur, Currency::Czk];

    /// ISO 4217 code.
    pub const fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Czk => "CZK",
        }
    }

    /// Display symbol.
    pub const fn symbol(&self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Eur => "€",
            Currency::Czk => "Kč",
        }
    }

    /// Parses a stored preference value, falling back to the base
    /// currency for anything unrecognized.
    pub fn from_code_or_base(code: &str) -> Currency {
        code.parse().unwrap_or(Currency::BASE)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "USD" => Ok(Currency::Usd),
            "EUR" => Ok(Currency::Eur),
            "CZK" => Ok(Currency::Czk),
            _ => Err(CoreError::UnknownCurrency(s.to_string())),
        }
    }
}

// =============================================================================
// Rate Table
// =============================================================================

/// Conversion factors from a base currency to other currency codes.
///
/// ## Invariants
/// - Every stored factor is finite and strictly positive
/// - Codes are stored upper-case
///
/// Codes are kept as strings rather than [`Currency`] because the rate
/// endpoint returns ~160 currencies; only the supported ones are ever
/// looked up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    base: Currency,
    rates: HashMap<String, f64>,
    /// When the rates were fetched; `None` for configured fallbacks.
    fetched_at: Option<DateTime<Utc>>,
}

impl RateTable {
    /// Creates an empty table for `base`.
    pub fn new(base: Currency) -> Self {
        RateTable {
            base,
            rates: HashMap::new(),
            fetched_at: None,
        }
    }

    /// Builds a table from `(code, factor)` pairs, rejecting invalid factors.
    pub fn from_rates<I, S>(base: Currency, rates: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut table = RateTable::new(base);
        for (code, factor) in rates {
            table.insert(code, factor)?;
        }
        Ok(table)
    }

    /// Builds a table from a remote payload, silently dropping entries
    /// with unusable factors.
    pub fn from_remote(
        base: Currency,
        rates: HashMap<String, f64>,
        fetched_at: DateTime<Utc>,
    ) -> Self {
        let mut table = RateTable::new(base);
        for (code, factor) in rates {
            let _ = table.insert(code, factor);
        }
        table.fetched_at = Some(fetched_at);
        table
    }

    /// Inserts or replaces a factor.
    pub fn insert(&mut self, code: impl Into<String>, factor: f64) -> CoreResult<()> {
        let code = code.into().to_uppercase();
        if !factor.is_finite() || factor <= 0.0 {
            return Err(CoreError::InvalidRate { code, factor });
        }
        self.rates.insert(code, factor);
        Ok(())
    }

    /// Looks up the factor for a currency.
    pub fn factor(&self, currency: Currency) -> Option<f64> {
        self.rates.get(currency.code()).copied()
    }

    pub fn base(&self) -> Currency {
        self.base
    }

    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_parsing() {
        assert_eq!("usd".parse::<Currency>().unwrap(), Currency::Usd);
        assert_eq!(" EUR ".parse::<Currency>().unwrap(), Currency::Eur);
        assert_eq!("Czk".parse::<Currency>().unwrap(), Currency::Czk);
        assert!("GBP".parse::<Currency>().is_err());
        assert_eq!(Currency::from_code_or_base("GBP"), Currency::Usd);
    }

    #[test]
    fn test_currency_codes_and_symbols() {
        for currency in Currency::ALL {
            assert_eq!(currency.code().parse::<Currency>().unwrap(), currency);
        }
        assert_eq!(Currency::Czk.symbol(), "Kč");
        assert_eq!(Currency::Eur.to_string(), "EUR");
    }

    #[test]
    fn test_currency_serde_uses_codes() {
        assert_eq!(serde_json::to_string(&Currency::Czk).unwrap(), "\"CZK\"");
        let eur: Currency = serde_json::from_str("\"EUR\"").unwrap();
        assert_eq!(eur, Currency::Eur);
    }

    #[test]
    fn test_rate_table_rejects_bad_factors() {
        let mut table = RateTable::new(Currency::Usd);
        assert!(table.insert("EUR", 0.0).is_err());
        assert!(table.insert("EUR", f64::NAN).is_err());
        assert!(table.insert("EUR", f64::INFINITY).is_err());
        assert!(table.insert("eur", 0.9).is_ok());
        assert_eq!(table.factor(Currency::Eur), Some(0.9));
        assert_eq!(table.factor(Currency::Czk), None);
    }

    #[test]
    fn test_rate_table_from_remote_drops_invalid() {
        let mut raw = HashMap::new();
        raw.insert("EUR".to_string(), 0.91);
        raw.insert("XXX".to_string(), -3.0);
        let table = RateTable::from_remote(Currency::Usd, raw, Utc::now());
        assert_eq!(table.len(), 1);
        assert!(table.fetched_at().is_some());
    }
}
