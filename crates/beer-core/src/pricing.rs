//! # Pricing Engine
//!
//! Converts base-currency amounts for display and formats them with the
//! right symbol placement.
//!
//! ## Rate Resolution
//! ```text
//! convert(amount, target, live)
//!      │
//!      ├── target == base ──────────────────────► amount (unchanged)
//!      │
//!      ├── live table has target ───────────────► amount × live factor
//!      │
//!      ├── fallback table has target ───────────► amount × fallback factor
//!      │
//!      └── neither ─────────────────────────────► amount × 1.0
//! ```
//!
//! The fallback table is injected by the caller (it comes from
//! configuration), so no real-world exchange rate is hardcoded here.

use crate::currency::{Currency, RateTable};
use crate::money::Money;

/// Stateless conversion/formatting over an injected fallback rate table.
#[derive(Debug, Clone)]
pub struct PricingEngine {
    fallback: RateTable,
}

impl PricingEngine {
    /// Creates an engine whose missing rates resolve against `fallback`.
    pub fn new(fallback: RateTable) -> Self {
        PricingEngine { fallback }
    }

    /// The table used when a live rate is missing.
    pub fn fallback(&self) -> &RateTable {
        &self.fallback
    }

    /// Resolves the factor applied when converting into `target`.
    pub fn factor_for(&self, target: Currency, live: Option<&RateTable>) -> f64 {
        if target == Currency::BASE {
            return 1.0;
        }
        live.and_then(|table| table.factor(target))
            .or_else(|| self.fallback.factor(target))
            .unwrap_or(1.0)
    }

    /// Converts a base-currency amount into `target`.
    ///
    /// ## Example
    /// ```rust
    /// use beer_core::{Currency, Money, PricingEngine, RateTable};
    ///
    /// let engine = PricingEngine::new(RateTable::new(Currency::Usd));
    /// let live = RateTable::from_rates(Currency::Usd, [("EUR", 0.9)]).unwrap();
    ///
    /// let eur = engine.convert(Money::from_cents(1000), Currency::Eur, Some(&live));
    /// assert_eq!(eur.cents(), 900);
    /// ```
    pub fn convert(&self, amount: Money, target: Currency, live: Option<&RateTable>) -> Money {
        if target == Currency::BASE {
            return amount;
        }
        amount.scale(self.factor_for(target, live))
    }

    /// Formats an amount already expressed in `currency`.
    ///
    /// - USD: `$12.99`
    /// - EUR: `12.99€`
    /// - CZK: `12.99 Kč`
    pub fn format(amount: Money, currency: Currency) -> String {
        let sign = if amount.is_negative() { "-" } else { "" };
        let digits = amount.abs().to_decimal_string();
        match currency {
            Currency::Usd => format!("{}{}{}", sign, currency.symbol(), digits),
            Currency::Eur => format!("{}{}{}", sign, digits, currency.symbol()),
            Currency::Czk => format!("{}{} {}", sign, digits, currency.symbol()),
        }
    }

    /// Converts then formats a base-currency amount.
    pub fn display(&self, amount: Money, target: Currency, live: Option<&RateTable>) -> String {
        Self::format(self.convert(amount, target, live), target)
    }
}
