//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE STRING PRICE PROBLEM                                               │
//! │                                                                         │
//! │  The catalog endpoint sends prices as display strings:                  │
//! │    "price": "$12.99"                                                    │
//! │                                                                         │
//! │  Re-parsing that string every time a total is needed is lossy and       │
//! │  locale dependent. Summing floats drifts:                               │
//! │    0.1 + 0.2 = 0.30000000000000004                                      │
//! │                                                                         │
//! │  OUR SOLUTION: parse ONCE at the wire boundary into integer cents       │
//! │    "$12.99" ──► Money(1299) ──► sums/conversions in i64                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use beer_core::money::Money;
//!
//! let price = Money::parse_price("$5.00").unwrap();
//! let total: Money = [price, price].into_iter().sum();
//! assert_eq!(total.cents(), 1000);
//! assert_eq!(total.to_string(), "$10.00");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit.
///
/// `Money` carries no currency tag: catalog prices are in the base
/// currency, and a converted amount is only ever formatted together with
/// the target [`Currency`](crate::currency::Currency).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion (dollars, euros, korunas).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.saturating_abs())
    }

    /// Multiplies by a conversion factor, rounding half away from zero
    /// to the nearest minor unit.
    ///
    /// ## Example
    /// ```rust
    /// use beer_core::money::Money;
    ///
    /// let usd = Money::from_cents(500); // 5.00
    /// assert_eq!(usd.scale(23.5).cents(), 11750); // 117.50
    /// assert_eq!(Money::from_cents(1).scale(0.5).cents(), 1);
    /// ```
    pub fn scale(&self, factor: f64) -> Money {
        Money((self.0 as f64 * factor).round() as i64)
    }

    /// Parses a display price such as `"$12.99"` into Money.
    ///
    /// ## Accepted Input
    /// - Optional surrounding whitespace
    /// - Optional leading `-` and/or `$`
    /// - Thousands separators (`,`) in the major part
    /// - Any number of decimals; beyond two the value is rounded half up
    ///
    /// ## Returns
    /// `None` when the string is not a number. Callers that sum prices
    /// treat `None` as zero.
    ///
    /// ## Example
    /// ```rust
    /// use beer_core::money::Money;
    ///
    /// assert_eq!(Money::parse_price("$12.99"), Some(Money::from_cents(1299)));
    /// assert_eq!(Money::parse_price("1,250.5"), Some(Money::from_cents(125050)));
    /// assert_eq!(Money::parse_price("free"), None);
    /// ```
    pub fn parse_price(input: &str) -> Option<Money> {
        let mut s = input.trim();

        let negative = s.starts_with('-');
        if negative {
            s = &s[1..];
        }
        s = s.strip_prefix('$').unwrap_or(s).trim_start();

        let (major_str, minor_str) = match s.split_once('.') {
            Some((major, minor)) => (major, minor),
            None => (s, ""),
        };
        let major_digits: String = major_str.chars().filter(|c| *c != ',').collect();

        if major_digits.is_empty() && minor_str.is_empty() {
            return None;
        }
        if !major_digits.chars().all(|c| c.is_ascii_digit())
            || !minor_str.chars().all(|c| c.is_ascii_digit())
        {
            return None;
        }

        let major: i64 = if major_digits.is_empty() {
            0
        } else {
            major_digits.parse().ok()?
        };

        let minor_bytes = minor_str.as_bytes();
        let digit = |i: usize| minor_bytes.get(i).map_or(0, |b| i64::from(b - b'0'));
        let mut minor = digit(0) * 10 + digit(1);
        if digit(2) >= 5 {
            minor += 1;
        }

        let cents = major.checked_mul(100)?.checked_add(minor)?;
        Some(Money(if negative { -cents } else { cents }))
    }

    /// Renders the amount as a plain decimal with two places, without a
    /// currency symbol: `1299` → `"12.99"`.
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}.{:02}", sign, self.major().abs(), self.minor_part())
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows the base-currency wire format (`"$12.99"`).
///
/// ## Note
/// Use [`PricingEngine::format`](crate::pricing::PricingEngine::format)
/// for anything shown in a non-base currency.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}${}.{:02}", sign, self.major().abs(), self.minor_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Addition saturates at the `i64` bounds. Decoded prices can already sit
/// at a bound (a numeric `1e300` price), and totals must never panic.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Wire Format
// =============================================================================

/// Serde adapter that keeps prices in their `"$12.99"` wire form.
///
/// Unparsable strings (and non-string values) decode to zero rather than
/// failing the whole catalog.
///
/// ```rust,ignore
/// #[serde(with = "crate::money::price_string")]
/// pub price: Money,
/// ```
pub mod price_string {
    use super::Money;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(money: &Money, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(money)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Money, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        let money = match &value {
            serde_json::Value::String(s) => Money::parse_price(s),
            serde_json::Value::Number(n) => {
                n.as_f64().map(|f| Money::from_cents((f * 100.0).round() as i64))
            }
            _ => None,
        };
        Ok(money.unwrap_or_default())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "$10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "$5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "$0.00");
    }

    #[test]
    fn test_decimal_string() {
        assert_eq!(Money::from_cents(1299).to_decimal_string(), "12.99");
        assert_eq!(Money::from_cents(-5).to_decimal_string(), "-0.05");
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(Money::parse_price("$5.00"), Some(Money::from_cents(500)));
        assert_eq!(Money::parse_price(" $12.5 "), Some(Money::from_cents(1250)));
        assert_eq!(Money::parse_price("7"), Some(Money::from_cents(700)));
        assert_eq!(Money::parse_price(".99"), Some(Money::from_cents(99)));
        assert_eq!(Money::parse_price("$1,234.56"), Some(Money::from_cents(123456)));
        assert_eq!(Money::parse_price("-$2.10"), Some(Money::from_cents(-210)));
        assert_eq!(Money::parse_price("$2.345"), Some(Money::from_cents(235)));
        assert_eq!(Money::parse_price("$2.344"), Some(Money::from_cents(234)));
    }

    #[test]
    fn test_parse_price_rejects_garbage() {
        assert_eq!(Money::parse_price(""), None);
        assert_eq!(Money::parse_price("$"), None);
        assert_eq!(Money::parse_price("N/A"), None);
        assert_eq!(Money::parse_price("€5.00"), None);
        assert_eq!(Money::parse_price("5.0.0"), None);
        assert_eq!(Money::parse_price("99999999999999999999"), None);
    }

    #[test]
    fn test_arithmetic_and_sum() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);

        let mut c = a;
        c += b;
        assert_eq!(c.cents(), 1500);

        let total: Money = vec![a, b, b].into_iter().sum();
        assert_eq!(total.cents(), 2000);
    }

    #[test]
    fn test_huge_numeric_prices_saturate() {
        #[derive(Deserialize)]
        struct Priced {
            #[serde(with = "price_string")]
            price: Money,
        }

        let huge: Priced = serde_json::from_str(r#"{"price":1e300}"#).unwrap();
        assert_eq!(huge.price.cents(), i64::MAX);

        let total: Money = [huge.price, huge.price].iter().sum();
        assert_eq!(total.cents(), i64::MAX);

        let owed: Priced = serde_json::from_str(r#"{"price":-1e300}"#).unwrap();
        assert_eq!(owed.price.cents(), i64::MIN);
        assert_eq!((owed.price + owed.price).cents(), i64::MIN);
        assert_eq!(owed.price.abs().cents(), i64::MAX);
    }

    #[test]
    fn test_scale_rounds_half_away_from_zero() {
        assert_eq!(Money::from_cents(1000).scale(0.9).cents(), 900);
        assert_eq!(Money::from_cents(1000).scale(0.92).cents(), 920);
        assert_eq!(Money::from_cents(333).scale(0.5).cents(), 167);
        assert_eq!(Money::from_cents(-333).scale(0.5).cents(), -167);
    }

    #[test]
    fn test_price_string_wire_format() {
        #[derive(Debug, PartialEq, Serialize, Deserialize)]
        struct Priced {
            #[serde(with = "price_string")]
            price: Money,
        }

        let parsed: Priced = serde_json::from_str(r#"{"price":"$4.25"}"#).unwrap();
        assert_eq!(parsed.price.cents(), 425);
        assert_eq!(serde_json::to_string(&parsed).unwrap(), r#"{"price":"$4.25"}"#);

        let garbage: Priced = serde_json::from_str(r#"{"price":"ask staff"}"#).unwrap();
        assert!(garbage.price.is_zero());

        let numeric: Priced = serde_json::from_str(r#"{"price":3.5}"#).unwrap();
        assert_eq!(numeric.price.cents(), 350);

        let null: Priced = serde_json::from_str(r#"{"price":null}"#).unwrap();
        assert!(null.price.is_zero());
    }
}
