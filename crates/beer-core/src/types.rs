//! # Domain Types
//!
//! Core domain types used throughout Beer Orderer.
//!
//! ## Wire Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  {                                                                      │
//! │    "id": 7,                                                             │
//! │    "name": "Hazy IPA",                                                  │
//! │    "price": "$12.99",              ──► Money(1299)                      │
//! │    "rating": { "average": 4.4,     ──► Rating { 4.4, 120 }              │
//! │                "reviews": 120 },                                        │
//! │    "image": "https://..."          ──► Option<String>                   │
//! │  }                                                                      │
//! │                                                                         │
//! │  The same shape is used by the catalog endpoint and orders.json.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::money::{self, Money};

// =============================================================================
// Rating
// =============================================================================

/// Average review score and number of reviews.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Rating {
    /// Average score, typically in `[0, 5]`.
    pub average: f64,
    /// Number of reviews.
    pub reviews: u32,
}

impl Rating {
    pub const fn new(average: f64, reviews: u32) -> Self {
        Rating { average, reviews }
    }

    /// Interprets any JSON value as a rating.
    ///
    /// | input                         | result              |
    /// |-------------------------------|---------------------|
    /// | `null`                        | `{0.0, 0}`          |
    /// | `{"average": x, "reviews": n}`| fields, each tolerant |
    /// | `4.5` or `"4.5"`              | `{4.5, 0}`          |
    /// | anything else                 | `{0.0, 0}`          |
    pub fn from_json(value: &Value) -> Rating {
        match value {
            Value::Object(obj) => Rating {
                average: obj.get("average").and_then(as_f64_lenient).unwrap_or(0.0),
                reviews: obj.get("reviews").and_then(as_u32_lenient).unwrap_or(0),
            },
            Value::Number(_) | Value::String(_) => Rating {
                average: as_f64_lenient(value).unwrap_or(0.0),
                reviews: 0,
            },
            _ => Rating::default(),
        }
    }
}

impl<'de> Deserialize<'de> for Rating {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Rating::from_json(&value))
    }
}

fn as_f64_lenient(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|f| f.is_finite())
}

fn as_u32_lenient(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

// =============================================================================
// Beer
// =============================================================================

/// A beer from the catalog, and a line item in the order list.
///
/// ## Identity
/// - Equality is structural (all fields); the order list removes the first
///   structurally equal item.
/// - `id` alone identifies a beer for list diffing and CLI lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeerItem {
    #[serde(default)]
    pub id: i64,

    #[serde(default)]
    pub name: String,

    /// Price in the base currency. Encoded as `"$12.99"` on the wire.
    #[serde(default, with = "money::price_string")]
    pub price: Money,

    #[serde(default)]
    pub rating: Rating,

    #[serde(default)]
    pub image: Option<String>,
}

impl BeerItem {
    /// Creates a beer with no rating or image.
    pub fn new(id: i64, name: impl Into<String>, price: Money) -> Self {
        BeerItem {
            id,
            name: name.into(),
            price,
            rating: Rating::default(),
            image: None,
        }
    }

    /// Builder-style rating setter.
    pub fn with_rating(mut self, average: f64, reviews: u32) -> Self {
        self.rating = Rating::new(average, reviews);
        self
    }

    /// Builder-style image setter.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn rating_of(json: &str) -> Rating {
        let beer: BeerItem = serde_json::from_str(json).unwrap();
        beer.rating
    }

    #[test]
    fn test_decode_full_beer() {
        let json = r#"{
            "id": 1,
            "name": "IPA Gold",
            "price": "$5.00",
            "rating": {"average": 4.5, "reviews": 10},
            "image": "https://example.com/ipa.png"
        }"#;
        let beer: BeerItem = serde_json::from_str(json).unwrap();

        assert_eq!(beer.id, 1);
        assert_eq!(beer.name, "IPA Gold");
        assert_eq!(beer.price, Money::from_cents(500));
        assert_eq!(beer.rating, Rating::new(4.5, 10));
        assert_eq!(beer.image.as_deref(), Some("https://example.com/ipa.png"));
    }

    #[test]
    fn test_rating_shapes() {
        assert_eq!(rating_of(r#"{"id":1}"#), Rating::default());
        assert_eq!(rating_of(r#"{"id":1,"rating":null}"#), Rating::default());
        assert_eq!(rating_of(r#"{"id":1,"rating":3.7}"#), Rating::new(3.7, 0));
        assert_eq!(rating_of(r#"{"id":1,"rating":"4.1"}"#), Rating::new(4.1, 0));
        assert_eq!(rating_of(r#"{"id":1,"rating":"great"}"#), Rating::default());
        assert_eq!(rating_of(r#"{"id":1,"rating":[1,2]}"#), Rating::default());
        assert_eq!(
            rating_of(r#"{"id":1,"rating":{"average":"4.25","reviews":"12"}}"#),
            Rating::new(4.25, 12)
        );
        assert_eq!(
            rating_of(r#"{"id":1,"rating":{"reviews":-4}}"#),
            Rating::default()
        );
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let beer: BeerItem = serde_json::from_str(r#"{"name":"Mystery"}"#).unwrap();
        assert_eq!(beer.id, 0);
        assert!(beer.price.is_zero());
        assert!(beer.image.is_none());
    }

    #[test]
    fn test_encode_keeps_wire_shape() {
        let beer = BeerItem::new(3, "Dry Stout", Money::from_cents(799)).with_rating(4.0, 2);
        let value = serde_json::to_value(&beer).unwrap();

        assert_eq!(value["price"], "$7.99");
        assert_eq!(value["rating"]["reviews"], 2);
        assert!(value["image"].is_null());

        let back: BeerItem = serde_json::from_value(value).unwrap();
        assert_eq!(back, beer);
    }
}
