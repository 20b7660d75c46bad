//! # Error Types
//!
//! Domain-specific error types for beer-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  beer-core errors (this file)                                          │
//! │  └── CoreError        - Parsing of user/config supplied values         │
//! │                                                                         │
//! │  beer-client errors (separate crate)                                   │
//! │  └── ClientError      - HTTP, file system and config failures          │
//! │                                                                         │
//! │  Flow: CoreError → ClientError → anyhow (CLI) → stderr                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Most core operations are total functions and never fail: an unparsable
//! price is zero, a missing rate falls back. Errors only exist where a
//! caller hands us a string that must name something from a closed set.

use thiserror::Error;

/// Core business logic errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// Currency code is not one of the supported currencies.
    #[error("Unknown currency: '{0}'. Valid options: USD, EUR, CZK")]
    UnknownCurrency(String),

    /// Filter name does not match any beer category.
    #[error("Unknown filter: '{0}'")]
    UnknownFilter(String),

    /// Sort name does not match any sort option.
    #[error("Unknown sort option: '{0}'")]
    UnknownSort(String),

    /// A conversion factor must be finite and strictly positive.
    #[error("Invalid exchange rate for {code}: {factor}")]
    InvalidRate { code: String, factor: f64 },
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
