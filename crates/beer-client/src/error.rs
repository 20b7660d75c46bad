//! # Client Error Types
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Client Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Transport     │  │     Payload             │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Http           │  │  Decode                 │ │
//! │  │  InvalidUrl     │  │  Status         │  │  RateStatus             │ │
//! │  │  Toml*          │  │                 │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐                              │
//! │  │   File system   │  │    Internal     │                              │
//! │  │                 │  │                 │                              │
//! │  │  Io             │  │  WorkerStopped  │                              │
//! │  └─────────────────┘  └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Who Sees These
//! Only catalog failures reach the user (as the error text in the
//! view snapshot). Rate failures are replaced by fallback rates and
//! persistence failures are logged and dropped.

use thiserror::Error;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Endpoint URL failed to parse.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Config or settings file is not valid TOML.
    #[error("Failed to parse TOML: {0}")]
    TomlDecode(#[from] toml::de::Error),

    /// Config or settings could not be rendered as TOML.
    #[error("Failed to write TOML: {0}")]
    TomlEncode(#[from] toml::ser::Error),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// Request could not be sent or the body could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("Server returned {status}: {body}")]
    Status { status: u16, body: String },

    // =========================================================================
    // Payload Errors
    // =========================================================================
    /// Response or file body is not the expected JSON shape.
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Rate endpoint answered but reported a failure.
    #[error("Exchange rate service reported '{0}'")]
    RateStatus(String),

    // =========================================================================
    // File System / Internal
    // =========================================================================
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The background persistence task has exited.
    #[error("Persistence worker stopped")]
    WorkerStopped,
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::InvalidUrl(err.to_string())
    }
}

impl From<beer_core::CoreError> for ClientError {
    fn from(err: beer_core::CoreError) -> Self {
        ClientError::InvalidConfig(err.to_string())
    }
}
