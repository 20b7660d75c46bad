//! # Remote Services
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Remote Services                                   │
//! │                                                                         │
//! │  CatalogSource (trait) ◄── HttpCatalogService                           │
//! │    fetch_all()               GET {catalog_url}                          │
//! │                              → [ {id, name, price, rating, image} ]     │
//! │                                                                         │
//! │  RateSource (trait)    ◄── HttpRateService                              │
//! │    fetch_rates(base)         GET {rates_url with {base}}                │
//! │                              → { result, conversion_rates }             │
//! │                                                                         │
//! │  One round trip per call. No retry, no partial results.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The traits let [`CatalogViewState`](crate::view_state::CatalogViewState)
//! run against in-memory sources in tests.

mod catalog;
mod rates;

pub use catalog::{CatalogSource, HttpCatalogService};
pub use rates::{HttpRateService, RateResponse, RateSource};

use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::error::{ClientError, ClientResult};

/// Builds the shared HTTP client.
///
/// `timeout` of `None` keeps reqwest's default (no overall timeout).
pub fn build_http_client(timeout: Option<Duration>) -> ClientResult<reqwest::Client> {
    let mut builder = reqwest::Client::builder().user_agent(concat!(
        env!("CARGO_PKG_NAME"),
        "/",
        env!("CARGO_PKG_VERSION")
    ));
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}

/// GETs `url` and decodes a JSON body.
///
/// Non-2xx answers become [`ClientError::Status`] carrying the body text.
async fn get_json<T: DeserializeOwned>(client: &reqwest::Client, url: &str) -> ClientResult<T> {
    let resp = client.get(url).send().await?;
    let status = resp.status();
    let body = resp.text().await?;
    debug!(url, status = status.as_u16(), bytes = body.len(), "HTTP response");

    if !status.is_success() {
        return Err(ClientError::Status {
            status: status.as_u16(),
            body,
        });
    }

    Ok(serde_json::from_str(&body)?)
}
