//! Exchange-rate endpoint.

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::info;

use beer_core::{Currency, RateTable};

use super::get_json;
use crate::config::BASE_PLACEHOLDER;
use crate::error::{ClientError, ClientResult};

/// Value of `result` on a successful rate response.
const SUCCESS: &str = "success";

/// Anything that can produce conversion factors relative to a base.
#[async_trait]
pub trait RateSource: Send + Sync {
    async fn fetch_rates(&self, base: Currency) -> ClientResult<RateTable>;
}

/// Rate endpoint response body.
#[derive(Debug, Clone, Deserialize)]
pub struct RateResponse {
    pub result: String,
    #[serde(default)]
    pub conversion_rates: HashMap<String, f64>,
}

/// Rates served over HTTP from a `{base}` URL template.
#[derive(Debug, Clone)]
pub struct HttpRateService {
    client: reqwest::Client,
    url_template: String,
}

impl HttpRateService {
    pub fn new(client: reqwest::Client, url_template: impl Into<String>) -> Self {
        HttpRateService {
            client,
            url_template: url_template.into(),
        }
    }

    pub fn url_for(&self, base: Currency) -> String {
        self.url_template.replace(BASE_PLACEHOLDER, base.code())
    }
}

#[async_trait]
impl RateSource for HttpRateService {
    /// Fetches rates; a decoded body whose `result` is not `"success"`
    /// is a failure even though the transport succeeded.
    async fn fetch_rates(&self, base: Currency) -> ClientResult<RateTable> {
        let url = self.url_for(base);
        let response: RateResponse = get_json(&self.client, &url).await?;

        if response.result != SUCCESS {
            return Err(ClientError::RateStatus(response.result));
        }

        let table = RateTable::from_remote(base, response.conversion_rates, Utc::now());
        info!(base = %base, currencies = table.len(), "Fetched exchange rates");
        Ok(table)
    }
}
