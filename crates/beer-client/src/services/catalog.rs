//! Beer catalog endpoint.

use async_trait::async_trait;
use tracing::info;

use beer_core::BeerItem;

use super::get_json;
use crate::error::ClientResult;

/// Anything that can produce the full beer catalog.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetches every beer. Fails as a whole; there are no partial results.
    async fn fetch_all(&self) -> ClientResult<Vec<BeerItem>>;
}

/// Catalog served as a JSON array over HTTP.
#[derive(Debug, Clone)]
pub struct HttpCatalogService {
    client: reqwest::Client,
    url: String,
}

impl HttpCatalogService {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        HttpCatalogService {
            client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogService {
    async fn fetch_all(&self) -> ClientResult<Vec<BeerItem>> {
        let beers: Vec<BeerItem> = get_json(&self.client, &self.url).await?;
        info!(count = beers.len(), url = %self.url, "Fetched beer catalog");
        Ok(beers)
    }
}
