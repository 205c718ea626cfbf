use std::time::Duration;

use reqwest::Client;
use url::Url;

use crate::config::AppConfig;
use crate::error::FetchError;
use crate::filter::FilterRecord;
use crate::models::{Article, ArticleListResponse};
use crate::query::{serialize_filters, ARTICLES_PATH};

/// Thin wrapper around the HTTP client bound to one articles endpoint and a
/// fixed page size.
#[derive(Debug, Clone)]
pub struct ArticleClient {
    http: Client,
    base_url: Url,
    page_size: u32,
}

impl ArticleClient {
    pub fn new(http: Client, base_url: Url, page_size: u32) -> Self {
        Self {
            http,
            base_url,
            page_size,
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, FetchError> {
        let base_url = Url::parse(&config.api.base_url)?;
        let http = Client::builder()
            .timeout(Duration::from_secs(config.api.request_timeout_seconds))
            .build()?;
        Ok(Self::new(http, base_url, config.search.page_size))
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Issue one GET for the given filters and decode the item list. Non-2xx
    /// statuses and undecodable bodies are distinct error cases so the caller
    /// can report them separately.
    pub async fn fetch(&self, record: &FilterRecord) -> Result<Vec<Article>, FetchError> {
        let url = self.base_url.join(ARTICLES_PATH)?;
        let params = serialize_filters(record, self.page_size);
        let response = self.http.get(url).query(&params).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http(status));
        }

        let bytes = response.bytes().await?;
        let body: ArticleListResponse = serde_json::from_slice(&bytes)?;
        Ok(body.items)
    }
}
