use async_trait::async_trait;
use reqwest::Client;

use crate::config::Config;
use crate::fetcher::{
    client::{build_client, fetch_json_with, fetch_with},
    errors::FetchError,
    types::PageResponse,
};

/// Outbound retrieval seam used by every entity parser.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// One GET for an HTML page.
    async fn fetch_page(&self, url: &str) -> Result<PageResponse, FetchError>;

    /// One GET for a JSON document.
    async fn fetch_json(&self, url: &str) -> Result<serde_json::Value, FetchError>;
}

/// `PageFetcher` backed by a reqwest client built from configuration.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_config(config: &Config) -> Result<Self, FetchError> {
        let client = build_client(config.user_agent(), config.request_timeout())?;
        Ok(Self::new(client))
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch_page(&self, url: &str) -> Result<PageResponse, FetchError> {
        fetch_with(&self.client, url).await
    }

    async fn fetch_json(&self, url: &str) -> Result<serde_json::Value, FetchError> {
        fetch_json_with(&self.client, url).await
    }
}
