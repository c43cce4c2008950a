//! Backend API client used by the registration form

use crate::domain::point::NewPoint;
use crate::domain::types::CatalogItem;
use crate::infra::Config;
use anyhow::{bail, Context};
use async_trait::async_trait;
use std::time::Duration;
use tracing::info;

/// Backend operations the registration form depends on
#[async_trait]
pub trait PointsApi: Send + Sync {
    /// Fetch the waste item catalog
    async fn fetch_items(&self) -> anyhow::Result<Vec<CatalogItem>>;

    /// Create a collection point from an assembled submission record
    async fn create_point(&self, point: &NewPoint) -> anyhow::Result<()>;
}

/// HTTP client against the backend API
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        // Create the HTTP client once for reuse (connection pooling)
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.api_timeout_ms()))
            .http1_only()
            .build()
            .context("Failed to build backend API client")?;

        Ok(Self { base_url: config.api_base_url().trim_end_matches('/').to_string(), client })
    }

    #[cfg(test)]
    fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    #[cfg(test)]
    fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl PointsApi for ApiClient {
    async fn fetch_items(&self) -> anyhow::Result<Vec<CatalogItem>> {
        let url = format!("{}/items", self.base_url);
        let response =
            self.client.get(&url).send().await.with_context(|| format!("GET {} failed", url))?;

        let status = response.status();
        if !status.is_success() {
            bail!("GET {} returned status {}", url, status.as_u16());
        }

        let items: Vec<CatalogItem> =
            response.json().await.context("Failed to decode item catalog")?;
        info!(count = items.len(), "items_fetched");
        Ok(items)
    }

    async fn create_point(&self, point: &NewPoint) -> anyhow::Result<()> {
        let url = format!("{}/points", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(point)
            .send()
            .await
            .with_context(|| format!("POST {} failed", url))?;

        let status = response.status();
        if !status.is_success() {
            bail!("POST {} returned status {}", url, status.as_u16());
        }

        info!(status = status.as_u16(), "point_create_accepted");
        Ok(())
    }
}
