//! IBGE localities client
//!
//! Fetches Brazilian state (UF) and municipality lists from the public
//! IBGE localities API:
//! - GET {base}/estados
//! - GET {base}/estados/{uf}/municipios

use crate::domain::types::{CityRecord, UfRecord};
use crate::infra::Config;
use anyhow::{bail, Context};
use async_trait::async_trait;
use std::time::Duration;
use tracing::info;

/// Geographic reference data lookups the registration form depends on
#[async_trait]
pub trait LocalityProvider: Send + Sync {
    /// Fetch the list of two-letter state codes
    async fn fetch_ufs(&self) -> anyhow::Result<Vec<String>>;

    /// Fetch the municipality names of one state
    async fn fetch_cities(&self, uf: &str) -> anyhow::Result<Vec<String>>;
}

/// HTTP client against the IBGE localities API
pub struct IbgeClient {
    base_url: String,
    client: reqwest::Client,
}

impl IbgeClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.ibge_timeout_ms()))
            .build()
            .context("Failed to build IBGE client")?;

        Ok(Self { base_url: config.ibge_base_url().trim_end_matches('/').to_string(), client })
    }
}

/// Project the UF wire records down to their two-letter codes
fn uf_initials(records: Vec<UfRecord>) -> Vec<String> {
    records.into_iter().map(|uf| uf.sigla).collect()
}

/// Project the municipality wire records down to their names
fn city_names(records: Vec<CityRecord>) -> Vec<String> {
    records.into_iter().map(|city| city.nome).collect()
}

#[async_trait]
impl LocalityProvider for IbgeClient {
    async fn fetch_ufs(&self) -> anyhow::Result<Vec<String>> {
        let url = format!("{}/estados", self.base_url);
        let response =
            self.client.get(&url).send().await.with_context(|| format!("GET {} failed", url))?;

        let status = response.status();
        if !status.is_success() {
            bail!("GET {} returned status {}", url, status.as_u16());
        }

        let records: Vec<UfRecord> =
            response.json().await.context("Failed to decode UF list")?;
        let ufs = uf_initials(records);
        info!(count = ufs.len(), "ufs_fetched");
        Ok(ufs)
    }

    async fn fetch_cities(&self, uf: &str) -> anyhow::Result<Vec<String>> {
        let url = format!("{}/estados/{}/municipios", self.base_url, uf);
        let response =
            self.client.get(&url).send().await.with_context(|| format!("GET {} failed", url))?;

        let status = response.status();
        if !status.is_success() {
            bail!("GET {} returned status {}", url, status.as_u16());
        }

        let records: Vec<CityRecord> =
            response.json().await.context("Failed to decode municipality list")?;
        let cities = city_names(records);
        info!(uf = %uf, count = cities.len(), "cities_fetched");
        Ok(cities)
    }
}
