//! Solscan client for token metadata and holder listings.

use crate::config::SolscanConfig;
use crate::types::is_empty_response;
use crate::{Error, Result};
use serde_json::Value;
use tracing::{debug, warn};

/// Client for the token data API.
///
/// Requests carry no timeout; a stalled upstream blocks the calling task
/// until the connection is dropped.
pub struct SolscanClient {
    base_url: String,
    api_key: Option<String>,
    holders_limit: u32,
    http_client: reqwest::Client,
}

impl SolscanClient {
    /// Default holder page size.
    pub const DEFAULT_HOLDERS_LIMIT: u32 = 20;

    pub fn new(base_url: String, api_key: Option<String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            holders_limit: Self::DEFAULT_HOLDERS_LIMIT,
            http_client: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &SolscanConfig) -> Self {
        if config.api_key.is_none() {
            warn!("SOLSCAN_API_KEY not set, requests will be sent without a token");
        }
        Self {
            holders_limit: config.holders_limit,
            ..Self::new(config.base_url.clone(), config.api_key.clone())
        }
    }

    /// Page size used by [`Self::token_holders_page`].
    pub fn holders_limit(&self) -> u32 {
        self.holders_limit
    }

    /// Fetch token metadata (`symbol`, `market_cap`, `price`, ...).
    pub async fn token_meta(&self, address: &str) -> Result<Value> {
        let url = format!("{}/token/meta", self.base_url);
        self.get_json(&url, &[("tokenAddress", address.to_string())], "token metadata")
            .await
            .inspect_err(|e| warn!(address, error = %e, "Failed to fetch token metadata"))
    }

    /// Fetch one page of token holders.
    pub async fn token_holders(&self, address: &str, offset: u32, limit: u32) -> Result<Value> {
        let url = format!("{}/token/holders", self.base_url);
        let query = [
            ("tokenAddress", address.to_string()),
            ("offset", offset.to_string()),
            ("limit", limit.to_string()),
        ];
        self.get_json(&url, &query, "holder data")
            .await
            .inspect_err(|e| warn!(address, error = %e, "Failed to fetch token holders"))
    }

    /// Fetch the first page of holders using the configured page size.
    pub async fn token_holders_page(&self, address: &str) -> Result<Value> {
        self.token_holders(address, 0, self.holders_limit).await
    }

    async fn get_json(
        &self,
        url: &str,
        query: &[(&str, String)],
        what: &'static str,
    ) -> Result<Value> {
        let mut request = self
            .http_client
            .get(url)
            .query(query)
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(key) = &self.api_key {
            request = request.header("token", key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(Error::Api {
                message: format!("{} request failed: {}", what, response.status()),
                status: Some(response.status().as_u16()),
            });
        }

        let body: Value = response.json().await?;
        if is_empty_response(&body) {
            return Err(Error::MissingData { what });
        }

        debug!(url, "Fetched {}", what);
        Ok(body)
    }
}
