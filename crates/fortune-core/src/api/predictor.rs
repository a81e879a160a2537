//! Client for the external AI prediction service.

use crate::config::PredictorConfig;
use crate::types::{is_empty_response, HolderSnapshot};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::warn;

/// Payload sent to the prediction service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub symbol: String,
    /// Forwarded as received from the metadata API.
    pub market_cap: Value,
    pub holders_count: u64,
    /// Forwarded as received from the metadata API.
    pub price: Value,
}

impl PredictionRequest {
    pub const UNKNOWN_SYMBOL: &'static str = "UNKNOWN";

    /// Build a request from the raw metadata and holder responses.
    pub fn from_responses(meta: &Value, holders: &Value) -> Self {
        let symbol = meta
            .get("symbol")
            .and_then(Value::as_str)
            .unwrap_or(Self::UNKNOWN_SYMBOL)
            .to_string();
        let raw_or_zero = |field: &str| match meta.get(field) {
            None | Some(Value::Null) => Value::from(0),
            Some(v) => v.clone(),
        };

        Self {
            symbol,
            market_cap: raw_or_zero("market_cap"),
            holders_count: HolderSnapshot::from_listing(holders).holders_count,
            price: raw_or_zero("price"),
        }
    }
}

/// Prediction text returned by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiPrediction {
    pub prediction: String,
}

impl AiPrediction {
    /// Used when a non-empty response carries no `prediction` field.
    pub const NO_DATA: &'static str = "No prediction data available";

    fn from_response(body: &Value) -> Self {
        let prediction = match body.get("prediction") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => Self::NO_DATA.to_string(),
            Some(other) => other.to_string(),
        };
        Self { prediction }
    }
}

/// External prediction service client.
pub struct PredictorClient {
    url: String,
    timeout: Duration,
    http_client: reqwest::Client,
}

impl PredictorClient {
    pub fn new(url: String, timeout: Duration) -> Self {
        Self {
            url,
            timeout,
            http_client: reqwest::Client::new(),
        }
    }

    /// `None` when the predictor is disabled.
    pub fn from_config(config: &PredictorConfig) -> Option<Self> {
        config
            .url
            .clone()
            .map(|url| Self::new(url, config.timeout()))
    }

    pub async fn predict(&self, request: &PredictionRequest) -> Result<AiPrediction> {
        self.send(request).await.inspect_err(|e| {
            warn!(symbol = %request.symbol, error = %e, "Failed to reach prediction service")
        })
    }

    async fn send(&self, request: &PredictionRequest) -> Result<AiPrediction> {
        let response = self
            .http_client
            .post(&self.url)
            .timeout(self.timeout)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Api {
                message: format!("Prediction request failed: {}", response.status()),
                status: Some(response.status().as_u16()),
            });
        }

        let body: Value = response.json().await?;
        if is_empty_response(&body) {
            return Err(Error::MissingData { what: "prediction" });
        }
        Ok(AiPrediction::from_response(&body))
    }
}
