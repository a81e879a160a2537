//! Data-source seams between the pipeline and the HTTP clients.

use async_trait::async_trait;
use fortune_core::api::{
    AiPrediction, PredictionRequest, PredictorClient, SolscanClient, TranslatorClient,
};
use fortune_core::Result;
use serde_json::Value;

/// Token metadata and holder listings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn token_meta(&self, address: &str) -> Result<Value>;

    /// First page of holders for the token.
    async fn token_holders(&self, address: &str) -> Result<Value>;
}

/// External prediction service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PredictionSource: Send + Sync {
    async fn predict(&self, request: &PredictionRequest) -> Result<AiPrediction>;
}

/// Text translation. Never fails; errors become a fixed fallback text.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TranslationSource: Send + Sync {
    async fn translate(&self, text: &str) -> String;
}

#[async_trait]
impl TokenSource for SolscanClient {
    async fn token_meta(&self, address: &str) -> Result<Value> {
        SolscanClient::token_meta(self, address).await
    }

    async fn token_holders(&self, address: &str) -> Result<Value> {
        self.token_holders_page(address).await
    }
}

#[async_trait]
impl PredictionSource for PredictorClient {
    async fn predict(&self, request: &PredictionRequest) -> Result<AiPrediction> {
        PredictorClient::predict(self, request).await
    }
}

#[async_trait]
impl TranslationSource for TranslatorClient {
    async fn translate(&self, text: &str) -> String {
        self.translate_or_fallback(text).await
    }
}
