//! Client for the external translation service.

use crate::config::TranslatorConfig;
use crate::{Error, Result};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::warn;

#[derive(Debug, Serialize)]
struct TranslationRequest<'a> {
    text: &'a str,
    source_lang: &'a str,
    target_lang: &'a str,
}

/// Translation service client.
pub struct TranslatorClient {
    url: String,
    source_lang: String,
    target_lang: String,
    timeout: Duration,
    http_client: reqwest::Client,
}

impl TranslatorClient {
    /// Returned when the service answers without a `translated_text` field.
    pub const UNAVAILABLE: &'static str = "Translation unavailable";
    /// Returned by [`Self::translate_or_fallback`] when the request fails.
    pub const FAILED: &'static str = "Translation failed";

    pub fn new(url: String, source_lang: String, target_lang: String, timeout: Duration) -> Self {
        Self {
            url,
            source_lang,
            target_lang,
            timeout,
            http_client: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &TranslatorConfig) -> Self {
        Self::new(
            config.url.clone(),
            config.source_lang.clone(),
            config.target_lang.clone(),
            config.timeout(),
        )
    }

    pub async fn translate(&self, text: &str) -> Result<String> {
        let request = TranslationRequest {
            text,
            source_lang: &self.source_lang,
            target_lang: &self.target_lang,
        };

        let response = self
            .http_client
            .post(&self.url)
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Api {
                message: format!("Translation request failed: {}", response.status()),
                status: Some(response.status().as_u16()),
            });
        }

        let body: Value = response.json().await?;
        Ok(body
            .get("translated_text")
            .and_then(Value::as_str)
            .unwrap_or(Self::UNAVAILABLE)
            .to_string())
    }

    /// Translate, substituting [`Self::FAILED`] for any error.
    pub async fn translate_or_fallback(&self, text: &str) -> String {
        match self.translate(text).await {
            Ok(translated) => translated,
            Err(e) => {
                warn!(error = %e, "Failed to reach translation service");
                Self::FAILED.to_string()
            }
        }
    }
}
