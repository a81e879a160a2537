//! Configuration management for the Fortune AI system.

use crate::{Error, Result};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub solscan: SolscanConfig,
    pub predictor: PredictorConfig,
    pub translator: TranslatorConfig,
    pub tracking: TrackingConfig,
}

/// Token metadata and holder listing service.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SolscanConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    /// Page size used when listing token holders.
    pub holders_limit: u32,
}

impl Default for SolscanConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.solscan.io".to_string(),
            api_key: None,
            holders_limit: 20,
        }
    }
}

/// External prediction service. `url = None` disables it.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PredictorConfig {
    pub url: Option<String>,
    pub timeout_secs: u64,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            url: Some("https://ai-fortune-predictor.com/api/v1/predict".to_string()),
            timeout_secs: 10,
        }
    }
}

impl PredictorConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// External translation service.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    pub url: String,
    pub source_lang: String,
    pub target_lang: String,
    pub timeout_secs: u64,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            url: "https://api.translation-service.com/translate".to_string(),
            source_lang: "en".to_string(),
            target_lang: "ja".to_string(),
            timeout_secs: 10,
        }
    }
}

impl TranslatorConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Periodic refresh of tracked tokens.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// Seconds between refreshes of one tracked address.
    pub refresh_interval_secs: u64,
    /// Append-only prediction log.
    pub log_file: PathBuf,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: 300,
            log_file: PathBuf::from("fortune_ai.log"),
        }
    }
}

impl TrackingConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }
}

impl Config {
    /// Load configuration from environment variables.
    #[allow(clippy::result_large_err)]
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = Self::default();
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, with environment variables
    /// taking precedence over values in the file.
    #[allow(clippy::result_large_err)]
    pub fn from_file(path: &Path) -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config: Self = config::Config::builder()
            .add_source(config::File::from(path))
            .build()?
            .try_deserialize()?;
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(url) = env::var("SOLSCAN_API_URL") {
            self.solscan.base_url = url;
        }
        if let Ok(key) = env::var("SOLSCAN_API_KEY") {
            self.solscan.api_key = Some(key).filter(|k| !k.is_empty());
        }
        if let Some(limit) = parse_env("HOLDERS_PAGE_LIMIT") {
            self.solscan.holders_limit = limit;
        }

        if let Ok(url) = env::var("AI_AGENT_URL") {
            self.predictor.url = Some(url).filter(|u| !u.is_empty());
        }
        if let Ok(url) = env::var("TRANSLATION_API_URL") {
            self.translator.url = url;
        }
        if let Ok(lang) = env::var("TRANSLATION_SOURCE_LANG") {
            self.translator.source_lang = lang;
        }
        if let Ok(lang) = env::var("TRANSLATION_TARGET_LANG") {
            self.translator.target_lang = lang;
        }
        if let Some(secs) = parse_env("HTTP_TIMEOUT_SECS") {
            self.predictor.timeout_secs = secs;
            self.translator.timeout_secs = secs;
        }

        if let Some(secs) = parse_env("REFRESH_INTERVAL_SECS") {
            self.tracking.refresh_interval_secs = secs;
        }
        if let Ok(path) = env::var("FORTUNE_LOG_FILE") {
            self.tracking.log_file = PathBuf::from(path);
        }
    }

    #[allow(clippy::result_large_err)]
    pub fn validate(&self) -> Result<()> {
        if self.solscan.base_url.trim().is_empty() {
            return Err(Error::Config {
                message: "SOLSCAN_API_URL must not be empty".to_string(),
            });
        }
        if self.translator.url.trim().is_empty() {
            return Err(Error::Config {
                message: "TRANSLATION_API_URL must not be empty".to_string(),
            });
        }
        if self.tracking.refresh_interval_secs == 0 {
            return Err(Error::Config {
                message: "refresh interval must be at least one second".to_string(),
            });
        }
        Ok(())
    }

    /// Configuration pointing every service at a single local base URL.
    pub fn local(base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/');
        Self {
            solscan: SolscanConfig {
                base_url: base_url.to_string(),
                api_key: Some("test-key".to_string()),
                holders_limit: 20,
            },
            predictor: PredictorConfig {
                url: Some(format!("{}/predict", base_url)),
                timeout_secs: 2,
            },
            translator: TranslatorConfig {
                url: format!("{}/translate", base_url),
                timeout_secs: 2,
                ..Default::default()
            },
            tracking: TrackingConfig::default(),
        }
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|s| s.parse().ok())
}
