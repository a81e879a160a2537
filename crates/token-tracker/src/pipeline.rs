//! Fetch → score → predict sequence for a single token address.

use crate::source::{PredictionSource, TokenSource};
use fortune_core::api::{AiPrediction, PredictionRequest, PredictorClient, SolscanClient};
use fortune_core::config::Config;
use fortune_core::types::PredictionResult;
use fortune_core::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// Combined local and external prediction for one address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineOutcome {
    pub address: String,
    /// Absent when the metadata could not be scored.
    pub local: Option<PredictionResult>,
    /// Absent when the predictor is disabled or unreachable.
    pub ai: Option<AiPrediction>,
}

/// Runs the prediction pipeline against the configured data sources.
pub struct Pipeline {
    tokens: Arc<dyn TokenSource>,
    predictor: Option<Arc<dyn PredictionSource>>,
}

impl Pipeline {
    pub fn new(tokens: Arc<dyn TokenSource>, predictor: Option<Arc<dyn PredictionSource>>) -> Self {
        Self { tokens, predictor }
    }

    pub fn from_config(config: &Config) -> Self {
        let tokens: Arc<dyn TokenSource> = Arc::new(SolscanClient::from_config(&config.solscan));
        let predictor = PredictorClient::from_config(&config.predictor)
            .map(|client| Arc::new(client) as Arc<dyn PredictionSource>);
        Self::new(tokens, predictor)
    }

    /// Run the pipeline. Missing metadata or holders abort with an error;
    /// scoring and predictor failures only blank their half of the outcome.
    pub async fn run(&self, address: &str) -> Result<PipelineOutcome> {
        let meta = self.tokens.token_meta(address).await?;
        let holders = self.tokens.token_holders(address).await?;

        let local = match PredictionResult::analyze(address, &meta, &holders) {
            Ok(result) => Some(result),
            Err(e) => {
                warn!(address, error = %e, "Failed to score token");
                None
            }
        };

        let ai = match &self.predictor {
            Some(predictor) => {
                let request = PredictionRequest::from_responses(&meta, &holders);
                predictor.predict(&request).await.ok()
            }
            None => None,
        };

        debug!(
            address,
            has_local = local.is_some(),
            has_ai = ai.is_some(),
            "Pipeline finished"
        );

        Ok(PipelineOutcome {
            address: address.to_string(),
            local,
            ai,
        })
    }
}
