//! API clients for external services.

pub mod predictor;
pub mod solscan;
pub mod translator;

pub use predictor::{AiPrediction, PredictionRequest, PredictorClient};
pub use solscan::SolscanClient;
pub use translator::TranslatorClient;
