//! Token Tracker
//!
//! Runs the fetch → score → predict pipeline for token addresses and keeps
//! tracked addresses refreshed in the background.

pub mod log;
pub mod pipeline;
pub mod source;
pub mod tracker;

pub use log::PredictionLog;
pub use pipeline::{Pipeline, PipelineOutcome};
pub use source::{PredictionSource, TokenSource, TranslationSource};
pub use tracker::{RefreshReport, RefreshStatus, TrackOutcome, Tracker};
