//! Fortune AI: token outlook prediction and tracking
//!
//! This is the root crate that provides benchmark and integration-test
//! access to the workspace crates. For actual functionality, use the
//! individual crates directly:
//!
//! - `fortune-core`: configuration, API clients, domain types, scoring
//! - `token-tracker`: prediction pipeline, tracked addresses, periodic refresh
//! - `fortune-cli`: the `fortune-ai` interactive console

// Re-export for benchmarks
pub use fortune_core as core;
pub use token_tracker as tracker;
