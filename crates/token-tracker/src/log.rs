//! Append-only prediction log.
//!
//! One human-readable line per event:
//! `2024-05-01 12:00:00 - INFO - Token address: ...`

use crate::pipeline::PipelineOutcome;
use chrono::Local;
use fortune_core::Result;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::warn;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const SEPARATOR_WIDTH: usize = 50;

/// Prediction log file opened in append mode on every write.
#[derive(Debug, Clone)]
pub struct PredictionLog {
    path: PathBuf,
}

impl PredictionLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Log the result of a successful refresh.
    pub async fn record(&self, outcome: &PipelineOutcome) {
        let mut entries = vec![("INFO", format!("Token address: {}", outcome.address))];
        if let Some(local) = &outcome.local {
            entries.push(("INFO", format!("Local prediction: {}", local.prediction)));
        }
        if let Some(ai) = &outcome.ai {
            entries.push(("INFO", format!("AI prediction: {}", ai.prediction)));
        }
        entries.push(("INFO", "-".repeat(SEPARATOR_WIDTH)));

        self.write_or_warn(&entries).await;
    }

    /// Log a refresh that was abandoned.
    pub async fn record_failure(&self, address: &str, error: &str) {
        self.write_or_warn(&[(
            "ERROR",
            format!("Refresh failed for {}: {}", address, error),
        )])
        .await;
    }

    async fn write_or_warn(&self, entries: &[(&str, String)]) {
        if let Err(e) = self.append(entries).await {
            warn!(path = %self.path.display(), error = %e, "Failed to write prediction log");
        }
    }

    /// All lines are written with a single `write_all` so concurrent
    /// refresh tasks do not interleave within one event.
    async fn append(&self, entries: &[(&str, String)]) -> Result<()> {
        let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
        let mut buffer = String::new();
        for (level, message) in entries {
            let _ = writeln!(buffer, "{} - {} - {}", timestamp, level, message);
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(buffer.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}
