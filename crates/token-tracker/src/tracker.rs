//! Tracked token addresses and their periodic refresh tasks.
//!
//! Each refresh task loops while its address is still tracked: run the
//! pipeline, publish a [`RefreshReport`], append to the prediction log,
//! then sleep for the refresh interval. Membership is only checked at the
//! top of the loop.

use crate::log::PredictionLog;
use crate::pipeline::{Pipeline, PipelineOutcome};
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use fortune_core::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Result of asking to track an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackOutcome {
    Added,
    AlreadyTracked,
    /// Blank input.
    Invalid,
}

/// Result of one refresh iteration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RefreshStatus {
    Updated(PipelineOutcome),
    Failed { error: String },
}

/// Published after every refresh iteration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshReport {
    pub address: String,
    /// 1-based iteration count for this address's task.
    pub iteration: u64,
    pub status: RefreshStatus,
    pub refreshed_at: DateTime<Utc>,
}

/// Set of tracked token addresses with one background refresh task per
/// address.
pub struct Tracker {
    pipeline: Arc<Pipeline>,
    log: Arc<PredictionLog>,
    interval: Duration,
    /// Tracked addresses in insertion order.
    tracked: Arc<RwLock<Vec<String>>>,
    /// Refresh task per address.
    refresh_tasks: Arc<DashMap<String, JoinHandle<()>>>,
    /// Channel for refresh notifications.
    report_tx: broadcast::Sender<RefreshReport>,
}

impl Tracker {
    pub fn new(pipeline: Arc<Pipeline>, log: PredictionLog, interval: Duration) -> Self {
        let (report_tx, _) = broadcast::channel(256);
        Self {
            pipeline,
            log: Arc::new(log),
            interval,
            tracked: Arc::new(RwLock::new(Vec::new())),
            refresh_tasks: Arc::new(DashMap::new()),
            report_tx,
        }
    }

    /// Subscribe to refresh reports.
    pub fn subscribe(&self) -> broadcast::Receiver<RefreshReport> {
        self.report_tx.subscribe()
    }

    pub fn pipeline(&self) -> &Arc<Pipeline> {
        &self.pipeline
    }

    /// Add an address to the tracked set.
    pub async fn track(&self, address: &str) -> TrackOutcome {
        let address = address.trim();
        if address.is_empty() {
            return TrackOutcome::Invalid;
        }

        let mut tracked = self.tracked.write().await;
        if tracked.iter().any(|a| a == address) {
            debug!(address, "Address already tracked");
            return TrackOutcome::AlreadyTracked;
        }
        tracked.push(address.to_string());
        info!(address, "Started tracking token");
        TrackOutcome::Added
    }

    /// Remove an address. Its refresh task exits at the next loop top.
    pub async fn untrack(&self, address: &str) -> bool {
        let address = address.trim();
        let mut tracked = self.tracked.write().await;
        let before = tracked.len();
        tracked.retain(|a| a != address);
        let removed = tracked.len() != before;
        if removed {
            info!(address, "Stopped tracking token");
        }
        removed
    }

    /// Tracked addresses in insertion order.
    pub async fn tracked(&self) -> Vec<String> {
        self.tracked.read().await.clone()
    }

    pub async fn is_tracked(&self, address: &str) -> bool {
        self.tracked.read().await.iter().any(|a| a == address)
    }

    pub async fn len(&self) -> usize {
        self.tracked.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tracked.read().await.is_empty()
    }

    /// Whether a refresh task for the address is still running.
    pub fn is_refreshing(&self, address: &str) -> bool {
        self.refresh_tasks
            .get(address)
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }

    /// Number of refresh tasks still running.
    pub fn active_refreshes(&self) -> usize {
        self.refresh_tasks
            .iter()
            .filter(|entry| !entry.value().is_finished())
            .count()
    }

    /// Spawn the refresh task for a tracked address. Returns `false` when the
    /// address is not tracked or its task is already running.
    pub async fn start_refresh(&self, address: &str) -> bool {
        if !self.is_tracked(address).await {
            warn!(address, "Cannot refresh an untracked address");
            return false;
        }

        // Drop handles of tasks that ended without removing themselves
        self.refresh_tasks.retain(|_, handle| !handle.is_finished());

        match self.refresh_tasks.entry(address.to_string()) {
            Entry::Occupied(entry) if !entry.get().is_finished() => {
                debug!(address, "Refresh already running");
                false
            }
            entry => {
                let worker = self.clone_for_task();
                let task_address = address.to_string();
                let handle = tokio::spawn(async move {
                    worker.refresh_loop(task_address).await;
                });
                entry.insert(handle);
                info!(address, interval_secs = self.interval.as_secs(), "Started periodic refresh");
                true
            }
        }
    }

    /// Start refresh tasks for every tracked address. Returns how many new
    /// tasks were spawned.
    pub async fn start_refresh_all(&self) -> usize {
        let mut started = 0;
        for address in self.tracked().await {
            if self.start_refresh(&address).await {
                started += 1;
            }
        }
        started
    }

    /// Run the pipeline once for every tracked address, concurrently.
    pub async fn snapshot_all(&self) -> Vec<(String, Result<PipelineOutcome>)> {
        let addresses = self.tracked().await;
        let futures: Vec<_> = addresses
            .iter()
            .map(|address| self.pipeline.run(address))
            .collect();
        let results = futures_util::future::join_all(futures).await;
        addresses.into_iter().zip(results).collect()
    }

    /// Abort every refresh task.
    pub fn shutdown(&self) {
        for entry in self.refresh_tasks.iter() {
            entry.value().abort();
        }
        self.refresh_tasks.clear();
        info!("Stopped all refresh tasks");
    }

    // Private methods

    fn clone_for_task(&self) -> Self {
        Self {
            pipeline: self.pipeline.clone(),
            log: self.log.clone(),
            interval: self.interval,
            tracked: self.tracked.clone(),
            refresh_tasks: self.refresh_tasks.clone(),
            report_tx: self.report_tx.clone(),
        }
    }

    async fn refresh_loop(&self, address: String) {
        let mut iteration = 0u64;

        while self.is_tracked(&address).await {
            iteration += 1;
            debug!(address = %address, iteration, "Refreshing token");

            let status = match self.pipeline.run(&address).await {
                Ok(outcome) => {
                    self.log.record(&outcome).await;
                    RefreshStatus::Updated(outcome)
                }
                Err(e) => {
                    warn!(address = %address, error = %e, "Refresh failed");
                    self.log.record_failure(&address, &e.to_string()).await;
                    RefreshStatus::Failed {
                        error: e.to_string(),
                    }
                }
            };

            // No subscribers is fine; the log still has the result
            let _ = self.report_tx.send(RefreshReport {
                address: address.clone(),
                iteration,
                status,
                refreshed_at: Utc::now(),
            });

            tokio::time::sleep(self.interval).await;
        }

        self.refresh_tasks.remove(&address);
        info!(address = %address, iterations = iteration, "Refresh loop stopped");
    }
}
