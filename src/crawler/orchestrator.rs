//! Fetch orchestration - fan-out of fetch units over the candidate set
//!
//! This module contains the run loop that:
//! - Admits every candidate as an independent fetch unit
//! - Caps in-flight units with the shared [`ConcurrencyLimiter`]
//! - Collects outcomes in completion order
//! - Propagates cancellation and waits for every unit to unwind

use crate::config::FetchConfig;
use crate::crawler::client::ContentClient;
use crate::crawler::fetcher::RetryingFetcher;
use crate::crawler::limiter::ConcurrencyLimiter;
use crate::entity::{CandidateSet, EntityId};
use crate::outcome::FetchOutcome;
use crate::FetchError;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Called once per outcome, in completion order
pub type ProgressCallback = Arc<dyn Fn(&FetchOutcome) + Send + Sync>;

/// Everything a run produced
#[derive(Debug, Clone)]
pub struct RunReport {
    /// One outcome per candidate, in completion order
    pub outcomes: Vec<FetchOutcome>,

    /// Whether the run was cancelled before every unit finished on its own
    pub cancelled: bool,

    /// Wall-clock duration of the run
    pub elapsed: Duration,

    /// Highest number of units that held a request slot at once
    pub peak_in_flight: usize,
}

impl RunReport {
    pub fn success_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.outcomes.len() - self.success_count()
    }

    pub fn cancelled_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_cancelled()).count()
    }

    /// Failed outcomes, cancelled ones included
    pub fn failures(&self) -> impl Iterator<Item = &FetchOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }
}

/// Runs fetch units for a candidate set with bounded parallelism
pub struct FetchOrchestrator {
    fetcher: Arc<RetryingFetcher>,
    limiter: ConcurrencyLimiter,
    progress_callback: Option<ProgressCallback>,
}

impl FetchOrchestrator {
    /// Creates an orchestrator over the given content client
    ///
    /// # Arguments
    ///
    /// * `client` - The remote content client shared by all units
    /// * `config` - Concurrency, attempt, timeout and delay settings
    pub fn new(client: Arc<dyn ContentClient>, config: &FetchConfig) -> Self {
        Self {
            fetcher: Arc::new(RetryingFetcher::new(client, config)),
            limiter: ConcurrencyLimiter::new(config.max_concurrency as usize),
            progress_callback: None,
        }
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub fn limiter(&self) -> &ConcurrencyLimiter {
        &self.limiter
    }

    /// Fetches every candidate and returns one outcome per candidate
    ///
    /// A terminal failure of one unit never stops the others. When `cancel`
    /// fires, every unit that has not finished stops at its next suspension
    /// point and reports a cancelled failure; this call returns only after all
    /// of them have done so.
    ///
    /// If the returned future is dropped before completion, the task group is
    /// dropped with it and all remaining units are aborted.
    pub async fn run(&self, candidates: &CandidateSet, cancel: CancellationToken) -> RunReport {
        let total = candidates.len();
        tracing::info!(
            "Starting fetch of {} entities with at most {} in flight",
            total,
            self.limiter.capacity()
        );

        let run_token = cancel.child_token();
        let start_time = Instant::now();

        let mut units = JoinSet::new();
        let mut pending: HashMap<tokio::task::Id, EntityId> = HashMap::with_capacity(total);

        for entity_id in candidates.iter() {
            let fetcher = Arc::clone(&self.fetcher);
            let limiter = self.limiter.clone();
            let token = run_token.clone();
            let id = entity_id.clone();

            let handle = units.spawn(async move {
                let _permit = match limiter.acquire(&token).await {
                    Ok(permit) => permit,
                    Err(error) => {
                        return FetchOutcome::Failure {
                            entity_id: id,
                            last_error: error,
                            attempts_made: 0,
                        }
                    }
                };
                fetcher.fetch(&id, &token).await
            });
            pending.insert(handle.id(), entity_id.clone());
        }

        let mut outcomes = Vec::with_capacity(total);
        let mut failures = 0;

        while let Some(joined) = units.join_next_with_id().await {
            let outcome = match joined {
                Ok((task_id, outcome)) => {
                    pending.remove(&task_id);
                    outcome
                }
                Err(join_error) => {
                    let Some(entity_id) = pending.remove(&join_error.id()) else {
                        tracing::error!("Unknown fetch unit failed: {}", join_error);
                        continue;
                    };
                    tracing::error!("Fetch unit for {} failed: {}", entity_id, join_error);
                    let last_error = if join_error.is_cancelled() {
                        FetchError::Cancelled
                    } else {
                        FetchError::transport(format!("fetch unit panicked: {}", join_error))
                    };
                    FetchOutcome::Failure {
                        entity_id,
                        last_error,
                        attempts_made: 0,
                    }
                }
            };

            if !outcome.is_success() {
                failures += 1;
            }
            if let Some(ref callback) = self.progress_callback {
                callback(&outcome);
            }
            outcomes.push(outcome);

            let done = outcomes.len();
            if done % 10 == 0 || done == total {
                let rate = done as f64 / start_time.elapsed().as_secs_f64().max(f64::EPSILON);
                tracing::info!(
                    "Progress: {}/{} entities done, {} failed, {:.2} entities/sec",
                    done,
                    total,
                    failures,
                    rate
                );
            }
        }

        // Only units that actually stopped early make the run cancelled
        let cancelled = outcomes.iter().any(FetchOutcome::is_cancelled);
        if cancelled {
            tracing::info!(
                "Run cancelled: all {} fetch units have stopped",
                outcomes.len()
            );
        }

        let report = RunReport {
            outcomes,
            cancelled,
            elapsed: start_time.elapsed(),
            peak_in_flight: self.limiter.peak_in_flight(),
        };

        tracing::info!(
            "Fetch completed: {} succeeded, {} failed in {:?}",
            report.success_count(),
            report.failure_count(),
            report.elapsed
        );

        report
    }
}
