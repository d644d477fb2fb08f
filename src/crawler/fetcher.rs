//! Retrying document fetcher
//!
//! This module turns a sequence of single requests into one outcome per entity:
//! - Bounding every request with a per-attempt timeout
//! - Retrying transport errors, timeouts and missing content
//! - Waiting a constant delay between attempts
//! - Stopping at once when the run is cancelled

use crate::config::FetchConfig;
use crate::crawler::client::ContentClient;
use crate::crawler::extractor::extract_links;
use crate::entity::EntityId;
use crate::outcome::FetchOutcome;
use crate::FetchError;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Fetches one entity with timeout and retry
///
/// The fetcher holds no per-call state, so a single instance can serve any
/// number of concurrent fetch units.
///
/// # Retry Logic
///
/// | Condition | Action |
/// |-----------|--------|
/// | Document returned | Extract links → Success |
/// | Transport error (connect, non-2xx, bad JSON) | Retry after delay |
/// | Attempt timed out | Retry after delay |
/// | No revision content | Retry after delay |
/// | Cancelled | Immediate → Failure(Cancelled) |
/// | Attempts exhausted | Failure(last error) |
#[derive(Clone)]
pub struct RetryingFetcher {
    client: Arc<dyn ContentClient>,
    max_attempts: u32,
    per_attempt_timeout: Duration,
    retry_delay: Duration,
}

impl RetryingFetcher {
    pub fn new(client: Arc<dyn ContentClient>, config: &FetchConfig) -> Self {
        Self {
            client,
            max_attempts: config.max_attempts.max(1),
            per_attempt_timeout: config.per_attempt_timeout(),
            retry_delay: config.retry_delay(),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Fetches and parses one entity's document
    ///
    /// Cancellation is observed before each attempt, while waiting for the
    /// response, and during the retry delay.
    pub async fn fetch(&self, entity_id: &EntityId, cancel: &CancellationToken) -> FetchOutcome {
        let mut attempts_made = 0;
        let mut last_error = FetchError::transport("no attempt was made");

        while attempts_made < self.max_attempts {
            if cancel.is_cancelled() {
                return cancelled(entity_id, attempts_made);
            }
            attempts_made += 1;

            let attempt = tokio::select! {
                biased;
                _ = cancel.cancelled() => return cancelled(entity_id, attempts_made),
                result = tokio::time::timeout(self.per_attempt_timeout, self.client.request(entity_id)) => result,
            };

            let error = match attempt {
                Ok(Ok(content)) => {
                    let links = extract_links(&content);
                    tracing::debug!(
                        "Fetched {} on attempt {} ({} words, {} references)",
                        entity_id,
                        attempts_made,
                        links.content_size,
                        links.referenced_ids.len()
                    );
                    return FetchOutcome::Success {
                        entity_id: entity_id.clone(),
                        referenced_ids: links.referenced_ids,
                        content_size: links.content_size,
                        attempts_made,
                    };
                }
                Ok(Err(error)) => error,
                Err(_) => FetchError::Timeout {
                    after: self.per_attempt_timeout,
                },
            };

            if !error.is_retryable() {
                return FetchOutcome::Failure {
                    entity_id: entity_id.clone(),
                    last_error: error,
                    attempts_made,
                };
            }

            tracing::warn!(
                "Error for {} on attempt {}/{}: {}",
                entity_id,
                attempts_made,
                self.max_attempts,
                error
            );
            last_error = error;

            if attempts_made < self.max_attempts {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return cancelled(entity_id, attempts_made),
                    _ = tokio::time::sleep(self.retry_delay) => {}
                }
            }
        }

        tracing::warn!(
            "Failed to fetch {} after {} attempts: {}",
            entity_id,
            attempts_made,
            last_error
        );

        FetchOutcome::Failure {
            entity_id: entity_id.clone(),
            last_error,
            attempts_made,
        }
    }
}

fn cancelled(entity_id: &EntityId, attempts_made: u32) -> FetchOutcome {
    tracing::debug!("Fetch of {} cancelled after {} attempts", entity_id, attempts_made);
    FetchOutcome::Failure {
        entity_id: entity_id.clone(),
        last_error: FetchError::Cancelled,
        attempts_made,
    }
}
