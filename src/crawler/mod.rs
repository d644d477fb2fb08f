//! Crawler module for entity document fetching and processing
//!
//! This module contains the core fetching logic, including:
//! - The remote content client
//! - Per-entity retry with timeout
//! - Cross-reference extraction
//! - Concurrency limiting and fan-out over the candidate set

mod client;
mod extractor;
mod fetcher;
mod limiter;
mod orchestrator;

pub use client::{build_http_client, parse_revision_content, ContentClient, WikiClient};
pub use extractor::{count_words, extract_links, ExtractedLinks};
pub use fetcher::RetryingFetcher;
pub use limiter::{ConcurrencyLimiter, LimiterPermit};
pub use orchestrator::{FetchOrchestrator, ProgressCallback, RunReport};

use crate::config::{Config, FetchConfig};
use crate::entity::CandidateSet;
use crate::graph::{AssemblyStats, EntityGraph, GraphAssembler};
use crate::LinkweaveError;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// The products of one complete run
#[derive(Debug)]
pub struct GraphRun {
    pub report: RunReport,
    pub graph: EntityGraph,
    pub stats: AssemblyStats,
}

/// Fetches every candidate and assembles the cross-reference graph
///
/// Outcomes are collected first and assembled afterwards by a single
/// assembler, so the graph never sees concurrent writers.
///
/// # Returns
///
/// * `Ok(GraphRun)` - The run finished or was cancelled; failures are data
/// * `Err(LinkweaveError::NoSuccessfulFetches)` - Not a single candidate could
///   be fetched, which points at a systemic problem such as an unreachable
///   service
pub async fn build_graph(
    client: Arc<dyn ContentClient>,
    config: &FetchConfig,
    candidates: &CandidateSet,
    cancel: CancellationToken,
) -> Result<GraphRun, LinkweaveError> {
    let orchestrator = FetchOrchestrator::new(client, config);
    let report = orchestrator.run(candidates, cancel).await;

    let mut assembler = GraphAssembler::new(candidates.clone());
    assembler.ingest_all(&report.outcomes);
    let (graph, stats) = assembler.finish();

    if !report.cancelled && stats.attempted() > 0 && stats.successes == 0 {
        return Err(LinkweaveError::NoSuccessfulFetches {
            attempted: stats.attempted(),
            failed: stats.failures,
        });
    }

    Ok(GraphRun {
        report,
        graph,
        stats,
    })
}

/// Runs a complete fetch against the configured content service
///
/// # Example
///
/// ```no_run
/// use linkweave::config::load_config;
/// use linkweave::crawler::crawl;
/// use linkweave::entity::load_candidates;
/// use std::path::Path;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("linkweave.toml"))?;
/// let extraction = load_candidates(Path::new(&config.source.candidates_path))?;
/// let run = crawl(&config, &extraction.candidates, CancellationToken::new()).await?;
/// println!("{} nodes", run.graph.node_count());
/// # Ok(())
/// # }
/// ```
pub async fn crawl(
    config: &Config,
    candidates: &CandidateSet,
    cancel: CancellationToken,
) -> Result<GraphRun, LinkweaveError> {
    let client = WikiClient::from_config(config)?;
    build_graph(Arc::new(client), &config.fetch, candidates, cancel).await
}
