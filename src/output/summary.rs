//! Run summary data

use crate::crawler::RunReport;
use crate::entity::EntityId;
use crate::graph::{AssemblyStats, EntityGraph, FailedEntity};
use chrono::{DateTime, Utc};
use std::time::Duration;

/// How many of the most referenced entities a summary lists
const TOP_REFERENCED: usize = 10;

/// Summary statistics for a run
#[derive(Debug, Clone)]
pub struct RunSummary {
    // Run metadata
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub duration: Duration,
    pub config_hash: Option<String>,
    pub cancelled: bool,

    // Fetch statistics
    pub candidates: usize,
    pub successes: usize,
    pub failures: usize,
    pub cancelled_units: usize,
    pub peak_in_flight: usize,

    // Graph statistics
    pub nodes: usize,
    pub edges: usize,
    pub bare_nodes: usize,
    pub dropped_references: usize,

    // Details
    pub failed: Vec<FailedEntity>,
    pub most_referenced: Vec<(EntityId, usize)>,
}

impl RunSummary {
    /// Collects a summary from a finished run
    pub fn new(
        report: &RunReport,
        graph: &EntityGraph,
        stats: &AssemblyStats,
        started_at: DateTime<Utc>,
    ) -> Self {
        let mut failed = stats.failed.clone();
        failed.sort_by(|a, b| a.entity_id.cmp(&b.entity_id));

        Self {
            started_at,
            finished_at: Utc::now(),
            duration: report.elapsed,
            config_hash: None,
            cancelled: report.cancelled,
            candidates: report.outcomes.len(),
            successes: stats.successes,
            failures: stats.failures,
            cancelled_units: stats.cancelled,
            peak_in_flight: report.peak_in_flight,
            nodes: graph.node_count(),
            edges: graph.edge_count(),
            bare_nodes: graph.bare_node_count(),
            dropped_references: stats.dropped_references,
            failed,
            most_referenced: graph
                .most_referenced(TOP_REFERENCED)
                .into_iter()
                .map(|(id, count)| (id.clone(), count))
                .collect(),
        }
    }

    pub fn with_config_hash(mut self, hash: impl Into<String>) -> Self {
        self.config_hash = Some(hash.into());
        self
    }

    /// Percentage of candidates fetched successfully
    pub fn success_rate(&self) -> f64 {
        if self.candidates == 0 {
            return 0.0;
        }
        (self.successes as f64 / self.candidates as f64) * 100.0
    }
}
