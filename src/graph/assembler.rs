//! Graph assembly from fetch outcomes
//!
//! The assembler is the only writer of the graph under construction. It takes
//! `&mut self`, so outcomes arriving from concurrent fetch units must be
//! funneled through one owner (collect first, or feed it from a single task).

use crate::entity::{CandidateSet, EntityId};
use crate::graph::EntityGraph;
use crate::outcome::FetchOutcome;
use crate::FetchError;
use std::collections::HashSet;

/// An entity that could not be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedEntity {
    pub entity_id: EntityId,
    pub last_error: FetchError,
    pub attempts_made: u32,
}

/// Counters collected while assembling
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssemblyStats {
    /// Distinct entities that were fetched
    pub successes: usize,

    /// Distinct entities that failed or were cancelled
    pub failures: usize,

    /// Failures caused by cancellation
    pub cancelled: usize,

    /// References dropped because their target is not a candidate
    pub dropped_references: usize,

    /// Outcomes for an entity that had already been assembled
    pub repeated_outcomes: usize,

    /// Failed entities in the order they were assembled
    pub failed: Vec<FailedEntity>,
}

impl AssemblyStats {
    /// Number of distinct entities assembled
    pub fn attempted(&self) -> usize {
        self.successes + self.failures
    }
}

/// Builds an [`EntityGraph`] from outcomes in any order
pub struct GraphAssembler {
    candidates: CandidateSet,
    graph: EntityGraph,
    stats: AssemblyStats,
    assembled: HashSet<EntityId>,
}

impl GraphAssembler {
    pub fn new(candidates: CandidateSet) -> Self {
        Self {
            candidates,
            graph: EntityGraph::new(),
            stats: AssemblyStats::default(),
            assembled: HashSet::new(),
        }
    }

    /// Adds one outcome to the graph
    ///
    /// A success adds its entity as a node (first success wins) and an edge
    /// to every referenced candidate. References outside the candidate set
    /// are dropped. A failure adds nothing to the graph and is recorded in
    /// the stats. Ingesting an outcome for an already assembled entity
    /// changes neither the graph nor the counts.
    pub fn ingest(&mut self, outcome: &FetchOutcome) {
        let entity_id = outcome.entity_id();
        if !self.assembled.insert(entity_id.clone()) {
            tracing::debug!("Ignoring repeated outcome for {}", entity_id);
            self.stats.repeated_outcomes += 1;
            return;
        }

        match outcome {
            FetchOutcome::Success {
                entity_id,
                referenced_ids,
                content_size,
                ..
            } => {
                self.stats.successes += 1;
                self.graph.add_node(entity_id, *content_size);

                for target in referenced_ids {
                    if self.candidates.contains(target) {
                        self.graph.add_edge(entity_id, target);
                    } else {
                        self.stats.dropped_references += 1;
                    }
                }
            }
            FetchOutcome::Failure {
                entity_id,
                last_error,
                attempts_made,
            } => {
                self.stats.failures += 1;
                if matches!(last_error, FetchError::Cancelled) {
                    self.stats.cancelled += 1;
                }
                self.stats.failed.push(FailedEntity {
                    entity_id: entity_id.clone(),
                    last_error: last_error.clone(),
                    attempts_made: *attempts_made,
                });
            }
        }
    }

    pub fn ingest_all<'a>(&mut self, outcomes: impl IntoIterator<Item = &'a FetchOutcome>) {
        for outcome in outcomes {
            self.ingest(outcome);
        }
    }

    pub fn graph(&self) -> &EntityGraph {
        &self.graph
    }

    pub fn stats(&self) -> &AssemblyStats {
        &self.stats
    }

    /// Consumes the assembler, returning the graph and its stats
    pub fn finish(self) -> (EntityGraph, AssemblyStats) {
        tracing::info!(
            "Assembled graph with {} nodes and {} edges ({} entities failed)",
            self.graph.node_count(),
            self.graph.edge_count(),
            self.stats.failures
        );
        (self.graph, self.stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(name: &str) -> EntityId {
        EntityId::new(name)
    }

    fn success(name: &str, refs: &[&str], size: usize) -> FetchOutcome {
        FetchOutcome::Success {
            entity_id: id(name),
            referenced_ids: refs.iter().map(|r| id(r)).collect(),
            content_size: size,
            attempts_made: 1,
        }
    }

    fn failure(name: &str) -> FetchOutcome {
        FetchOutcome::Failure {
            entity_id: id(name),
            last_error: FetchError::transport("HTTP 500"),
            attempts_made: 3,
        }
    }

    fn abc() -> CandidateSet {
        ["A", "B", "C"].into_iter().collect()
    }

    #[test]
    fn test_three_entity_scenario() {
        let mut assembler = GraphAssembler::new(abc());
        assembler.ingest_all(&[
            success("A", &["B", "X"], 120),
            success("B", &[], 80),
            failure("C"),
        ]);
        let (graph, stats) = assembler.finish();

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.content_size(&id("A")), Some(120));
        assert_eq!(graph.content_size(&id("B")), Some(80));
        assert!(graph.has_edge(&id("A"), &id("B")));
        assert_eq!(graph.edge_count(), 1);
        assert!(!graph.contains_node(&id("C")));
        assert!(!graph.contains_node(&id("X")));

        assert_eq!(stats.successes, 2);
        assert_eq!(stats.failures, 1);
        assert_eq!(stats.dropped_references, 1);
        assert_eq!(stats.failed[0].entity_id, id("C"));
        assert_eq!(stats.failed[0].attempts_made, 3);
    }

    #[test]
    fn test_order_independent() {
        let outcomes = vec![
            success("A", &["B", "C"], 1),
            success("B", &["A"], 2),
            failure("C"),
        ];

        let mut forward = GraphAssembler::new(abc());
        forward.ingest_all(&outcomes);
        let mut backward = GraphAssembler::new(abc());
        backward.ingest_all(outcomes.iter().rev());

        let (g1, s1) = forward.finish();
        let (g2, s2) = backward.finish();

        assert_eq!(g1.node_count(), g2.node_count());
        assert_eq!(g1.edge_count(), g2.edge_count());
        for (from, to) in g1.edges() {
            assert!(g2.has_edge(from, to));
        }
        assert_eq!(g1.content_size(&id("A")), g2.content_size(&id("A")));
        assert_eq!(s1.successes, s2.successes);
        assert_eq!(s1.failures, s2.failures);
    }

    #[test]
    fn test_reingesting_is_a_no_op() {
        let mut assembler = GraphAssembler::new(abc());
        let outcome = success("A", &["B"], 10);
        assembler.ingest(&outcome);
        assembler.ingest(&outcome);

        assert_eq!(assembler.graph().edge_count(), 1);
        assert_eq!(assembler.stats().successes, 1);
        assert_eq!(assembler.stats().repeated_outcomes, 1);
    }

    #[test]
    fn test_edge_to_failed_candidate_creates_bare_node() {
        let mut assembler = GraphAssembler::new(abc());
        assembler.ingest(&success("A", &["C"], 10));
        assembler.ingest(&failure("C"));

        let graph = assembler.graph();
        assert!(graph.has_edge(&id("A"), &id("C")));
        assert_eq!(graph.content_size(&id("C")), None);
        assert_eq!(graph.bare_node_count(), 1);
    }

    #[test]
    fn test_cancelled_failures_counted() {
        let mut assembler = GraphAssembler::new(abc());
        assembler.ingest(&FetchOutcome::Failure {
            entity_id: id("A"),
            last_error: FetchError::Cancelled,
            attempts_made: 0,
        });

        assert_eq!(assembler.stats().failures, 1);
        assert_eq!(assembler.stats().cancelled, 1);
        assert_eq!(assembler.graph().node_count(), 0);
    }

    #[test]
    fn test_edges_only_to_candidates() {
        let mut assembler = GraphAssembler::new(abc());
        assembler.ingest(&success("A", &["B", "Q", "R", "C"], 3));

        let (graph, stats) = assembler.finish();
        for (_, to) in graph.edges() {
            assert!(abc().contains(to));
        }
        assert_eq!(stats.dropped_references, 2);
    }
}
