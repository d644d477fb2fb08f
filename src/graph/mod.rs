//! Directed cross-reference graph
//!
//! Nodes are entities keyed by [`EntityId`] and carry the content size of the
//! entity's document; edges point from a document to the entities it
//! references.

mod assembler;

pub use assembler::{AssemblyStats, FailedEntity, GraphAssembler};

use crate::entity::EntityId;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::HashMap;

/// Node payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
    pub id: EntityId,

    /// Word count of the entity's document; `None` for a node that is only
    /// known as the target of a reference
    pub content_size: Option<usize>,
}

/// Directed graph of entities with at most one edge per ordered pair
#[derive(Debug, Clone, Default)]
pub struct EntityGraph {
    graph: DiGraph<GraphNode, ()>,
    index: HashMap<EntityId, NodeIndex>,
}

impl EntityGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node with its content size
    ///
    /// Returns true if the node gained its size attribute. A node that
    /// already has a size keeps the first one; a bare node is filled in.
    pub fn add_node(&mut self, id: &EntityId, content_size: usize) -> bool {
        let idx = self.ensure_node(id);
        let node = &mut self.graph[idx];
        if node.content_size.is_some() {
            return false;
        }
        node.content_size = Some(content_size);
        true
    }

    /// Returns the index of a node, creating a bare node if needed
    fn ensure_node(&mut self, id: &EntityId) -> NodeIndex {
        if let Some(&idx) = self.index.get(id) {
            return idx;
        }
        let idx = self.graph.add_node(GraphNode {
            id: id.clone(),
            content_size: None,
        });
        self.index.insert(id.clone(), idx);
        idx
    }

    /// Adds a directed edge, creating bare endpoint nodes as needed
    ///
    /// Returns false if the edge already existed.
    pub fn add_edge(&mut self, from: &EntityId, to: &EntityId) -> bool {
        let a = self.ensure_node(from);
        let b = self.ensure_node(to);
        if self.graph.find_edge(a, b).is_some() {
            return false;
        }
        self.graph.add_edge(a, b, ());
        true
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains_node(&self, id: &EntityId) -> bool {
        self.index.contains_key(id)
    }

    pub fn has_edge(&self, from: &EntityId, to: &EntityId) -> bool {
        match (self.index.get(from), self.index.get(to)) {
            (Some(&a), Some(&b)) => self.graph.find_edge(a, b).is_some(),
            _ => false,
        }
    }

    pub fn content_size(&self, id: &EntityId) -> Option<usize> {
        self.index
            .get(id)
            .and_then(|&idx| self.graph[idx].content_size)
    }

    /// Number of nodes without a content size
    pub fn bare_node_count(&self) -> usize {
        self.nodes().filter(|n| n.content_size.is_none()).count()
    }

    /// Nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.graph.node_weights()
    }

    /// Edges as `(source, target)` pairs in insertion order
    pub fn edges(&self) -> impl Iterator<Item = (&EntityId, &EntityId)> {
        self.graph.raw_edges().iter().map(move |edge| {
            (
                &self.graph[edge.source()].id,
                &self.graph[edge.target()].id,
            )
        })
    }

    /// Entities referenced by `id`
    pub fn references(&self, id: &EntityId) -> Vec<&EntityId> {
        self.neighbors(id, Direction::Outgoing)
    }

    /// Entities that reference `id`
    pub fn referrers(&self, id: &EntityId) -> Vec<&EntityId> {
        self.neighbors(id, Direction::Incoming)
    }

    fn neighbors(&self, id: &EntityId, direction: Direction) -> Vec<&EntityId> {
        let Some(&idx) = self.index.get(id) else {
            return Vec::new();
        };
        let mut ids: Vec<_> = self
            .graph
            .neighbors_directed(idx, direction)
            .map(|n| &self.graph[n].id)
            .collect();
        ids.sort();
        ids
    }

    /// The `limit` most referenced entities, ties broken by id
    pub fn most_referenced(&self, limit: usize) -> Vec<(&EntityId, usize)> {
        let mut ranked: Vec<_> = self
            .graph
            .node_indices()
            .map(|idx| {
                let in_degree = self.graph.neighbors_directed(idx, Direction::Incoming).count();
                (&self.graph[idx].id, in_degree)
            })
            .filter(|(_, in_degree)| *in_degree > 0)
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(limit);
        ranked
    }
}
