//! Node-link JSON export

use crate::entity::EntityId;
use crate::graph::EntityGraph;
use crate::output::{OutputError, OutputResult};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
struct NodeLinkGraph<'a> {
    directed: bool,
    multigraph: bool,
    nodes: Vec<JsonNode<'a>>,
    links: Vec<JsonLink<'a>>,
}

#[derive(Debug, Serialize)]
struct JsonNode<'a> {
    id: &'a EntityId,
    #[serde(skip_serializing_if = "Option::is_none")]
    length_of_content: Option<usize>,
}

#[derive(Debug, Serialize)]
struct JsonLink<'a> {
    source: &'a EntityId,
    target: &'a EntityId,
}

fn node_link(graph: &EntityGraph) -> NodeLinkGraph<'_> {
    let mut nodes: Vec<_> = graph
        .nodes()
        .map(|node| JsonNode {
            id: &node.id,
            length_of_content: node.content_size,
        })
        .collect();
    nodes.sort_by(|a, b| a.id.cmp(b.id));

    let mut links: Vec<_> = graph
        .edges()
        .map(|(source, target)| JsonLink { source, target })
        .collect();
    links.sort_by(|a, b| (a.source, a.target).cmp(&(b.source, b.target)));

    NodeLinkGraph {
        directed: true,
        multigraph: false,
        nodes,
        links,
    }
}

/// Writes a graph as pretty-printed node-link JSON
pub fn write_json(graph: &EntityGraph, path: &Path) -> OutputResult<()> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, &node_link(graph))
        .map_err(|e| OutputError::Write(e.to_string()))
}

/// Formats a graph as node-link JSON
pub fn format_json(graph: &EntityGraph) -> OutputResult<String> {
    serde_json::to_string_pretty(&node_link(graph)).map_err(|e| OutputError::Format(e.to_string()))
}
