//! Output module for persisting graphs and run summaries
//!
//! This module handles:
//! - Writing the assembled graph as GraphML or node-link JSON
//! - Generating markdown summaries of a run
//! - Printing run statistics to stdout

mod graphml;
mod json;
mod markdown;
pub mod stats;
mod summary;

pub use graphml::{format_graphml, write_graphml};
pub use json::{format_json, write_json};
pub use markdown::{format_markdown_summary, generate_markdown_summary};
pub use stats::print_statistics;
pub use summary::RunSummary;

use crate::graph::EntityGraph;
use std::path::Path;
use thiserror::Error;

/// Node attribute holding the content size, as named in persisted graphs
pub const CONTENT_SIZE_ATTR: &str = "length_of_content";

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("Failed to format output: {0}")]
    Format(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Persists a graph, choosing the format from the file extension
///
/// `.json` writes node-link JSON; anything else writes GraphML. Missing
/// parent directories are created.
pub fn write_graph(graph: &EntityGraph, path: &Path) -> OutputResult<()> {
    create_parent_dir(path)?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        write_json(graph, path)
    } else {
        write_graphml(graph, path)
    }?;

    tracing::info!(
        "Wrote graph ({} nodes, {} edges) to {}",
        graph.node_count(),
        graph.edge_count(),
        path.display()
    );
    Ok(())
}

pub(crate) fn create_parent_dir(path: &Path) -> OutputResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
