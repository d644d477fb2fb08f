//! Markdown summary generation
//!
//! This module generates human-readable markdown summaries of a run,
//! including fetch statistics, graph size, and the list of failed entities.

use crate::output::summary::RunSummary;
use crate::output::{create_parent_dir, OutputResult};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Generates a markdown summary file
///
/// # Arguments
///
/// * `summary` - The run summary data
/// * `output_path` - Path where the markdown file should be written
pub fn generate_markdown_summary(summary: &RunSummary, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_summary(summary);

    create_parent_dir(output_path)?;
    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a run summary as markdown
pub fn format_markdown_summary(summary: &RunSummary) -> String {
    let mut md = String::new();

    md.push_str("# LinkWeave Run Summary\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!(
        "- **Started**: {}\n",
        summary.started_at.to_rfc3339()
    ));
    md.push_str(&format!(
        "- **Finished**: {}\n",
        summary.finished_at.to_rfc3339()
    ));
    md.push_str(&format!(
        "- **Duration**: {:.2} seconds\n",
        summary.duration.as_secs_f64()
    ));
    let status = if summary.cancelled {
        "Cancelled"
    } else {
        "Completed"
    };
    md.push_str(&format!("- **Status**: {}\n", status));
    if let Some(hash) = &summary.config_hash {
        md.push_str(&format!("- **Config Hash**: {}\n", hash));
    }
    md.push('\n');

    // Fetch statistics
    md.push_str("## Fetch Statistics\n\n");
    md.push_str("| Metric | Value |\n");
    md.push_str("|--------|-------|\n");
    md.push_str(&format!("| Candidates | {} |\n", summary.candidates));
    md.push_str(&format!("| Fetched | {} |\n", summary.successes));
    md.push_str(&format!("| Failed | {} |\n", summary.failures));
    md.push_str(&format!("| Cancelled | {} |\n", summary.cancelled_units));
    md.push_str(&format!("| Success Rate | {:.2}% |\n", summary.success_rate()));
    md.push_str(&format!("| Peak In Flight | {} |\n", summary.peak_in_flight));
    md.push('\n');

    // Graph statistics
    md.push_str("## Graph\n\n");
    md.push_str(&format!("- **Nodes**: {}\n", summary.nodes));
    md.push_str(&format!("- **Edges**: {}\n", summary.edges));
    md.push_str(&format!(
        "- **Nodes Without Content**: {}\n",
        summary.bare_nodes
    ));
    md.push_str(&format!(
        "- **References Outside Candidate Set**: {}\n",
        summary.dropped_references
    ));
    md.push('\n');

    if !summary.most_referenced.is_empty() {
        md.push_str("## Most Referenced Entities\n\n");
        md.push_str("| Entity | References |\n");
        md.push_str("|--------|------------|\n");
        for (id, count) in &summary.most_referenced {
            md.push_str(&format!("| {} | {} |\n", id, count));
        }
        md.push('\n');
    }

    if !summary.failed.is_empty() {
        md.push_str("## Failed Entities\n\n");
        md.push_str("| Entity | Attempts | Last Error |\n");
        md.push_str("|--------|----------|------------|\n");
        for failed in &summary.failed {
            md.push_str(&format!(
                "| {} | {} | {} |\n",
                failed.entity_id,
                failed.attempts_made,
                failed.last_error.to_string().replace('|', "\\|")
            ));
        }
        md.push('\n');
    }

    md
}
