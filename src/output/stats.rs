//! Run statistics printed to stdout

use crate::output::summary::RunSummary;

/// Prints run statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `summary` - The run summary to display
pub fn print_statistics(summary: &RunSummary) {
    println!("=== Run Statistics ===\n");

    println!("Overview:");
    println!("  Candidates: {}", summary.candidates);
    println!("  Fetched: {}", summary.successes);
    println!("  Failed: {}", summary.failures);
    if summary.cancelled {
        println!("  Cancelled: {} (run was interrupted)", summary.cancelled_units);
    }
    println!(
        "  Duration: {:.2}s (peak {} in flight)",
        summary.duration.as_secs_f64(),
        summary.peak_in_flight
    );
    println!();

    println!("Graph:");
    println!("  Nodes: {}", summary.nodes);
    println!("  Edges: {}", summary.edges);
    println!(
        "  References outside candidate set: {}",
        summary.dropped_references
    );
    println!();

    if !summary.most_referenced.is_empty() {
        println!("Most Referenced:");
        for (id, count) in &summary.most_referenced {
            println!("  {}: {}", id, count);
        }
        println!();
    }

    if !summary.failed.is_empty() {
        println!("Failed Entities ({}):", summary.failed.len());
        for failed in &summary.failed {
            println!(
                "  - {} after {} attempts: {}",
                failed.entity_id, failed.attempts_made, failed.last_error
            );
        }
        println!();
    }

    println!(
        "Success Rate: {:.1}% ({} / {} entities fetched)",
        summary.success_rate(),
        summary.successes,
        summary.candidates
    );
}
