//! LinkWeave main entry point
//!
//! This is the command-line interface for the LinkWeave cross-reference graph builder.

use chrono::Utc;
use clap::Parser;
use linkweave::config::{load_config_with_hash, Config};
use linkweave::crawler::crawl;
use linkweave::entity::{load_candidates, CandidateExtraction};
use linkweave::output::{generate_markdown_summary, print_statistics, write_graph, RunSummary};
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// LinkWeave: a cross-reference graph builder
///
/// LinkWeave fetches the document of every entity listed in a source
/// document, extracts the references between them, and writes the result
/// as a directed graph annotated with each entity's content size.
#[derive(Parser, Debug)]
#[command(name = "linkweave")]
#[command(version = "1.0.0")]
#[command(about = "A cross-reference graph builder", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show the candidate set without fetching anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    let extraction = load_candidates(Path::new(&config.source.candidates_path))?;

    if cli.dry_run {
        handle_dry_run(&config, &extraction);
    } else {
        handle_run(config, config_hash, extraction).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("linkweave=info,warn"),
            1 => EnvFilter::new("linkweave=debug,info"),
            2 => EnvFilter::new("linkweave=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows what would be fetched
fn handle_dry_run(config: &Config, extraction: &CandidateExtraction) {
    println!("=== LinkWeave Dry Run ===\n");

    println!("Fetch Configuration:");
    println!("  Max concurrency: {}", config.fetch.max_concurrency);
    println!("  Max attempts: {}", config.fetch.max_attempts);
    println!(
        "  Per-attempt timeout: {}ms",
        config.fetch.per_attempt_timeout_ms
    );
    println!("  Retry delay: {}ms", config.fetch.retry_delay_ms);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nSource:");
    println!("  API: {}", config.source.api_url);
    println!("  Candidates: {}", config.source.candidates_path);

    println!("\nOutput:");
    println!("  Graph: {}", config.output.graph_path);
    println!("  Summary: {}", config.output.summary_path);

    println!(
        "\nCandidates: {} unique of {} references",
        extraction.candidates.len(),
        extraction.total_matches
    );
    if !extraction.duplicates.is_empty() {
        println!("Duplicates ({}):", extraction.duplicates.len());
        for id in &extraction.duplicates {
            println!("  - {}", id);
        }
    }

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would fetch {} entities",
        extraction.candidates.len()
    );
}

/// Handles the main fetch-and-assemble operation
async fn handle_run(
    config: Config,
    config_hash: String,
    extraction: CandidateExtraction,
) -> Result<(), Box<dyn std::error::Error>> {
    let candidates = extraction.candidates;
    let started_at = Utc::now();

    // Ctrl-C cancels outstanding fetch units; the run still unwinds cleanly
    let cancel = CancellationToken::new();
    let interrupt = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Interrupt received, cancelling outstanding fetches");
                cancel.cancel();
            }
        })
    };

    let result = crawl(&config, &candidates, cancel).await;
    interrupt.abort();

    let run = match result {
        Ok(run) => run,
        Err(e) => {
            tracing::error!("Run failed: {}", e);
            return Err(e.into());
        }
    };

    write_graph(&run.graph, Path::new(&config.output.graph_path))?;

    let summary =
        RunSummary::new(&run.report, &run.graph, &run.stats, started_at).with_config_hash(config_hash);
    generate_markdown_summary(&summary, Path::new(&config.output.summary_path))?;
    tracing::info!("Summary written to: {}", config.output.summary_path);

    print_statistics(&summary);

    if run.report.cancelled {
        tracing::warn!("Run was cancelled; the graph is partial");
    }

    Ok(())
}
