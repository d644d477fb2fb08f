//! Configuration module for LinkWeave
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use linkweave::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("linkweave.toml")).unwrap();
//! println!("Fetching with {} concurrent units", config.fetch.max_concurrency);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, FetchConfig, OutputConfig, SourceConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
