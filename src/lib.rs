//! LinkWeave: a cross-reference graph builder
//!
//! This crate fetches the source document of every entity in a fixed candidate
//! set from a remote content service, extracts the cross-references between
//! them, and assembles the result into a directed graph annotated with the
//! content size of each entity.

pub mod config;
pub mod crawler;
pub mod entity;
pub mod graph;
pub mod outcome;
pub mod output;

use std::time::Duration;
use thiserror::Error;

/// Main error type for LinkWeave operations
#[derive(Debug, Error)]
pub enum LinkweaveError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No entity could be fetched ({failed} of {attempted} failed)")]
    NoSuccessfulFetches { attempted: usize, failed: usize },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Errors raised while fetching a single entity
///
/// `Transport`, `Timeout` and `ContentMissing` are retried by the fetcher;
/// `Cancelled` ends the fetch unit immediately.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("Transport error: {message}")]
    Transport { message: String },

    #[error("Request timed out after {after:?}")]
    Timeout { after: Duration },

    #[error("Content missing: {reason}")]
    ContentMissing { reason: String },

    #[error("Fetch cancelled")]
    Cancelled,
}

impl FetchError {
    /// Creates a transport error from anything displayable
    pub fn transport(message: impl std::fmt::Display) -> Self {
        Self::Transport {
            message: message.to_string(),
        }
    }

    /// Creates a content-missing error with the given reason
    pub fn content_missing(reason: impl Into<String>) -> Self {
        Self::ContentMissing {
            reason: reason.into(),
        }
    }

    /// Returns true if another attempt may succeed
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::Cancelled)
    }
}

/// Result type alias for LinkWeave operations
pub type Result<T> = std::result::Result<T, LinkweaveError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for a single remote request
pub type FetchResult<T> = std::result::Result<T, FetchError>;

// Re-export commonly used types
pub use config::Config;
pub use entity::{CandidateSet, EntityId};
pub use graph::{EntityGraph, GraphAssembler};
pub use outcome::FetchOutcome;
