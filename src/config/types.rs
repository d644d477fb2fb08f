use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for LinkWeave
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub source: SourceConfig,
    pub output: OutputConfig,
}

/// Fetch pipeline behavior configuration
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct FetchConfig {
    /// Maximum number of fetch units holding a request at once
    #[serde(rename = "max-concurrency", default = "default_max_concurrency")]
    pub max_concurrency: u32,

    /// Attempts per entity before it is recorded as a failure
    #[serde(rename = "max-attempts", default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Timeout for a single request (milliseconds)
    #[serde(rename = "per-attempt-timeout-ms", default = "default_per_attempt_timeout_ms")]
    pub per_attempt_timeout_ms: u64,

    /// Constant delay between attempts (milliseconds)
    #[serde(rename = "retry-delay-ms", default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

fn default_max_concurrency() -> u32 {
    10
}

fn default_max_attempts() -> u32 {
    3
}

fn default_per_attempt_timeout_ms() -> u64 {
    10_000
}

fn default_retry_delay_ms() -> u64 {
    1_000
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
            max_attempts: default_max_attempts(),
            per_attempt_timeout_ms: default_per_attempt_timeout_ms(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

impl FetchConfig {
    pub fn per_attempt_timeout(&self) -> Duration {
        Duration::from_millis(self.per_attempt_timeout_ms)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the client
    #[serde(rename = "client-name")]
    pub client_name: String,

    /// Version of the client
    #[serde(rename = "client-version")]
    pub client_version: String,

    /// URL with information about the client
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for client-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Formats the header value: `Name/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.client_name, self.client_version, self.contact_url, self.contact_email
        )
    }
}

/// Where entities and their documents come from
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Endpoint of the remote content API
    #[serde(rename = "api-url")]
    pub api_url: String,

    /// Document listing the candidate entities
    #[serde(rename = "candidates-path")]
    pub candidates_path: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path of the persisted graph (`.graphml` or `.json`)
    #[serde(rename = "graph-path")]
    pub graph_path: String,

    /// Path to the markdown summary file
    #[serde(rename = "summary-path")]
    pub summary_path: String,
}
