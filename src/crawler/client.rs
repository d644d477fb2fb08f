//! Remote content client
//!
//! This module wraps the remote content API:
//! - Building the HTTP client with a proper user agent string
//! - Issuing one revision-content query per entity
//! - Classifying transport failures and responses without content
//!
//! The client makes exactly one request per call. Timeouts and retries belong
//! to the [`RetryingFetcher`](super::RetryingFetcher).

use crate::config::{Config, UserAgentConfig};
use crate::entity::EntityId;
use crate::{FetchError, FetchResult, LinkweaveError};
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;
use url::Url;

/// Source of raw entity documents
#[async_trait]
pub trait ContentClient: Send + Sync {
    /// Fetches the current document of one entity
    async fn request(&self, entity_id: &EntityId) -> FetchResult<String>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
///
/// # Example
///
/// ```no_run
/// use linkweave::config::UserAgentConfig;
/// use linkweave::crawler::build_http_client;
///
/// let config = UserAgentConfig {
///     client_name: "LinkWeave".to_string(),
///     client_version: "1.0".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Client for a MediaWiki-style query API
#[derive(Debug, Clone)]
pub struct WikiClient {
    client: Client,
    api_url: Url,
}

impl WikiClient {
    pub fn new(client: Client, api_url: Url) -> Self {
        Self { client, api_url }
    }

    /// Builds the client from the `[user-agent]` and `[source]` sections
    pub fn from_config(config: &Config) -> Result<Self, LinkweaveError> {
        let client = build_http_client(&config.user_agent)?;
        let api_url = Url::parse(&config.source.api_url)?;
        Ok(Self::new(client, api_url))
    }

    /// Returns the full query URL for an entity
    pub fn query_url(&self, entity_id: &EntityId) -> Url {
        let mut url = self.api_url.clone();
        url.query_pairs_mut()
            .append_pair("action", "query")
            .append_pair("titles", entity_id.as_str())
            .append_pair("format", "json")
            .append_pair("prop", "revisions")
            .append_pair("rvprop", "content")
            .append_pair("rvslots", "main")
            .append_pair("redirects", "1");
        url
    }
}

#[async_trait]
impl ContentClient for WikiClient {
    async fn request(&self, entity_id: &EntityId) -> FetchResult<String> {
        let url = self.query_url(entity_id);
        tracing::trace!("Requesting {}", url);

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_connect() {
                FetchError::transport(format!("connection failed: {}", e))
            } else {
                FetchError::transport(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::transport(format!("HTTP {}", status.as_u16())));
        }

        let body = response.text().await.map_err(FetchError::transport)?;
        parse_revision_content(&body)
    }
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    query: Option<QueryBody>,
}

#[derive(Debug, Deserialize)]
struct QueryBody {
    #[serde(default)]
    pages: BTreeMap<String, PageEntry>,
}

#[derive(Debug, Deserialize)]
struct PageEntry {
    #[serde(default)]
    revisions: Vec<Revision>,
}

#[derive(Debug, Deserialize)]
struct Revision {
    slots: Option<RevisionSlots>,
}

#[derive(Debug, Deserialize)]
struct RevisionSlots {
    main: Option<MainSlot>,
}

#[derive(Debug, Deserialize)]
struct MainSlot {
    #[serde(rename = "*")]
    content: Option<String>,
}

/// Extracts the document body from a query response
///
/// Malformed JSON is a transport error. A well-formed response without
/// revision content is `ContentMissing`, which the fetcher retries.
pub fn parse_revision_content(body: &str) -> FetchResult<String> {
    let response: QueryResponse = serde_json::from_str(body)
        .map_err(|e| FetchError::transport(format!("malformed JSON: {}", e)))?;

    let query = response
        .query
        .ok_or_else(|| FetchError::content_missing("response has no query section"))?;

    // A single title resolves to a single page
    let page = query
        .pages
        .into_values()
        .next()
        .ok_or_else(|| FetchError::content_missing("response lists no pages"))?;

    page.revisions
        .into_iter()
        .next()
        .and_then(|revision| revision.slots)
        .and_then(|slots| slots.main)
        .and_then(|main| main.content)
        .ok_or_else(|| FetchError::content_missing("no revisions found"))
}
