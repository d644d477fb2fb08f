//! Integration tests for the fetch pipeline
//!
//! These tests use wiremock to stand in for the content API and exercise
//! the full fetch-and-assemble cycle end-to-end.

use linkweave::config::{Config, FetchConfig, OutputConfig, SourceConfig, UserAgentConfig};
use linkweave::crawler::{build_graph, crawl, ContentClient, WikiClient};
use linkweave::entity::{extract_candidates, CandidateSet, EntityId};
use linkweave::output::write_graph;
use linkweave::{FetchError, LinkweaveError};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_PATH: &str = "/w/api.php";

/// Creates a test configuration pointing at the mock server
fn create_test_config(api_url: &str, graph_path: &str) -> Config {
    Config {
        fetch: FetchConfig {
            max_concurrency: 4,
            max_attempts: 3,
            per_attempt_timeout_ms: 2_000,
            retry_delay_ms: 10,
        },
        user_agent: UserAgentConfig {
            client_name: "TestWeaver".to_string(),
            client_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        source: SourceConfig {
            api_url: api_url.to_string(),
            candidates_path: "./candidates.txt".to_string(),
        },
        output: OutputConfig {
            graph_path: graph_path.to_string(),
            summary_path: "./test_summary.md".to_string(),
        },
    }
}

/// Builds a query response carrying one revision of `content`
fn revision_body(title: &str, content: &str) -> serde_json::Value {
    serde_json::json!({
        "batchcomplete": "",
        "query": {
            "pages": {
                "101": {
                    "pageid": 101,
                    "ns": 0,
                    "title": title,
                    "revisions": [
                        { "slots": { "main": { "contentmodel": "wikitext", "*": content } } }
                    ]
                }
            }
        }
    })
}

async fn mount_document(server: &MockServer, title: &str, content: &str) {
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .and(query_param("titles", title))
        .respond_with(ResponseTemplate::new(200).set_body_json(revision_body(title, content)))
        .mount(server)
        .await;
}

fn wiki_client(server: &MockServer) -> WikiClient {
    let config = create_test_config(&format!("{}{}", server.uri(), API_PATH), "graph.graphml");
    WikiClient::from_config(&config).expect("Failed to build client")
}

fn fast_fetch_config() -> FetchConfig {
    FetchConfig {
        max_concurrency: 4,
        max_attempts: 3,
        per_attempt_timeout_ms: 2_000,
        retry_delay_ms: 10,
    }
}

#[tokio::test]
async fn test_client_sends_revision_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(API_PATH))
        .and(query_param("action", "query"))
        .and(query_param("titles", "Ada_Lovelace"))
        .and(query_param("format", "json"))
        .and(query_param("prop", "revisions"))
        .and(query_param("rvprop", "content"))
        .and(query_param("rvslots", "main"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(revision_body("Ada Lovelace", "Worked with [[Charles_Babbage]]")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = wiki_client(&server);
    let content = client
        .request(&EntityId::new("Ada Lovelace"))
        .await
        .expect("Request should succeed");

    assert_eq!(content, "Worked with [[Charles_Babbage]]");
}

#[tokio::test]
async fn test_client_reports_missing_revisions() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(API_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "query": { "pages": { "-1": { "ns": 0, "title": "Nobody", "missing": "" } } }
        })))
        .mount(&server)
        .await;

    let client = wiki_client(&server);
    let result = client.request(&EntityId::new("Nobody")).await;

    assert!(matches!(result, Err(FetchError::ContentMissing { .. })));
}

#[tokio::test]
async fn test_client_maps_error_status_to_transport() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(API_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = wiki_client(&server);
    let result = client.request(&EntityId::new("A")).await;

    assert_eq!(result, Err(FetchError::transport("HTTP 500")));
}

#[tokio::test]
async fn test_full_run_three_entities() {
    let server = MockServer::start().await;

    mount_document(&server, "A", "A knows [[B]] and [[X|someone else]] well").await;
    mount_document(&server, "B", "B stands alone").await;
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .and(query_param("titles", "C"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let candidates: CandidateSet = ["A", "B", "C"].into_iter().collect();
    let client: Arc<dyn ContentClient> = Arc::new(wiki_client(&server));

    let run = build_graph(
        client,
        &fast_fetch_config(),
        &candidates,
        CancellationToken::new(),
    )
    .await
    .expect("Run should succeed");

    assert_eq!(run.report.outcomes.len(), 3);
    assert_eq!(run.report.success_count(), 2);
    assert_eq!(run.report.failure_count(), 1);
    assert!(!run.report.cancelled);

    let graph = &run.graph;
    assert_eq!(graph.node_count(), 2);
    assert_eq!(graph.edge_count(), 1);
    assert!(graph.has_edge(&EntityId::new("A"), &EntityId::new("B")));
    assert_eq!(graph.content_size(&EntityId::new("A")), Some(7));
    assert_eq!(graph.content_size(&EntityId::new("B")), Some(3));
    assert!(!graph.contains_node(&EntityId::new("C")));
    assert!(!graph.contains_node(&EntityId::new("X")));

    assert_eq!(run.stats.failed.len(), 1);
    assert_eq!(run.stats.failed[0].entity_id, EntityId::new("C"));
    assert_eq!(run.stats.failed[0].attempts_made, 3);
    assert_eq!(
        run.stats.failed[0].last_error,
        FetchError::transport("HTTP 503")
    );
}

#[tokio::test]
async fn test_transient_error_is_retried() {
    let server = MockServer::start().await;

    // First request fails, every later one succeeds
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_document(&server, "Flaky", "eventually [[Flaky]] answers").await;

    let candidates: CandidateSet = ["Flaky"].into_iter().collect();
    let client: Arc<dyn ContentClient> = Arc::new(wiki_client(&server));

    let run = build_graph(
        client,
        &fast_fetch_config(),
        &candidates,
        CancellationToken::new(),
    )
    .await
    .expect("Run should succeed");

    let outcome = &run.report.outcomes[0];
    assert!(outcome.is_success());
    assert_eq!(outcome.attempts_made(), 2);

    // Self references are kept
    assert!(run
        .graph
        .has_edge(&EntityId::new("Flaky"), &EntityId::new("Flaky")));
}

#[tokio::test]
async fn test_no_successful_fetches_is_fatal() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(API_PATH))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let candidates: CandidateSet = ["A", "B"].into_iter().collect();
    let client: Arc<dyn ContentClient> = Arc::new(wiki_client(&server));

    let result = build_graph(
        client,
        &fast_fetch_config(),
        &candidates,
        CancellationToken::new(),
    )
    .await;

    match result {
        Err(LinkweaveError::NoSuccessfulFetches { attempted, failed }) => {
            assert_eq!(attempted, 2);
            assert_eq!(failed, 2);
        }
        other => panic!("expected NoSuccessfulFetches, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn test_cancelled_run_is_not_fatal() {
    let server = MockServer::start().await;

    let candidates: CandidateSet = ["A", "B"].into_iter().collect();
    let client: Arc<dyn ContentClient> = Arc::new(wiki_client(&server));
    let token = CancellationToken::new();
    token.cancel();

    let run = build_graph(client, &fast_fetch_config(), &candidates, token)
        .await
        .expect("A cancelled run still returns its partial graph");

    assert!(run.report.cancelled);
    assert_eq!(run.report.cancelled_count(), 2);
    assert_eq!(run.graph.node_count(), 0);
}

#[tokio::test]
async fn test_crawl_from_candidate_document_to_graph_file() {
    let server = MockServer::start().await;

    mount_document(&server, "Ada_Lovelace", "Corresponded with [[Charles Babbage]]").await;
    mount_document(
        &server,
        "Charles_Babbage",
        "Designed the engine & wrote to [[Ada Lovelace|Ada]]",
    )
    .await;

    let extraction = extract_candidates("* [[Ada Lovelace]]\n* [[Charles Babbage]]\n* [[File:Engine.png]]");
    assert_eq!(extraction.candidates.len(), 2);

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let graph_path = dir.path().join("out").join("graph.graphml");
    let config = create_test_config(
        &format!("{}{}", server.uri(), API_PATH),
        &graph_path.to_string_lossy(),
    );

    let run = crawl(&config, &extraction.candidates, CancellationToken::new())
        .await
        .expect("Crawl should succeed");

    assert_eq!(run.graph.node_count(), 2);
    assert_eq!(run.graph.edge_count(), 2);
    assert!(run.graph.has_edge(
        &EntityId::new("Ada_Lovelace"),
        &EntityId::new("Charles_Babbage")
    ));

    write_graph(&run.graph, &graph_path).expect("Failed to write graph");

    let written = std::fs::read_to_string(&graph_path).expect("Failed to read graph");
    assert!(written.contains("<graphml"));
    assert!(written.contains("length_of_content"));
    assert!(written.contains(r#"source="Ada_Lovelace""#));
    assert!(written.contains(r#"target="Charles_Babbage""#));

    let json_path = dir.path().join("graph.json");
    write_graph(&run.graph, &json_path).expect("Failed to write JSON graph");
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).expect("Failed to read JSON"))
            .expect("Graph JSON should parse");
    assert_eq!(json["directed"], true);
    assert_eq!(json["nodes"].as_array().map(|n| n.len()), Some(2));
    assert_eq!(json["links"].as_array().map(|l| l.len()), Some(2));
}
