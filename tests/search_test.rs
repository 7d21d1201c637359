//! End-to-end tests against a mock Solr server

use mockito::{Matcher, Server, ServerGuard};
use solr_client::{
    DismaxQuery, InMemoryScopeConfig, InMemoryServerStore, SearchMethod, SearchQuery,
    SearchServerConfig, ServerRecord, ServerResolver, SolrClient, SolrError,
};
use std::sync::Arc;

/// Helper to build a server record pointing at the mock server
fn record_for(server: &ServerGuard, id: i64, name: &str) -> ServerRecord {
    let address = server.host_with_port();
    let (host, port) = address.split_once(':').unwrap();
    ServerRecord::new(id, name, host)
        .with_port(port.parse().unwrap())
        .with_path("")
}

/// Helper to build a direct server configuration for the mock server
fn direct_config(server: &ServerGuard) -> SearchServerConfig {
    let client = SolrClient::from_url(&server.url()).unwrap();
    SearchServerConfig::direct(Arc::new(client))
}

/// Helper to build a resolver over single-record stores
fn resolver_for(server: &ServerGuard, id: i64, name: &str) -> ServerResolver {
    let store = InMemoryServerStore::new();
    store.insert(record_for(server, id, name));
    ServerResolver::new(Arc::new(store), Arc::new(InMemoryScopeConfig::new()))
}

#[tokio::test]
async fn test_select_round_trip_merges_highlights() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/select")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("q".into(), "web framework".into()),
            Matcher::UrlEncoded("start".into(), "0".into()),
            Matcher::UrlEncoded("rows".into(), "10".into()),
            Matcher::UrlEncoded("wt".into(), "json".into()),
            Matcher::UrlEncoded("json.nl".into(), "map".into()),
            Matcher::UrlEncoded("defType".into(), "func".into()),
            Matcher::UrlEncoded("hl".into(), "true".into()),
            Matcher::UrlEncoded("hl.fl".into(), "title".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "responseHeader": {"status": 0, "QTime": 4},
                "response": {"numFound": 2, "start": 0, "docs": [
                    {"id": "1", "title": "Axum web framework"},
                    {"id": "2", "title": "Actix web"}
                ]},
                "highlighting": {
                    "1": {"title": ["<em>Axum</em> web framework"]}
                }
            }"#,
        )
        .create_async()
        .await;

    let config = direct_config(&server);
    let mut query = SearchQuery::new().highlight_field("title");

    let results = query
        .search("web framework", 10, 0, Some(&config))
        .await
        .unwrap()
        .unwrap();

    mock.assert_async().await;
    assert_eq!(results.num_found, 2);
    assert_eq!(query.result_count(), 2);
    assert_eq!(query.results().len(), 2);

    let highlighted = query.results()[0].get("highlighted").unwrap();
    assert_eq!(
        highlighted["title"][0],
        serde_json::json!("<em>Axum</em> web framework")
    );
    assert!(query.results()[1].get("highlighted").is_none());
}

#[tokio::test]
async fn test_highlights_match_numeric_document_ids() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/select")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "response": {"numFound": 1, "docs": [{"id": 41, "title": "Pizza"}]},
                "highlighting": {"41": {"title": ["<em>Pizza</em>"]}}
            }"#,
        )
        .create_async()
        .await;

    let config = direct_config(&server);
    let mut query = SearchQuery::new();
    query.search("pizza", 10, 0, Some(&config)).await.unwrap();

    assert!(query.results()[0].get("highlighted").is_some());
}

#[tokio::test]
async fn test_select_posts_form_body() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/select")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("q".into(), "rust".into()),
            Matcher::UrlEncoded("rows".into(), "5".into()),
            Matcher::UrlEncoded("defType".into(), "func".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"response": {"numFound": 0, "docs": []}}"#)
        .create_async()
        .await;

    let config = direct_config(&server).with_method(SearchMethod::Post);
    let mut query = SearchQuery::new();
    let results = query.search("rust", 5, 0, Some(&config)).await.unwrap();

    mock.assert_async().await;
    assert_eq!(results.unwrap().num_found, 0);
}

#[tokio::test]
async fn test_dismax_parameters_reach_the_wire() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/select")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("defType".into(), "edismax".into()),
            Matcher::UrlEncoded("qf".into(), "body^2 title^5".into()),
            Matcher::UrlEncoded("mm".into(), "2<75%".into()),
            Matcher::UrlEncoded("tie".into(), "0.1".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"response": {"numFound": 0, "docs": []}}"#)
        .create_async()
        .await;

    let config = direct_config(&server);
    let mut query = DismaxQuery::new()
        .add_query_field("title", 5.0)
        .add_query_field("body", 2.0)
        .minimum_should_match(2, Some("75%"))
        .tie_breaker(0.1);

    query.search("rust", 10, 0, Some(&config)).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_facet_counts_round_trip() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/select")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("facet".into(), "true".into()),
            Matcher::UrlEncoded("facet.field".into(), "category".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "response": {"numFound": 3, "docs": []},
                "facet_counts": {
                    "facet_queries": {"price:[0 TO 100]": 2},
                    "facet_fields": {"category": {"books": 2, "music": 1}},
                    "facet_ranges": {}
                }
            }"#,
        )
        .create_async()
        .await;

    let config = direct_config(&server);
    let mut query = SearchQuery::new().facet_field("category");
    query.search("anything", 10, 0, Some(&config)).await.unwrap();

    let counts = query.result_facets("category").unwrap();
    assert_eq!(counts["books"], serde_json::json!(2));
    assert_eq!(counts["music"], serde_json::json!(1));
    assert!(query.result_facets("missing").is_none());
    assert!(query.result_facet_fields().unwrap().contains_key("category"));
}

#[tokio::test]
async fn test_resolver_caches_live_handles() {
    let mut server = Server::new_async().await;
    let ping = server
        .mock("GET", "/admin/ping")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status": "OK"}"#)
        .expect(1)
        .create_async()
        .await;

    let resolver = resolver_for(&server, 1, "main");

    let first = resolver.resolve("1", None).await.unwrap().unwrap();
    let second = resolver.resolve("main", None).await.unwrap().unwrap();

    ping.assert_async().await;
    assert!(Arc::ptr_eq(&first, &second));
}

#[tokio::test]
async fn test_resolver_caches_dead_servers() {
    let mut server = Server::new_async().await;
    let ping = server
        .mock("GET", "/admin/ping")
        .match_query(Matcher::Any)
        .with_status(500)
        .expect(1)
        .create_async()
        .await;

    let resolver = resolver_for(&server, 1, "main");

    assert!(resolver.resolve("1", None).await.unwrap().is_none());
    assert!(resolver.resolve("1", None).await.unwrap().is_none());
    ping.assert_async().await;
}

#[tokio::test]
async fn test_invalidate_forces_a_fresh_probe() {
    let mut server = Server::new_async().await;
    let ping = server
        .mock("GET", "/admin/ping")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status": "OK"}"#)
        .expect(2)
        .create_async()
        .await;

    let resolver = resolver_for(&server, 1, "main");

    assert!(resolver.resolve("1", None).await.unwrap().is_some());
    assert!(resolver.invalidate(1));
    assert!(resolver.resolve("1", None).await.unwrap().is_some());
    ping.assert_async().await;
}

#[tokio::test]
async fn test_scope_fallback_resolution() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/admin/ping")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status": "OK"}"#)
        .create_async()
        .await;

    let store = InMemoryServerStore::new();
    store.insert(record_for(&server, 4, "content_core"));
    let scope_config = InMemoryScopeConfig::new();
    scope_config.set("content", "solr_server", 4);

    let resolver = ServerResolver::new(Arc::new(store), Arc::new(scope_config));
    let handle = resolver
        .resolve("content", Some("solr_server"))
        .await
        .unwrap();
    assert!(handle.is_some());
}

#[tokio::test]
async fn test_scoped_search_end_to_end() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/admin/ping")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status": "OK"}"#)
        .create_async()
        .await;
    let select = server
        .mock("GET", "/select")
        .match_query(Matcher::UrlEncoded("q".into(), "rust".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"response": {"numFound": 1, "docs": [{"id": "1"}]}}"#)
        .create_async()
        .await;

    let store = InMemoryServerStore::new();
    store.insert(record_for(&server, 4, "content_core"));
    let scope_config = InMemoryScopeConfig::new();
    scope_config.set("content", "solr_server", 4);
    let resolver = ServerResolver::new(Arc::new(store), Arc::new(scope_config));

    let mut query = SearchQuery::new()
        .with_resolver(Arc::new(resolver))
        .with_server_config(SearchServerConfig::scoped("content", "solr_server"));

    let results = query.search("rust", 10, 0, None).await.unwrap().unwrap();
    select.assert_async().await;
    assert_eq!(results.num_found, 1);
}

#[tokio::test]
async fn test_unreachable_scoped_server_is_unavailable() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/admin/ping")
        .match_query(Matcher::Any)
        .with_status(503)
        .create_async()
        .await;

    let store = InMemoryServerStore::new();
    store.insert(record_for(&server, 4, "content_core"));
    let scope_config = InMemoryScopeConfig::new();
    scope_config.set("content", "solr_server", 4);
    let resolver = ServerResolver::new(Arc::new(store), Arc::new(scope_config));

    let mut query = SearchQuery::new()
        .with_resolver(Arc::new(resolver))
        .with_server_config(SearchServerConfig::scoped("content", "solr_server"));

    let err = query.search("rust", 10, 0, None).await.unwrap_err();
    assert!(err.is_unavailable());
}

#[tokio::test]
async fn test_connection_refused_maps_to_unavailable() {
    let client = SolrClient::from_url("http://127.0.0.1:9").unwrap();
    let config = SearchServerConfig::direct(Arc::new(client));

    let mut query = SearchQuery::new();
    let err = query.search("rust", 10, 0, Some(&config)).await.unwrap_err();
    assert!(err.is_unavailable());
}

#[tokio::test]
async fn test_error_status_is_a_request_error() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/select")
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body("Internal Server Error")
        .create_async()
        .await;

    let config = direct_config(&server);
    let mut query = SearchQuery::new();
    let err = query.search("rust", 10, 0, Some(&config)).await.unwrap_err();

    assert!(matches!(err, SolrError::Request(message) if message.contains("500")));
}

#[tokio::test]
async fn test_unparseable_body_is_a_decode_error() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/select")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html>not json</html>")
        .create_async()
        .await;

    let config = direct_config(&server);
    let mut query = SearchQuery::new();
    let err = query.search("rust", 10, 0, Some(&config)).await.unwrap_err();

    assert!(matches!(err, SolrError::Decode(_)));
    assert!(query.last_result().is_none());
}

#[tokio::test]
async fn test_ping_reports_liveness() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/admin/ping")
        .match_query(Matcher::UrlEncoded("wt".into(), "json".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status": "OK"}"#)
        .create_async()
        .await;

    let client = SolrClient::from_url(&server.url()).unwrap();
    assert!(client.ping().await);
}

#[tokio::test]
async fn test_ping_swallows_failure_statuses() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/admin/ping")
        .match_query(Matcher::Any)
        .with_status(503)
        .create_async()
        .await;

    let client = SolrClient::from_url(&server.url()).unwrap();
    assert!(!client.ping().await);
}

#[tokio::test]
async fn test_commit_posts_to_the_update_handler() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/update")
        .match_query(Matcher::UrlEncoded("wt".into(), "json".into()))
        .match_body(Matcher::Json(serde_json::json!({"commit": {}})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"responseHeader": {"status": 0, "QTime": 10}}"#)
        .create_async()
        .await;

    let client = SolrClient::from_url(&server.url()).unwrap();
    client.commit().await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_credentials_are_sent_as_basic_auth() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/admin/ping")
        .match_query(Matcher::Any)
        .match_header("authorization", Matcher::Regex("^Basic ".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status": "OK"}"#)
        .create_async()
        .await;

    let record = record_for(&server, 1, "main").with_credentials("reader", "secret");
    let client = SolrClient::from_record(&record).unwrap();

    assert!(client.ping().await);
    mock.assert_async().await;
}
