//! Integration tests for the query pipeline using wiremock.
//!
//! These tests verify the pipeline against a mock upstream, covering cache
//! TTL behavior, pagination collection, local filter/sort/paginate
//! semantics, relation expansion, and error propagation.

use serde_json::{json, Value};
use std::collections::BTreeSet;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use holonet_core::HolonetError;
use holonet_pipeline::{Catalog, CatalogConfig, QuerySpec, Resource, SortOrder};

// =============================================================================
// Test Helpers
// =============================================================================

async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

fn create_catalog(server: &MockServer) -> Catalog {
    catalog_with_ttl(server.uri(), Duration::from_secs(60))
}

fn catalog_with_ttl(base_uri: String, ttl: Duration) -> Catalog {
    Catalog::new(CatalogConfig {
        base_url: format!("{base_uri}/api"),
        cache_ttl: ttl,
        request_timeout: Duration::from_secs(2),
    })
    .unwrap()
}

fn default_spec() -> QuerySpec {
    QuerySpec::default_page()
}

fn spec_with_q(q: &str) -> QuerySpec {
    QuerySpec::new(Some(q.to_string()), None, SortOrder::Asc, 1, 10, None).unwrap()
}

fn expand_set(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|n| n.to_string()).collect()
}

fn collection_page(results: Value, next: Option<String>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "count": results.as_array().map(Vec::len).unwrap_or(0),
        "next": next,
        "results": results,
    }))
}

// =============================================================================
// Cache Behavior
// =============================================================================

#[tokio::test]
async fn test_cached_url_is_fetched_once_within_ttl() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/api/people/1/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "Luke Skywalker" })))
        .expect(1)
        .mount(&server)
        .await;

    let catalog = create_catalog(&server);
    let none = BTreeSet::new();

    let first = catalog.detail(Resource::People, 1, &none).await.unwrap();
    let second = catalog.detail(Resource::People, 1, &none).await.unwrap();

    assert_eq!(first.result, second.result);
}

#[tokio::test]
async fn test_expired_entry_triggers_exactly_one_new_fetch() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/api/people/1/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "Luke Skywalker" })))
        .expect(2)
        .mount(&server)
        .await;

    let catalog = catalog_with_ttl(server.uri(), Duration::from_millis(50));
    let none = BTreeSet::new();

    catalog.detail(Resource::People, 1, &none).await.unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    catalog.detail(Resource::People, 1, &none).await.unwrap();
}

#[tokio::test]
async fn test_cache_reset_forces_refetch() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/api/people/1/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "Luke Skywalker" })))
        .expect(2)
        .mount(&server)
        .await;

    let catalog = create_catalog(&server);
    let none = BTreeSet::new();

    catalog.detail(Resource::People, 1, &none).await.unwrap();
    catalog.cache().clear().await;
    catalog.detail(Resource::People, 1, &none).await.unwrap();
}

// =============================================================================
// Collection Queries
// =============================================================================

#[tokio::test]
async fn test_text_filter_over_single_page() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/api/films/"))
        .respond_with(collection_page(
            json!([{ "title": "A New Hope" }, { "title": "The Empire Strikes Back" }]),
            None,
        ))
        .mount(&server)
        .await;

    let catalog = create_catalog(&server);
    let envelope = catalog
        .list(Resource::Films, &spec_with_q("hope"))
        .await
        .unwrap();

    assert_eq!(envelope.resource, "films");
    assert_eq!(envelope.count, 1);
    assert_eq!(envelope.results, vec![json!({ "title": "A New Hope" })]);
    assert_eq!(envelope.q.as_deref(), Some("hope"));
}

#[tokio::test]
async fn test_collector_follows_next_links_until_target() {
    let server = setup_mock_server().await;

    let page1: Vec<Value> = (0..10).map(|i| json!({ "name": format!("p{i}") })).collect();
    let page2: Vec<Value> = (10..15).map(|i| json!({ "name": format!("p{i}") })).collect();

    Mock::given(method("GET"))
        .and(path("/api/people/"))
        .and(query_param_is_missing("page"))
        .respond_with(collection_page(
            json!(page1),
            Some(format!("{}/api/people/?page=2", server.uri())),
        ))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/people/"))
        .and(query_param("page", "2"))
        .respond_with(collection_page(json!(page2), None))
        .mount(&server)
        .await;

    let catalog = create_catalog(&server);
    let spec = QuerySpec::new(None, None, SortOrder::Asc, 2, 10, None).unwrap();
    let envelope = catalog.list(Resource::People, &spec).await.unwrap();

    assert_eq!(envelope.count, 15);
    assert_eq!(envelope.results.len(), 5);
    assert_eq!(envelope.results[0]["name"], "p10");
}

#[tokio::test]
async fn test_collector_stops_once_page_is_covered() {
    let server = setup_mock_server().await;

    let page1: Vec<Value> = (0..10).map(|i| json!({ "name": format!("p{i}") })).collect();

    Mock::given(method("GET"))
        .and(path("/api/people/"))
        .and(query_param_is_missing("page"))
        .respond_with(collection_page(
            json!(page1),
            Some(format!("{}/api/people/?page=2", server.uri())),
        ))
        .mount(&server)
        .await;

    // The first page already covers page=1/limit=10; the next link must
    // not be followed.
    Mock::given(method("GET"))
        .and(path("/api/people/"))
        .and(query_param("page", "2"))
        .respond_with(collection_page(json!([{ "name": "extra" }]), None))
        .expect(0)
        .mount(&server)
        .await;

    let catalog = create_catalog(&server);
    let envelope = catalog
        .list(Resource::People, &default_spec())
        .await
        .unwrap();

    assert_eq!(envelope.count, 10);
}

#[tokio::test]
async fn test_collector_respects_upstream_page_cap() {
    let server = setup_mock_server().await;

    // An endless pagination chain: every page links to the next one.
    for page in 1..=12u32 {
        let mut mock = Mock::given(method("GET")).and(path("/api/people/"));
        mock = if page == 1 {
            mock.and(query_param_is_missing("page"))
        } else {
            mock.and(query_param("page", page.to_string()))
        };
        mock.respond_with(collection_page(
            json!([{ "name": format!("p{page}") }]),
            Some(format!("{}/api/people/?page={}", server.uri(), page + 1)),
        ))
        .mount(&server)
        .await;
    }

    let catalog = create_catalog(&server);
    let spec = QuerySpec::new(None, None, SortOrder::Asc, 5, 10, None).unwrap();
    let envelope = catalog.list(Resource::People, &spec).await.unwrap();

    // Ten upstream pages of one record each, then the cap stops the walk.
    assert_eq!(envelope.count, 10);
}

#[tokio::test]
async fn test_empty_search_falls_back_to_unfiltered_collection() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/api/planets/"))
        .and(query_param("search", "tat"))
        .respond_with(collection_page(json!([]), None))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/planets/"))
        .and(query_param_is_missing("search"))
        .respond_with(collection_page(
            json!([{ "name": "Tatooine" }, { "name": "Alderaan" }]),
            None,
        ))
        .mount(&server)
        .await;

    let catalog = create_catalog(&server);
    let envelope = catalog
        .list(Resource::Planets, &spec_with_q("tat"))
        .await
        .unwrap();

    assert_eq!(envelope.count, 1);
    assert_eq!(envelope.results[0]["name"], "Tatooine");
}

#[tokio::test]
async fn test_sort_and_paginate_through_pipeline() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/api/people/"))
        .respond_with(collection_page(
            json!([
                { "name": "Chewbacca" },
                { "name": "Anakin Skywalker" },
                { "name": "Beru Lars" },
            ]),
            None,
        ))
        .mount(&server)
        .await;

    let catalog = create_catalog(&server);
    let spec = QuerySpec::new(
        None,
        Some("name".to_string()),
        SortOrder::Desc,
        1,
        2,
        None,
    )
    .unwrap();
    let envelope = catalog.list(Resource::People, &spec).await.unwrap();

    assert_eq!(envelope.count, 3);
    let names: Vec<&str> = envelope
        .results
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Chewbacca", "Beru Lars"]);
}

#[tokio::test]
async fn test_invalid_sort_field_fails_with_allowed_set() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/api/people/"))
        .respond_with(collection_page(json!([{ "name": "Luke" }]), None))
        .mount(&server)
        .await;

    let catalog = create_catalog(&server);
    let spec = QuerySpec::new(
        None,
        Some("not_a_real_field".to_string()),
        SortOrder::Asc,
        1,
        10,
        None,
    )
    .unwrap();

    let result = catalog.list(Resource::People, &spec).await;
    match result {
        Err(HolonetError::InvalidSortField { field, allowed }) => {
            assert_eq!(field, "not_a_real_field");
            assert!(allowed.contains(&"name"));
        }
        other => panic!("expected InvalidSortField, got {other:?}"),
    }
}

// =============================================================================
// Expansion
// =============================================================================

#[tokio::test]
async fn test_detail_expands_homeworld() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/api/people/1/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "Luke Skywalker",
            "homeworld": format!("{}/api/planets/1/", server.uri()),
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/planets/1/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "Tatooine",
            "climate": "arid",
            "population": "200000",
        })))
        .mount(&server)
        .await;

    let catalog = create_catalog(&server);
    let envelope = catalog
        .detail(Resource::People, 1, &expand_set(&["homeworld"]))
        .await
        .unwrap();

    assert_eq!(envelope.result["homeworld"]["name"], "Tatooine");
    assert_eq!(envelope.result["homeworld"]["climate"], "arid");
}

#[tokio::test]
async fn test_list_expansion_projects_film_summaries() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/api/people/"))
        .respond_with(collection_page(
            json!([{
                "name": "Luke Skywalker",
                "films": [format!("{}/api/films/1/", server.uri())],
            }]),
            None,
        ))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/films/1/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "title": "A New Hope",
            "episode_id": 4,
            "release_date": "1977-05-25",
            "opening_crawl": "It is a period of civil war.",
        })))
        .mount(&server)
        .await;

    let catalog = create_catalog(&server);
    let spec = QuerySpec::new(None, None, SortOrder::Asc, 1, 10, Some("films")).unwrap();
    let envelope = catalog.list(Resource::People, &spec).await.unwrap();

    assert_eq!(
        envelope.results[0]["films"],
        json!([{ "title": "A New Hope", "episode": 4, "release_date": "1977-05-25" }])
    );
    assert_eq!(envelope.expand, vec!["films"]);
}

#[tokio::test]
async fn test_empty_species_renders_human_on_detail() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/api/people/1/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "Luke Skywalker",
            "species": [],
        })))
        .mount(&server)
        .await;

    let catalog = create_catalog(&server);
    let envelope = catalog
        .detail(Resource::People, 1, &expand_set(&["species"]))
        .await
        .unwrap();

    assert_eq!(envelope.result["species"], json!([{ "name": "Human" }]));
}

#[tokio::test]
async fn test_unknown_expand_names_are_ignored() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/api/people/1/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "Luke Skywalker" })))
        .mount(&server)
        .await;

    let catalog = create_catalog(&server);
    let envelope = catalog
        .detail(Resource::People, 1, &expand_set(&["warp_drives"]))
        .await
        .unwrap();

    assert_eq!(envelope.result, json!({ "name": "Luke Skywalker" }));
}

#[tokio::test]
async fn test_failed_relation_fetch_fails_whole_request() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/api/people/1/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "Luke Skywalker",
            "films": [
                format!("{}/api/films/1/", server.uri()),
                format!("{}/api/films/2/", server.uri()),
            ],
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/films/1/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "title": "A New Hope" })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/films/2/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let catalog = create_catalog(&server);
    let result = catalog
        .detail(Resource::People, 1, &expand_set(&["films"]))
        .await;

    assert!(
        matches!(result, Err(HolonetError::UpstreamStatus { status: 500 })),
        "partial results must never be returned"
    );
}

// =============================================================================
// Error Propagation
// =============================================================================

#[tokio::test]
async fn test_detail_maps_upstream_404_to_not_found() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/api/people/999/"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&server)
        .await;

    let catalog = create_catalog(&server);
    let result = catalog.detail(Resource::People, 999, &BTreeSet::new()).await;

    match result {
        Err(HolonetError::NotFound { resource, id }) => {
            assert_eq!(resource, "people");
            assert_eq!(id.as_deref(), Some("999"));
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn test_upstream_error_status_fails_request_and_is_not_cached() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/api/films/"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .mount(&server)
        .await;

    let catalog = create_catalog(&server);
    let result = catalog.list(Resource::Films, &default_spec()).await;

    assert!(matches!(
        result,
        Err(HolonetError::UpstreamStatus { status: 503 })
    ));
    assert_eq!(catalog.cache().len().await, 0, "failed fetches must not be cached");
}

#[tokio::test]
async fn test_transport_failure_fails_request_and_is_not_cached() {
    // Nothing listens on the discard port; the connection is refused.
    let catalog = catalog_with_ttl("http://127.0.0.1:9".to_string(), Duration::from_secs(60));

    let result = catalog.list(Resource::People, &default_spec()).await;

    assert!(matches!(result, Err(HolonetError::Unreachable { .. })));
    assert_eq!(catalog.cache().len().await, 0);
}

#[tokio::test]
async fn test_slow_upstream_times_out() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/api/people/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "results": [], "next": null }))
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&server)
        .await;

    let catalog = Catalog::new(CatalogConfig {
        base_url: format!("{}/api", server.uri()),
        cache_ttl: Duration::from_secs(60),
        request_timeout: Duration::from_millis(200),
    })
    .unwrap();

    let result = catalog.list(Resource::People, &default_spec()).await;
    assert!(matches!(result, Err(HolonetError::Unreachable { .. })));
}

#[tokio::test]
async fn test_transient_failure_self_heals_without_invalidation() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/api/people/1/"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/people/1/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "Luke Skywalker" })))
        .mount(&server)
        .await;

    let catalog = create_catalog(&server);
    let none = BTreeSet::new();

    let first = catalog.detail(Resource::People, 1, &none).await;
    assert!(first.is_err());

    let second = catalog.detail(Resource::People, 1, &none).await.unwrap();
    assert_eq!(second.result["name"], "Luke Skywalker");
}
