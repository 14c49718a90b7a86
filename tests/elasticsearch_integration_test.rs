// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use site_search::error::SearchBackendError;
use site_search::models::query::{QueryBody, SortDirective};
use site_search::models::search::{DisplayOptions, SearchRequest};
use site_search::services::elasticsearch::ElasticsearchClient;
use site_search::services::pipeline::{SearchBackend, SearchPipeline};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// Most tests run against an in-process fake Elasticsearch.
// The live test requires a running cluster with a `pages` index:
// cargo test --test elasticsearch_integration_test -- --ignored

#[derive(Clone)]
struct FakeElasticsearch {
    requests: Arc<Mutex<Vec<(String, Value)>>>,
    status: StatusCode,
    response: Value,
}

impl FakeElasticsearch {
    fn new(status: StatusCode, response: Value) -> Self {
        Self {
            requests: Arc::new(Mutex::new(Vec::new())),
            status,
            response,
        }
    }
}

async fn fake_search(
    State(fake): State<FakeElasticsearch>,
    Path(index): Path<String>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    fake.requests.lock().unwrap().push((index, body));
    (fake.status, Json(fake.response.clone()))
}

async fn fake_health() -> Json<Value> {
    Json(json!({ "cluster_name": "test", "status": "yellow" }))
}

async fn spawn_fake(fake: FakeElasticsearch) -> String {
    let app = Router::new()
        .route("/{index}/_search", post(fake_search))
        .route("/_cluster/health", get(fake_health))
        .with_state(fake);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

fn two_hits_response() -> Value {
    json!({
        "took": 2,
        "timed_out": false,
        "hits": {
            "total": { "value": 12, "relation": "eq" },
            "max_score": null,
            "hits": [
                {
                    "_index": "pages",
                    "_id": "p2",
                    "_score": null,
                    "_source": {
                        "title": "Winter garden",
                        "url": "/fr/winter-garden",
                        "abstract": "<p>Plants for <b>winter</b></p>",
                        "published_at": "2024-02-01 08:00:00"
                    }
                },
                {
                    "_index": "pages",
                    "_id": "p1",
                    "_score": null,
                    "_source": { "title": "Garden", "url": "/fr/garden" }
                }
            ]
        }
    })
}

fn client(base_url: &str) -> ElasticsearchClient {
    ElasticsearchClient::new(base_url, "pages", Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_pipeline_sends_expected_request() {
    let fake = FakeElasticsearch::new(StatusCode::OK, two_hits_response());
    let base_url = spawn_fake(fake.clone()).await;
    let pipeline = SearchPipeline::new(Arc::new(client(&base_url)));

    let request = SearchRequest::new("garden", 2, 10).with_locale("fr");
    let options = DisplayOptions {
        show_abstract: true,
        ..Default::default()
    };

    let page = pipeline.run(&request, &options).await.unwrap();

    assert_eq!(page.total_count, 12);
    assert_eq!(page.page_index, 2);
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].title, "Winter garden");
    assert_eq!(page.items[0].abstract_text.as_deref(), Some("Plants for winter"));
    assert!(page.items[0].published_at.is_none());
    assert_eq!(page.items[1].url, "/fr/garden");

    let requests = fake.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    let (index, body) = &requests[0];
    assert_eq!(index, "pages");
    assert_eq!(body["from"], 10);
    assert_eq!(body["size"], 10);
    assert_eq!(body["sort"], json!([{ "published_at": { "order": "desc" } }]));
    assert_eq!(body["track_total_hits"], true);

    let bool_query = &body["query"]["bool"];
    assert_eq!(bool_query["should"].as_array().unwrap().len(), 11);
    assert_eq!(bool_query["minimum_should_match"], 1);
    assert_eq!(
        bool_query["should"][0],
        json!({ "match": { "title": { "query": "garden", "boost": 2.0 } } })
    );
    assert_eq!(
        bool_query["must"],
        json!([
            { "match": { "is_online": true } },
            { "prefix": { "url": "/fr/" } }
        ])
    );
}

#[tokio::test]
async fn test_blank_query_sends_listing_request() {
    let fake = FakeElasticsearch::new(
        StatusCode::OK,
        json!({ "hits": { "total": 0, "hits": [] } }),
    );
    let base_url = spawn_fake(fake.clone()).await;
    let pipeline = SearchPipeline::new(Arc::new(client(&base_url)));

    let request = SearchRequest::new("  ", 1, 10).with_authenticated(true);
    let page = pipeline
        .run(&request, &DisplayOptions::default())
        .await
        .unwrap();

    assert!(page.items.is_empty());
    assert_eq!(page.total_count, 0);

    let requests = fake.requests.lock().unwrap();
    let (_, body) = &requests[0];
    assert_eq!(body["query"], json!({ "bool": { "must": [] } }));
    assert_eq!(body["from"], 0);
}

#[tokio::test]
async fn test_http_error_maps_to_status() {
    let fake = FakeElasticsearch::new(
        StatusCode::SERVICE_UNAVAILABLE,
        json!({ "error": "cluster_block_exception" }),
    );
    let base_url = spawn_fake(fake).await;

    let result = client(&base_url)
        .execute(&QueryBody::default(), 0, 10, &[SortDirective::newest_first()])
        .await;

    match result {
        Err(SearchBackendError::Status { status, body }) => {
            assert_eq!(status, 503);
            assert!(body.contains("cluster_block_exception"));
        }
        other => panic!("expected Status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unexpected_shape_maps_to_malformed_response() {
    let fake = FakeElasticsearch::new(StatusCode::OK, json!({ "acknowledged": true }));
    let base_url = spawn_fake(fake).await;

    let result = client(&base_url)
        .execute(&QueryBody::default(), 0, 10, &[])
        .await;

    assert!(matches!(result, Err(SearchBackendError::MalformedResponse(_))));
}

#[tokio::test]
async fn test_unreachable_backend() {
    // Grab a free port, then close it so nothing is listening there
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let pipeline = SearchPipeline::new(Arc::new(client(&format!("http://{}", addr))));
    let result = pipeline
        .run(&SearchRequest::new("garden", 1, 10), &DisplayOptions::default())
        .await;

    match result {
        Err(err) => assert!(err.is_unreachable(), "unexpected error: {}", err),
        Ok(page) => panic!("expected failure, got {:?}", page),
    }
}

#[tokio::test]
async fn test_cluster_health() {
    let fake = FakeElasticsearch::new(StatusCode::OK, json!({}));
    let base_url = spawn_fake(fake).await;

    assert_eq!(client(&base_url).cluster_health().await.unwrap(), "yellow");
}

#[tokio::test]
#[ignore] // Requires Elasticsearch running
async fn test_live_cluster_search() {
    let pipeline = SearchPipeline::new(Arc::new(client("http://127.0.0.1:9200")));

    let page = pipeline
        .run(
            &SearchRequest::new("", 1, 5).with_authenticated(true),
            &DisplayOptions::default(),
        )
        .await
        .expect("Search against live cluster failed");

    assert!(page.items.len() <= 5);
    assert!(page.total_count >= page.items.len() as u64);
}
