// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::error::{Result, SearchBackendError};
use crate::models::query::{QueryBody, SortDirective};
use crate::models::search::{RawHit, RawPage};
use crate::services::pipeline::SearchBackend;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

/// Longest backend error body kept in a `SearchBackendError::Status`
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Elasticsearch client for running page searches against one index
pub struct ElasticsearchClient {
    http: reqwest::Client,
    base_url: String,
    index_name: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponseBody {
    hits: HitsEnvelope,
}

#[derive(Debug, Deserialize)]
struct HitsEnvelope {
    #[serde(default)]
    total: Option<TotalHits>,
    #[serde(default)]
    hits: Vec<RawHit>,
}

/// `hits.total` is a bare number before Elasticsearch 7 and an object after
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TotalHits {
    Count(u64),
    Object { value: u64 },
}

impl TotalHits {
    fn value(&self) -> u64 {
        match self {
            TotalHits::Count(n) => *n,
            TotalHits::Object { value } => *value,
        }
    }
}

impl ElasticsearchClient {
    /// Create a new client. A bare `host:port` is treated as plain HTTP.
    pub fn new(host: &str, index_name: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = normalize_base_url(host)?;
        let index_name = index_name.into();
        if index_name.trim().is_empty() {
            return Err(SearchBackendError::InvalidEndpoint(
                "index name cannot be empty".to_string(),
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SearchBackendError::InvalidEndpoint(e.to_string()))?;

        tracing::info!("Using Elasticsearch at {} (index: {})", base_url, index_name);

        Ok(Self {
            http,
            base_url,
            index_name,
        })
    }

    pub fn search_url(&self) -> String {
        format!("{}/{}/_search", self.base_url, self.index_name)
    }

    /// Cluster health status ("green", "yellow" or "red")
    pub async fn cluster_health(&self) -> Result<String> {
        let response = self
            .http
            .get(format!("{}/_cluster/health", self.base_url))
            .send()
            .await?;

        let text = read_success_body(response).await?;
        let health: Value = serde_json::from_str(&text)?;

        health
            .get("status")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| {
                SearchBackendError::MalformedResponse("cluster health has no status".to_string())
            })
    }
}

#[async_trait]
impl SearchBackend for ElasticsearchClient {
    async fn execute(
        &self,
        body: &QueryBody,
        offset: u64,
        limit: u32,
        sort: &[SortDirective],
    ) -> Result<RawPage> {
        let payload = search_payload(body, offset, limit, sort);

        tracing::debug!(url = %self.search_url(), "Sending search request");

        let response = self
            .http
            .post(self.search_url())
            .json(&payload)
            .send()
            .await?;

        let text = read_success_body(response).await?;
        decode_search_response(&text)
    }
}

/// JSON body for `POST /{index}/_search`
pub fn search_payload(body: &QueryBody, offset: u64, limit: u32, sort: &[SortDirective]) -> Value {
    json!({
        "query": body.to_wire(),
        "from": offset,
        "size": limit,
        "sort": sort,
        "track_total_hits": true,
    })
}

/// Parse a `_search` response into a raw page
pub fn decode_search_response(text: &str) -> Result<RawPage> {
    let parsed: SearchResponseBody = serde_json::from_str(text)?;
    let hits = parsed.hits.hits;
    let total = parsed
        .hits
        .total
        .map(|t| t.value())
        .unwrap_or(hits.len() as u64);

    Ok(RawPage { hits, total })
}

async fn read_success_body(response: reqwest::Response) -> Result<String> {
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        return Err(SearchBackendError::Status {
            status: status.as_u16(),
            body: text.chars().take(MAX_ERROR_BODY_CHARS).collect(),
        });
    }

    Ok(text)
}

fn normalize_base_url(host: &str) -> Result<String> {
    let host = host.trim();
    let url = if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("http://{}", host)
    };

    let parsed = url::Url::parse(&url)
        .map_err(|e| SearchBackendError::InvalidEndpoint(format!("{}: {}", host, e)))?;
    if parsed.host_str().is_none() {
        return Err(SearchBackendError::InvalidEndpoint(format!(
            "{}: missing host",
            host
        )));
    }

    Ok(url.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::query::QueryClause;

    #[test]
    fn test_base_url_gets_scheme() {
        assert_eq!(
            normalize_base_url("127.0.0.1:9200").unwrap(),
            "http://127.0.0.1:9200"
        );
        assert_eq!(
            normalize_base_url("https://search.example.com/").unwrap(),
            "https://search.example.com"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            normalize_base_url("http://"),
            Err(SearchBackendError::InvalidEndpoint(_))
        ));
    }

    #[test]
    fn test_search_url() {
        let client =
            ElasticsearchClient::new("localhost:9200", "pages", Duration::from_secs(5)).unwrap();
        assert_eq!(client.search_url(), "http://localhost:9200/pages/_search");
    }

    #[test]
    fn test_empty_index_rejected() {
        let result = ElasticsearchClient::new("localhost:9200", " ", Duration::from_secs(5));
        assert!(matches!(result, Err(SearchBackendError::InvalidEndpoint(_))));
    }

    #[test]
    fn test_search_payload_shape() {
        let mut body = QueryBody::default();
        body.bool.push_must(QueryClause::matching("is_online", true));

        let payload = search_payload(&body, 20, 10, &[SortDirective::newest_first()]);

        assert_eq!(
            payload,
            json!({
                "query": { "bool": { "must": [{ "match": { "is_online": true } }] } },
                "from": 20,
                "size": 10,
                "sort": [{ "published_at": { "order": "desc" } }],
                "track_total_hits": true,
            })
        );
    }

    #[test]
    fn test_decode_total_as_object() {
        let page = decode_search_response(
            r#"{"took":3,"hits":{"total":{"value":57,"relation":"eq"},"hits":[
                {"_id":"1","_score":null,"_source":{"title":"Garden"}}
            ]}}"#,
        )
        .unwrap();
        assert_eq!(page.total, 57);
        assert_eq!(page.hits.len(), 1);
        assert_eq!(page.hits[0].source_str("title"), Some("Garden"));
    }

    #[test]
    fn test_decode_total_as_number() {
        let page = decode_search_response(r#"{"hits":{"total":4,"hits":[]}}"#).unwrap();
        assert_eq!(page.total, 4);
        assert!(page.hits.is_empty());
    }

    #[test]
    fn test_decode_missing_total_counts_hits() {
        let page =
            decode_search_response(r#"{"hits":{"hits":[{"_id":"a"},{"_id":"b"}]}}"#).unwrap();
        assert_eq!(page.total, 2);
    }

    #[test]
    fn test_decode_malformed_response() {
        assert!(matches!(
            decode_search_response(r#"{"error":"boom"}"#),
            Err(SearchBackendError::MalformedResponse(_))
        ));
        assert!(matches!(
            decode_search_response("<html>"),
            Err(SearchBackendError::MalformedResponse(_))
        ));
    }
}
