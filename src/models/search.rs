// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::models::query::{QueryBody, SortDirective};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

/// One incoming search, built once per call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Raw query text as typed by the visitor
    pub query_text: String,
    /// 1-based page number; anything below 1 is treated as the first page
    pub page: i64,
    /// Requested page size; callers must pass a positive value
    pub results_per_page: u32,
    /// Current site language, e.g. "en"
    pub locale: Option<String>,
    /// Editors also see offline content
    pub is_authenticated: bool,
}

impl SearchRequest {
    pub fn new(query_text: impl Into<String>, page: i64, results_per_page: u32) -> Self {
        Self {
            query_text: query_text.into(),
            page,
            results_per_page,
            locale: None,
            is_authenticated: false,
        }
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    pub fn with_authenticated(mut self, is_authenticated: bool) -> Self {
        self.is_authenticated = is_authenticated;
        self
    }

    /// Page number with `page < 1` folded onto the first page
    pub fn normalized_page(&self) -> u64 {
        self.page.max(1) as u64
    }
}

/// Which optional fields the formatter should render
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayOptions {
    pub show_image: bool,
    pub show_abstract: bool,
    pub show_published_at: bool,
}

/// Pre-search envelope handed to override hooks
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchOverrides {
    /// Query built so far; hooks may rewrite it freely
    pub body: QueryBody,
    /// Explicit sort; `None` falls back to newest first
    pub sort: Option<Vec<SortDirective>>,
    /// Explicit page size; `None` or 0 keeps the requested size
    pub size: Option<u32>,
}

impl SearchOverrides {
    pub fn new(body: QueryBody) -> Self {
        Self {
            body,
            sort: None,
            size: None,
        }
    }
}

/// One document as returned by the search backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawHit {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(rename = "_score", default)]
    pub score: Option<f64>,
    #[serde(rename = "_source", default)]
    pub source: Map<String, Value>,
}

impl RawHit {
    /// String field from `_source`, if present and a string
    pub fn source_str(&self, key: &str) -> Option<&str> {
        self.source.get(key).and_then(Value::as_str)
    }
}

/// One page of raw hits plus the total match count
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawPage {
    pub hits: Vec<RawHit>,
    pub total: u64,
}

/// Image attached to a result item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ResultImage {
    pub url: String,
    /// Alternative text for the `<img>` tag
    pub alt: String,
}

/// Display-ready representation of one matched document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ResultItem {
    pub id: String,
    pub title: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ResultImage>,
    #[serde(rename = "abstract", skip_serializing_if = "Option::is_none")]
    pub abstract_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    /// Relevance score, absent when results are sorted by a field
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

/// Search results for one request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ResultPage {
    /// The query text the page was computed for
    pub query: String,
    pub items: Vec<ResultItem>,
    /// Total number of matching documents across all pages
    pub total_count: u64,
    /// 1-based page number
    pub page_index: u64,
    pub page_size: u32,
    /// Number of pages needed to show every match
    pub page_count: u64,
}

impl ResultPage {
    pub fn new(
        query: impl Into<String>,
        items: Vec<ResultItem>,
        total_count: u64,
        page_index: u64,
        page_size: u32,
    ) -> Self {
        let page_count = if page_size == 0 {
            0
        } else {
            total_count.div_ceil(u64::from(page_size))
        };

        Self {
            query: query.into(),
            items,
            total_count,
            page_index,
            page_size,
            page_count,
        }
    }
}
