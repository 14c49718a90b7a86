// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Search query pipeline: request in, formatted result page out.
//!
//! The pipeline owns no state of its own. Its collaborators are injected at
//! construction:
//! - `SearchBackend`: executes the final query (Elasticsearch in production)
//! - `QueryOverride`: hooks that may rewrite the query before filters are added
//! - `ItemFormatter`: turns raw hits into display-ready items

use crate::error::Result;
use crate::models::query::{QueryBody, SortDirective};
use crate::models::search::{
    DisplayOptions, RawHit, RawPage, ResultItem, ResultPage, SearchOverrides, SearchRequest,
};
use crate::services::formatter::DefaultItemFormatter;
use crate::services::logging::summarize_query;
use crate::services::query_builder::{apply_mandatory_filters, build_text_query};
use async_trait::async_trait;
use std::sync::Arc;

/// Executes a fully built query against a search index
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn execute(
        &self,
        body: &QueryBody,
        offset: u64,
        limit: u32,
        sort: &[SortDirective],
    ) -> Result<RawPage>;
}

/// Hook run on the query before mandatory filters are appended.
///
/// Hooks can add clauses, replace the scored query, or pick a sort and page
/// size. Visibility and locale filters are added afterwards and cannot be
/// removed from here.
pub trait QueryOverride: Send + Sync {
    fn apply(&self, overrides: &mut SearchOverrides);
}

/// Turns one raw hit into a result item
pub trait ItemFormatter: Send + Sync {
    fn format(&self, hit: &RawHit, options: &DisplayOptions) -> ResultItem;
}

/// Final query, pagination and sort for one backend call
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedSearch {
    pub body: QueryBody,
    pub offset: u64,
    pub limit: u32,
    pub sort: Vec<SortDirective>,
    pub page: u64,
}

pub struct SearchPipeline {
    backend: Arc<dyn SearchBackend>,
    formatter: Arc<dyn ItemFormatter>,
    overrides: Vec<Arc<dyn QueryOverride>>,
}

impl SearchPipeline {
    /// Create a pipeline with the default item formatter and no hooks
    pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
        Self {
            backend,
            formatter: Arc::new(DefaultItemFormatter),
            overrides: Vec::new(),
        }
    }

    pub fn with_formatter(mut self, formatter: Arc<dyn ItemFormatter>) -> Self {
        self.formatter = formatter;
        self
    }

    /// Register a hook; hooks run in registration order
    pub fn with_override(mut self, hook: Arc<dyn QueryOverride>) -> Self {
        self.overrides.push(hook);
        self
    }

    /// Build the final query without executing it
    pub fn prepare(&self, request: &SearchRequest) -> PreparedSearch {
        let mut overrides = SearchOverrides::new(build_text_query(&request.query_text));

        for hook in &self.overrides {
            hook.apply(&mut overrides);
        }

        let SearchOverrides { mut body, sort, size } = overrides;

        apply_mandatory_filters(&mut body, request.is_authenticated, request.locale.as_deref());

        let sort = sort.unwrap_or_else(|| vec![SortDirective::newest_first()]);

        let limit = size
            .filter(|s| *s > 0)
            .unwrap_or(request.results_per_page)
            .max(1);

        let page = request.normalized_page();
        let offset = (page - 1).saturating_mul(u64::from(limit));

        PreparedSearch {
            body,
            offset,
            limit,
            sort,
            page,
        }
    }

    /// Run one search end to end.
    ///
    /// Backend failures are returned as-is; no partial page is produced.
    pub async fn run(&self, request: &SearchRequest, options: &DisplayOptions) -> Result<ResultPage> {
        let prepared = self.prepare(request);

        tracing::debug!(
            query = %summarize_query(&request.query_text),
            offset = prepared.offset,
            limit = prepared.limit,
            locale = ?request.locale,
            authenticated = request.is_authenticated,
            "Executing search"
        );

        let raw = self
            .backend
            .execute(&prepared.body, prepared.offset, prepared.limit, &prepared.sort)
            .await
            .inspect_err(|e| tracing::warn!("Search backend call failed: {}", e))?;

        let items: Vec<ResultItem> = raw
            .hits
            .iter()
            .take(prepared.limit as usize)
            .map(|hit| self.formatter.format(hit, options))
            .collect();

        let total_count = raw.total.max(items.len() as u64);

        tracing::info!(
            query = %summarize_query(&request.query_text),
            total = total_count,
            returned = items.len(),
            "Search completed"
        );

        Ok(ResultPage::new(
            request.query_text.clone(),
            items,
            total_count,
            prepared.page,
            prepared.limit,
        ))
    }
}
