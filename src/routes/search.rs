// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Search route handler.

use crate::app::AppState;
use crate::error::SearchBackendError;
use crate::models::search::{DisplayOptions, ResultPage, SearchRequest};
use crate::models::settings::MAX_RESULTS_PER_PAGE;
use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::de::{Deserializer, Error as _, Unexpected};
use serde::Deserialize;
use tower_cookies::Cookies;
use utoipa::IntoParams;

/// Query-string parameters of `GET /search`
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Search text; empty lists the newest pages
    #[serde(default)]
    pub q: String,
    /// 1-based page number
    pub page: Option<i64>,
    /// Results per page (1-100)
    pub per_page: Option<u32>,
    /// Restrict results to one site language, e.g. "en"
    pub lang: Option<String>,
    /// Include the page image (`true`/`false` or `1`/`0`)
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub show_image: bool,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub show_abstract: bool,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub show_published_at: bool,
}

/// Query-string switch; an empty value (`?show_image=`) counts as off
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Ok(true),
        "" | "0" | "false" | "off" | "no" => Ok(false),
        _ => Err(D::Error::invalid_value(
            Unexpected::Str(&raw),
            &"true, false, 1 or 0",
        )),
    }
}

impl SearchParams {
    /// Turn raw parameters into a pipeline request
    pub fn into_request(
        self,
        default_per_page: u32,
        is_authenticated: bool,
    ) -> Result<(SearchRequest, DisplayOptions), (StatusCode, String)> {
        let per_page = self.per_page.unwrap_or(default_per_page);
        if per_page == 0 || per_page > MAX_RESULTS_PER_PAGE {
            return Err((
                StatusCode::BAD_REQUEST,
                format!("per_page must be between 1 and {MAX_RESULTS_PER_PAGE}"),
            ));
        }

        let locale = match self.lang.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(lang) if is_valid_locale(lang) => Some(lang.to_string()),
            Some(lang) => {
                return Err((
                    StatusCode::BAD_REQUEST,
                    format!("Invalid language code: {lang}"),
                ))
            }
        };

        let options = DisplayOptions {
            show_image: self.show_image,
            show_abstract: self.show_abstract,
            show_published_at: self.show_published_at,
        };

        let request = SearchRequest {
            query_text: self.q,
            page: self.page.unwrap_or(1),
            results_per_page: per_page,
            locale,
            is_authenticated,
        };

        Ok((request, options))
    }
}

/// Language codes end up in a URL prefix, so only plain tags like `en` or `pt-BR` pass
fn is_valid_locale(lang: &str) -> bool {
    lang.len() <= 16
        && lang
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// GET /search - Full-text search over the site's pages.
///
/// Elasticsearch refuses pages past its `max_result_window` (`from + size`,
/// 10000 by default) and that refusal is reported as 502 like any other
/// backend failure.
#[utoipa::path(
    get,
    path = "/search",
    params(SearchParams),
    responses(
        (status = 200, description = "One page of results", body = ResultPage),
        (status = 400, description = "Invalid parameters"),
        (status = 502, description = "Search backend failure, including pages past the result window"),
    ),
    tag = "search"
)]
pub async fn search_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    cookies: Cookies,
    Query(params): Query<SearchParams>,
) -> Result<Json<ResultPage>, (StatusCode, String)> {
    let is_authenticated = state.preview_auth.is_authenticated(&headers, &cookies);
    let (request, options) = params.into_request(state.results_per_page, is_authenticated)?;

    state
        .pipeline
        .run(&request, &options)
        .await
        .map(Json)
        .map_err(backend_error_response)
}

fn backend_error_response(err: SearchBackendError) -> (StatusCode, String) {
    tracing::error!("Search failed: {}", err);
    let status = match &err {
        SearchBackendError::InvalidEndpoint(_) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_GATEWAY,
    };
    (status, format!("Search error: {err}"))
}
