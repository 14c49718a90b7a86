// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Application state, route handlers, and router construction.
//!
//! This module is `pub` so that integration tests can build a test router directly
//! without starting the full binary.

use crate::models::search::{ResultImage, ResultItem, ResultPage};
use crate::models::version::VersionResponse;
use crate::routes::search_handler;
use crate::services::auth::PreviewAuth;
use crate::services::pipeline::SearchPipeline;
use axum::{routing::get, Json, Router};
use std::sync::Arc;
use tower_cookies::CookieManagerLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Application version extracted from `Cargo.toml` at compile time.
/// The patch segment can be overridden via `SITE_SEARCH_PATCH_VERSION` (see `build.rs`).
pub const VERSION: &str = env!("SITE_SEARCH_VERSION");

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Shared application state injected into every route handler via `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<SearchPipeline>,
    pub preview_auth: PreviewAuth,
    /// Page size used when the client does not send `per_page`
    pub results_per_page: u32,
}

impl AppState {
    pub fn new(pipeline: SearchPipeline, preview_auth: PreviewAuth, results_per_page: u32) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            preview_auth,
            results_per_page,
        }
    }
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// GET /version - Service name and build version.
#[utoipa::path(
    get,
    path = "/version",
    responses((status = 200, description = "Build version", body = VersionResponse)),
    tag = "meta"
)]
pub async fn version_handler() -> Json<VersionResponse> {
    Json(VersionResponse {
        service: "site-search".to_string(),
        version: VERSION.to_string(),
    })
}

#[derive(OpenApi)]
#[openapi(
    paths(crate::routes::search::search_handler, version_handler),
    components(schemas(ResultPage, ResultItem, ResultImage, VersionResponse)),
    tags(
        (name = "search", description = "Full-text search over site pages"),
        (name = "meta", description = "Service metadata")
    )
)]
pub struct SearchApiDoc;

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the Axum application router, including the OpenAPI document and Swagger UI.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/version", get(version_handler))
        .route("/search", get(search_handler))
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", SearchApiDoc::openapi()))
        .layer(CookieManagerLayer::new())
}
