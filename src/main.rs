// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use anyhow::Context;
use clap::Parser;
use site_search::app::{create_router, AppState, VERSION};
use site_search::models::settings::Config;
use site_search::services::auth::PreviewAuth;
use site_search::services::elasticsearch::ElasticsearchClient;
use site_search::services::logging::init_tracing;
use site_search::services::pipeline::SearchPipeline;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    init_tracing(&config.log_level);

    let es_client = ElasticsearchClient::new(
        &config.elasticsearch_url,
        config.elasticsearch_index.clone(),
        config.elasticsearch_timeout(),
    )
    .context("Failed to configure Elasticsearch client")?;

    // The service still starts when the cluster is down; searches fail with 502 until it is back
    match es_client.cluster_health().await {
        Ok(status) => tracing::info!("Elasticsearch cluster status: {}", status),
        Err(e) => tracing::warn!("Elasticsearch health check failed: {}", e),
    }

    let preview_auth = PreviewAuth::new(config.preview_token.as_deref());
    if !preview_auth.is_enabled() {
        tracing::info!("No preview token configured; offline pages are never searchable");
    }

    let pipeline = SearchPipeline::new(Arc::new(es_client));
    let state = AppState::new(pipeline, preview_auth, config.results_per_page);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen_addr))?;

    tracing::info!("site-search v{} listening on {}", VERSION, config.listen_addr);

    axum::serve(listener, app).await.context("HTTP server error")?;

    Ok(())
}
