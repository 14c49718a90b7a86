// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;

/// Largest page size a client may request
pub const MAX_RESULTS_PER_PAGE: u32 = 100;

/// Service configuration. Every flag can also be set from the environment.
#[derive(Debug, Clone, Parser)]
#[command(name = "site-search", version, about = "Site search service backed by Elasticsearch")]
pub struct Config {
    /// Elasticsearch base URL or host:port
    #[arg(long, env = "ELASTICSEARCH_URL", default_value = "http://127.0.0.1:9200")]
    pub elasticsearch_url: String,

    /// Index holding the site's pages
    #[arg(long, env = "ELASTICSEARCH_INDEX", default_value = "pages")]
    pub elasticsearch_index: String,

    /// Timeout for a single search request, in seconds
    #[arg(long, env = "ELASTICSEARCH_TIMEOUT_SECS", default_value_t = 10)]
    pub elasticsearch_timeout_secs: u64,

    /// Page size used when the client does not ask for one
    #[arg(
        long,
        env = "SEARCH_RESULTS_PER_PAGE",
        default_value_t = 10,
        value_parser = clap::value_parser!(u32).range(1..=MAX_RESULTS_PER_PAGE as i64)
    )]
    pub results_per_page: u32,

    /// Address the HTTP server binds to
    #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:3000")]
    pub listen_addr: SocketAddr,

    /// Shared token that lets editors see offline pages
    #[arg(long, env = "SEARCH_PREVIEW_TOKEN", hide_env_values = true)]
    pub preview_token: Option<String>,

    /// Default log filter when RUST_LOG is not set
    #[arg(long, env = "SEARCH_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Config {
    pub fn elasticsearch_timeout(&self) -> Duration {
        Duration::from_secs(self.elasticsearch_timeout_secs)
    }
}
