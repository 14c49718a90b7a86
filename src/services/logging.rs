// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Logging setup and helpers for keeping visitor input out of logs.

use tracing_subscriber::EnvFilter;

/// Longest query prefix written to logs
const MAX_LOGGED_QUERY_CHARS: usize = 48;

/// Install the global tracing subscriber. `RUST_LOG` overrides `default_filter`.
pub fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // A subscriber may already be installed (e.g. by a test harness)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Shorten a visitor query for logging.
/// Keeps the first characters and appends the original length: "garden too…(120 chars)"
pub fn summarize_query(query: &str) -> String {
    let query = query.trim();
    let char_count = query.chars().count();
    if char_count <= MAX_LOGGED_QUERY_CHARS {
        return query.to_string();
    }

    let head: String = query.chars().take(MAX_LOGGED_QUERY_CHARS).collect();
    format!("{}…({} chars)", head, char_count)
}
