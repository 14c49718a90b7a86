// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Error types for the search pipeline

use thiserror::Error;

/// Failure talking to the search backend.
///
/// Returned to the caller unchanged; the pipeline never retries.
#[derive(Error, Debug)]
pub enum SearchBackendError {
    #[error("Search backend unreachable: {0}")]
    Unreachable(String),

    #[error("Search backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed search backend response: {0}")]
    MalformedResponse(String),

    #[error("Invalid search backend endpoint: {0}")]
    InvalidEndpoint(String),
}

impl SearchBackendError {
    /// Whether the backend could not be reached at all, as opposed to answering badly
    pub fn is_unreachable(&self) -> bool {
        matches!(self, SearchBackendError::Unreachable(_))
    }
}

impl From<reqwest::Error> for SearchBackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SearchBackendError::MalformedResponse(err.to_string())
        } else {
            SearchBackendError::Unreachable(err.to_string())
        }
    }
}

impl From<serde_json::Error> for SearchBackendError {
    fn from(err: serde_json::Error) -> Self {
        SearchBackendError::MalformedResponse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SearchBackendError>;
