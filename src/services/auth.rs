// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Preview authentication.
//!
//! Editors previewing the site pass a shared preview token, either as the
//! `search_preview` cookie or as an `Authorization: Bearer` header. Requests
//! carrying it are authenticated and may see offline content.

use axum::http::{header, HeaderMap};
use sha2::{Digest, Sha256};
use tower_cookies::Cookies;

/// Cookie name carrying the preview token.
pub const PREVIEW_COOKIE_NAME: &str = "search_preview";

/// Hash a token for storage/comparison.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Checks request credentials against the configured preview token.
#[derive(Debug, Clone, Default)]
pub struct PreviewAuth {
    token_hash: Option<String>,
}

impl PreviewAuth {
    /// Blank or missing tokens disable preview access entirely.
    pub fn new(token: Option<&str>) -> Self {
        Self {
            token_hash: token
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(hash_token),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.token_hash.is_some()
    }

    /// Whether `candidate` is the preview token
    pub fn verify(&self, candidate: &str) -> bool {
        match &self.token_hash {
            Some(expected) => constant_time_eq(expected.as_bytes(), hash_token(candidate).as_bytes()),
            None => false,
        }
    }

    /// Whether the request carries a valid preview token in a cookie or bearer header
    pub fn is_authenticated(&self, headers: &HeaderMap, cookies: &Cookies) -> bool {
        if !self.is_enabled() {
            return false;
        }

        if let Some(cookie) = cookies.get(PREVIEW_COOKIE_NAME) {
            if self.verify(cookie.value()) {
                return true;
            }
        }

        extract_bearer_token(headers).is_some_and(|token| self.verify(token))
    }
}

/// Token from an `Authorization: Bearer <token>` header
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
