// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Site search: turns visitor queries into Elasticsearch searches and
//! display-ready result pages.

pub mod app;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

pub use error::SearchBackendError;
pub use services::pipeline::{ItemFormatter, QueryOverride, SearchBackend, SearchPipeline};
