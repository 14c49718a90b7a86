// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

pub mod auth;
pub mod elasticsearch;
pub mod formatter;
pub mod logging;
pub mod pipeline;
pub mod query_builder;
