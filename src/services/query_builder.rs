// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Full-text query construction and mandatory visibility filters.

use crate::models::query::{BoolQuery, QueryBody, QueryClause, SearchField};

/// Fields that also get a phrase-prefix clause for typeahead-style matching
const PHRASE_PREFIX_FIELDS: [SearchField; 3] = [
    SearchField::Title,
    SearchField::TitleNormalized,
    SearchField::Tags,
];

/// Build the scored part of the query for `query_text`.
///
/// Blank input yields an empty body, which the backend treats as a plain
/// listing of every visible document.
pub fn build_text_query(query_text: &str) -> QueryBody {
    if query_text.trim().is_empty() {
        return QueryBody::default();
    }

    let mut root = BoolQuery::default();

    for field in SearchField::ALL {
        root.push_should(
            QueryClause::matching(field.wire_name(), query_text).boosted(field.boost()),
        );
    }

    for field in PHRASE_PREFIX_FIELDS {
        root.push_should(
            QueryClause::phrase_prefix(field.wire_name(), query_text).boosted(field.boost()),
        );
    }

    root.minimum_should_match = Some(1);

    QueryBody::new(root)
}

/// Append the filters every search must honor, whatever the hooks did.
pub fn apply_mandatory_filters(body: &mut QueryBody, is_authenticated: bool, locale: Option<&str>) {
    if !is_authenticated {
        body.bool
            .push_must(QueryClause::matching("is_online", true));
    }

    if let Some(locale) = locale {
        body.bool
            .push_must(QueryClause::prefix("url", locale_prefix(locale)));
    }
}

/// URL prefix that scopes documents to a language, e.g. `/en/`
pub fn locale_prefix(locale: &str) -> String {
    format!("/{}/", locale)
}
