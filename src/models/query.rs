// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Typed Elasticsearch query tree.
//!
//! Queries are assembled as `QueryClause` values and only turned into the
//! Elasticsearch JSON shape when serialized at the backend boundary.

use serde::{Serialize, Serializer};
use serde_json::{json, Map, Value};

/// Indexed text fields the full-text query scores against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Title,
    TitleExact,
    TitleNormalized,
    Tags,
    TagsExact,
    TagsNormalized,
    Contents,
    ContentsNormalized,
}

impl SearchField {
    /// Every scored field, in the order the should-list is built
    pub const ALL: [SearchField; 8] = [
        SearchField::Title,
        SearchField::TitleExact,
        SearchField::TitleNormalized,
        SearchField::Tags,
        SearchField::TagsExact,
        SearchField::TagsNormalized,
        SearchField::Contents,
        SearchField::ContentsNormalized,
    ];

    /// Field path in the index mapping
    pub fn wire_name(&self) -> &'static str {
        match self {
            SearchField::Title => "title",
            SearchField::TitleExact => "title.raw",
            SearchField::TitleNormalized => "title.folded",
            SearchField::Tags => "tags",
            SearchField::TagsExact => "tags.raw",
            SearchField::TagsNormalized => "tags.folded",
            SearchField::Contents => "contents",
            SearchField::ContentsNormalized => "contents.folded",
        }
    }

    /// Relevance boost applied to matches on this field.
    /// `None` leaves the index default weight (1.0) in place.
    pub fn boost(&self) -> Option<f32> {
        match self {
            SearchField::Title | SearchField::TitleExact | SearchField::TitleNormalized => {
                Some(2.0)
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for SearchField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.wire_name())
    }
}

/// One node of the query tree
#[derive(Debug, Clone, PartialEq)]
pub enum QueryClause {
    /// Analyzed match on a single field
    Match {
        field: String,
        value: Value,
        boost: Option<f32>,
    },
    /// Phrase match where the last term is treated as a prefix
    MatchPhrasePrefix {
        field: String,
        query: String,
        boost: Option<f32>,
    },
    /// Exact prefix match on a keyword field
    Prefix { field: String, value: String },
    /// Exact term match
    Term { field: String, value: Value },
    /// Nested boolean combination
    Bool(BoolQuery),
}

impl QueryClause {
    pub fn matching(field: impl Into<String>, value: impl Into<Value>) -> Self {
        QueryClause::Match {
            field: field.into(),
            value: value.into(),
            boost: None,
        }
    }

    pub fn phrase_prefix(field: impl Into<String>, query: impl Into<String>) -> Self {
        QueryClause::MatchPhrasePrefix {
            field: field.into(),
            query: query.into(),
            boost: None,
        }
    }

    pub fn prefix(field: impl Into<String>, value: impl Into<String>) -> Self {
        QueryClause::Prefix {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn term(field: impl Into<String>, value: impl Into<Value>) -> Self {
        QueryClause::Term {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Set the boost on a match-type clause; other variants are returned unchanged.
    pub fn boosted(self, weight: Option<f32>) -> Self {
        match self {
            QueryClause::Match { field, value, .. } => QueryClause::Match {
                field,
                value,
                boost: weight,
            },
            QueryClause::MatchPhrasePrefix { field, query, .. } => {
                QueryClause::MatchPhrasePrefix {
                    field,
                    query,
                    boost: weight,
                }
            }
            other => other,
        }
    }

    /// Field the clause targets, if it is a leaf clause
    pub fn field(&self) -> Option<&str> {
        match self {
            QueryClause::Match { field, .. }
            | QueryClause::MatchPhrasePrefix { field, .. }
            | QueryClause::Prefix { field, .. }
            | QueryClause::Term { field, .. } => Some(field.as_str()),
            QueryClause::Bool(_) => None,
        }
    }

    /// Render the clause in Elasticsearch query DSL form
    pub fn to_wire(&self) -> Value {
        match self {
            QueryClause::Match {
                field,
                value,
                boost,
            } => json!({ "match": { field: weighted(value.clone(), *boost) } }),
            QueryClause::MatchPhrasePrefix {
                field,
                query,
                boost,
            } => {
                let query = Value::from(query.as_str());
                json!({ "match_phrase_prefix": { field: weighted(query, *boost) } })
            }
            QueryClause::Prefix { field, value } => json!({ "prefix": { field: value } }),
            QueryClause::Term { field, value } => json!({ "term": { field: value } }),
            QueryClause::Bool(inner) => json!({ "bool": inner.to_wire(false) }),
        }
    }
}

/// Short form `{field: value}` when unboosted, long form otherwise
fn weighted(value: Value, boost: Option<f32>) -> Value {
    match boost {
        Some(b) => json!({ "query": value, "boost": b }),
        None => value,
    }
}

impl Serialize for QueryClause {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_wire().serialize(serializer)
    }
}

/// Boolean query with should/must/filter lists
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoolQuery {
    pub should: Vec<QueryClause>,
    pub must: Vec<QueryClause>,
    pub filter: Vec<QueryClause>,
    pub minimum_should_match: Option<u32>,
}

impl BoolQuery {
    pub fn push_must(&mut self, clause: QueryClause) {
        self.must.push(clause);
    }

    pub fn push_should(&mut self, clause: QueryClause) {
        self.should.push(clause);
    }

    pub fn is_empty(&self) -> bool {
        self.should.is_empty() && self.must.is_empty() && self.filter.is_empty()
    }

    /// Empty lists are left out, except `must` when `keep_must` is set
    fn to_wire(&self, keep_must: bool) -> Value {
        let mut out = Map::new();
        if !self.should.is_empty() {
            out.insert("should".into(), clauses_to_wire(&self.should));
        }
        if keep_must || !self.must.is_empty() {
            out.insert("must".into(), clauses_to_wire(&self.must));
        }
        if !self.filter.is_empty() {
            out.insert("filter".into(), clauses_to_wire(&self.filter));
        }
        if let Some(min) = self.minimum_should_match {
            out.insert("minimum_should_match".into(), Value::from(min));
        }
        Value::Object(out)
    }
}

fn clauses_to_wire(clauses: &[QueryClause]) -> Value {
    Value::Array(clauses.iter().map(QueryClause::to_wire).collect())
}

impl Serialize for BoolQuery {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_wire(false).serialize(serializer)
    }
}

/// Top-level query body sent to the `_search` endpoint
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryBody {
    pub bool: BoolQuery,
}

impl QueryBody {
    pub fn new(root: BoolQuery) -> Self {
        Self { bool: root }
    }

    pub fn is_empty(&self) -> bool {
        self.bool.is_empty()
    }

    /// The `{"bool": ...}` object placed under the request's `query` key
    pub fn to_wire(&self) -> Value {
        json!({ "bool": self.bool.to_wire(true) })
    }
}

impl Serialize for QueryBody {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        json!({ "query": self.to_wire() }).serialize(serializer)
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One sort key of a search request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortDirective {
    pub field: String,
    pub order: SortOrder,
}

impl SortDirective {
    pub fn new(field: impl Into<String>, order: SortOrder) -> Self {
        Self {
            field: field.into(),
            order,
        }
    }

    /// Newest-first ordering used when nothing else asks for a sort
    pub fn newest_first() -> Self {
        Self::new("published_at", SortOrder::Desc)
    }

    pub fn to_wire(&self) -> Value {
        json!({ self.field.as_str(): { "order": self.order.as_str() } })
    }
}

impl std::fmt::Display for SortDirective {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.field, self.order)
    }
}

impl Serialize for SortDirective {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_wire().serialize(serializer)
    }
}
