// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Default projection of raw index hits into result items.

use crate::models::search::{DisplayOptions, RawHit, ResultImage, ResultItem};
use crate::services::pipeline::ItemFormatter;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use scraper::Html;
use serde_json::Value;

/// Reads `title`, `url`, `image`, `abstract` and `published_at` from the hit source
pub struct DefaultItemFormatter;

impl ItemFormatter for DefaultItemFormatter {
    fn format(&self, hit: &RawHit, options: &DisplayOptions) -> ResultItem {
        let title = hit.source_str("title").unwrap_or_default().trim().to_string();
        let url = hit.source_str("url").unwrap_or_default().to_string();

        let image = if options.show_image {
            hit.source.get("image").and_then(|img| extract_image(img, &title))
        } else {
            None
        };

        let abstract_text = if options.show_abstract {
            hit.source_str("abstract")
                .map(|html| collapse_whitespace(&remove_html_tags(html)))
                .filter(|text| !text.is_empty())
        } else {
            None
        };

        let published_at = if options.show_published_at {
            hit.source.get("published_at").and_then(parse_published_at)
        } else {
            None
        };

        ResultItem {
            id: hit.id.clone(),
            title,
            url,
            image,
            abstract_text,
            published_at,
            score: hit.score,
        }
    }
}

/// Image with a usable URL; alt text falls back alt -> description -> title
fn extract_image(image: &Value, title: &str) -> Option<ResultImage> {
    let url = image.get("url").and_then(Value::as_str)?.trim();
    if url.is_empty() {
        return None;
    }

    let alt = image_alternative_text(
        image.get("alt").and_then(Value::as_str),
        image.get("description").and_then(Value::as_str),
        title,
    );

    Some(ResultImage {
        url: url.to_string(),
        alt,
    })
}

/// Alternative text for an image.
///
/// An explicit `alt` wins. Otherwise the description is used with markup
/// removed and line breaks flattened, and `default_text` is the last resort.
pub fn image_alternative_text(
    alt: Option<&str>,
    description: Option<&str>,
    default_text: &str,
) -> String {
    if let Some(alt) = alt.filter(|a| !a.is_empty()) {
        return alt.to_string();
    }

    match description.filter(|d| !d.is_empty()) {
        Some(description) => remove_html_tags(&description.replace('\n', " "))
            .trim()
            .to_string(),
        None => default_text.to_string(),
    }
}

/// Remove HTML tags, keeping the text exactly as it sits between them
pub fn remove_html_tags(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    fragment.root_element().text().collect()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS` (UTC) or epoch seconds
fn parse_published_at(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => n.as_i64().and_then(|secs| Utc.timestamp_opt(secs, 0).single()),
        Value::String(s) => {
            let s = s.trim();
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.with_timezone(&Utc));
            }
            NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|naive| naive.and_utc())
        }
        _ => None,
    }
}
