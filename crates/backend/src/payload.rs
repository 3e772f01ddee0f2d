use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;
use wordtowallet_core::SlugRecord;

/// Keys a list may be wrapped under, e.g. `{"data": [...]}`
const WRAPPER_KEYS: &[&str] = &["data", "items", "posts", "results"];

const SLUG_KEYS: &[&str] = &["slug", "code", "id"];

const TIMESTAMP_KEYS: &[&str] = &[
    "updatedAt",
    "updated_at",
    "publishedAt",
    "published_at",
    "createdAt",
    "created_at",
];

/// Find the array in a backend response: either the document itself or an
/// array under one of the usual wrapper keys.
pub fn array_payload(value: &Value) -> Option<&Vec<Value>> {
    match value {
        Value::Array(items) => Some(items),
        Value::Object(map) => WRAPPER_KEYS
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_array)),
        _ => None,
    }
}

/// Convert list items into slug records, skipping items without a slug
pub fn parse_records(items: &[Value]) -> Vec<SlugRecord> {
    items
        .iter()
        .filter_map(|item| {
            let slug = SLUG_KEYS.iter().find_map(|key| match item.get(*key) {
                Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
                Some(Value::Number(n)) => Some(n.to_string()),
                _ => None,
            })?;

            let updated_at = TIMESTAMP_KEYS
                .iter()
                .find_map(|key| item.get(*key).and_then(Value::as_str).and_then(parse_timestamp));

            Some(SlugRecord { slug, updated_at })
        })
        .collect()
}

/// Accepts RFC 3339, a bare `YYYY-MM-DD`, or a zone-less ISO date-time (UTC)
fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
