use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::models::Page;

/// Deserializes a nullable string, turning `null` into `""`.
pub fn null_to_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Reads an ISO-8601 timestamp the way the API may send it: with an offset,
/// without one (taken as UTC) or as a bare date (midnight UTC).
pub fn parse_iso_datetime(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(text) {
        return Some(date.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}

/// Deserializes a nullable ISO-8601 timestamp. A value that cannot be read
/// is logged and left empty so one odd row does not sink its whole page.
pub fn iso_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
    if text.trim().is_empty() {
        return Ok(None);
    }
    let parsed = parse_iso_datetime(&text);
    if parsed.is_none() {
        warn!("Ignoring unreadable date `{}`", text);
    }
    Ok(parsed)
}

/// Calendar date as shown in tables and spreadsheets, `DD/MM/YYYY` in UTC.
pub fn format_date(date: Option<&DateTime<Utc>>) -> String {
    date.map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_default()
}

/// Rewrites a server-provided cursor link relative to our own base path.
///
/// Links on `origin` lose it (`http://host:8000/facet/x/?offset=10` becomes
/// `/facet/x/?offset=10`), repeated leading slashes collapse into one. Links
/// to any other origin are returned untouched.
pub fn normalize_link(origin: &str, link: &str) -> String {
    let origin = origin.trim_end_matches('/');
    match link.strip_prefix(origin) {
        Some(rest)
            if !origin.is_empty()
                && (rest.is_empty() || rest.starts_with('/') || rest.starts_with('?')) =>
        {
            format!("/{}", rest.trim_start_matches('/'))
        }
        _ if link.starts_with('/') => format!("/{}", link.trim_start_matches('/')),
        _ => link.to_string(),
    }
}

/// `pérez` becomes `Pérez`, `GARCÍA` becomes `García`.
pub fn capitalize_name(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.as_str().to_lowercase().chars()).collect(),
        None => String::new(),
    }
}

/// Upper-cases the first letter and leaves the rest alone.
pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Accepts anything shaped `x@y.z` without whitespace.
pub fn looks_like_email(text: &str) -> bool {
    if text.chars().any(char::is_whitespace) {
        return false;
    }
    match text.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain
                    .split_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        }
        None => false,
    }
}

/// Picks the message to show for an API error payload.
///
/// The first field of `known_fields` present in the payload wins. Otherwise
/// every value of an object payload is flattened and joined with `", "`, a
/// bare string is shown as is, and anything else falls back.
pub fn extract_validation_message(
    payload: &Value,
    known_fields: &[(&str, &str)],
    fallback: &str,
) -> String {
    if let Some((_, message)) = known_fields
        .iter()
        .find(|(field, _)| payload.get(field).is_some())
    {
        return message.to_string();
    }
    match payload {
        Value::Object(fields) => {
            let messages = fields.values().flat_map(flatten_messages).collect::<Vec<_>>();
            if messages.is_empty() {
                fallback.to_string()
            } else {
                messages.join(", ")
            }
        }
        Value::String(message) if !message.is_empty() => message.clone(),
        _ => fallback.to_string(),
    }
}

fn flatten_messages(value: &Value) -> Vec<String> {
    match value {
        Value::String(message) => vec![message.clone()],
        Value::Array(items) => items.iter().flat_map(flatten_messages).collect(),
        Value::Object(fields) => fields.values().flat_map(flatten_messages).collect(),
        Value::Null => Vec::new(),
        other => vec![other.to_string()],
    }
}

pub fn log_page<T>(url: &str, page: &Page<T>) {
    debug!(
        "Page {} holds {} of {} records, next {:?}, previous {:?}",
        url,
        page.results.len(),
        page.count,
        page.next,
        page.previous
    );
}
