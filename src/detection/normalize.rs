//! Coerces detector payloads into [`NormalizedDetection`].
//!
//! Accepted shapes:
//!
//! - CLI object: `{"urls": {<url>: {"status": 200}}, "technologies" | "applications": [..]}`
//! - lookup API array: `[{"url": <url>, "technologies": [..]}, ..]`
//! - name-keyed map: `{"technologies": {<name>: {..attributes}}}`
//!
//! Anything else is a `Malformed` detection error. Nothing outside this module
//! looks at raw detector output.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use super::types::{NormalizedDetection, TechnologyAttributes, VisitedUrl};
use crate::error_handling::DetectionError;

/// Normalizes `payload`, the detector's answer for `target_url`.
///
/// `target_url` is the final URL when the payload does not report one.
///
/// # Errors
///
/// Returns `DetectionError::Malformed` when the payload matches none of the
/// accepted shapes.
pub fn normalize(target_url: &str, payload: &Value) -> Result<NormalizedDetection, DetectionError> {
    match payload {
        Value::Object(object) => normalize_object(target_url, object),
        Value::Array(items) => {
            let object = select_entry(target_url, items)?;
            normalize_object(target_url, object)
        }
        other => Err(malformed(format!(
            "expected a JSON object or array, got {}",
            value_kind(other)
        ))),
    }
}

fn malformed(detail: impl Into<String>) -> DetectionError {
    DetectionError::Malformed(detail.into())
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn same_url(a: &str, b: &str) -> bool {
    a.trim_end_matches('/') == b.trim_end_matches('/')
}

/// Picks the array entry describing `target_url`, else the first object.
fn select_entry<'a>(
    target_url: &str,
    items: &'a [Value],
) -> Result<&'a Map<String, Value>, DetectionError> {
    let objects = || items.iter().filter_map(Value::as_object);

    objects()
        .find(|object| {
            object
                .get("url")
                .and_then(Value::as_str)
                .is_some_and(|url| same_url(url, target_url))
        })
        .or_else(|| objects().next())
        .ok_or_else(|| malformed("result array contains no objects"))
}

fn normalize_object(
    target_url: &str,
    object: &Map<String, Value>,
) -> Result<NormalizedDetection, DetectionError> {
    let visited = visited_urls(object);
    let final_url = visited
        .last()
        .map(|hop| hop.url.clone())
        .unwrap_or_else(|| target_url.to_string());

    let technologies = match object
        .get("technologies")
        .or_else(|| object.get("applications"))
    {
        Some(Value::Array(entries)) => technologies_from_list(entries)?,
        Some(Value::Object(by_name)) => technologies_from_map(by_name),
        Some(other) => {
            return Err(malformed(format!(
                "technology list must be an array or object, got {}",
                value_kind(other)
            )))
        }
        None => return Err(malformed("missing 'technologies' or 'applications'")),
    };

    Ok(NormalizedDetection {
        technologies,
        final_url,
        visited,
    })
}

/// Redirect chain in the order the detector reported it.
///
/// Relies on insertion-ordered JSON maps: the last key of `urls` is the page
/// that was finally analyzed.
fn visited_urls(object: &Map<String, Value>) -> Vec<VisitedUrl> {
    match object.get("urls") {
        Some(Value::Object(urls)) => urls
            .iter()
            .map(|(url, info)| VisitedUrl {
                url: url.clone(),
                status: info
                    .get("status")
                    .and_then(Value::as_u64)
                    .and_then(|s| u16::try_from(s).ok()),
            })
            .collect(),
        _ => object
            .get("url")
            .and_then(Value::as_str)
            .map(|url| {
                vec![VisitedUrl {
                    url: url.to_string(),
                    status: None,
                }]
            })
            .unwrap_or_default(),
    }
}

fn technologies_from_list(
    entries: &[Value],
) -> Result<BTreeMap<String, TechnologyAttributes>, DetectionError> {
    let mut technologies = BTreeMap::new();
    for entry in entries {
        let object = entry
            .as_object()
            .ok_or_else(|| malformed(format!("technology entry is {}", value_kind(entry))))?;
        let name = object
            .get("name")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| malformed("technology entry without a name"))?;
        // First report wins when a detector lists a technology twice
        technologies
            .entry(name.to_string())
            .or_insert_with(|| attributes(object));
    }
    Ok(technologies)
}

fn technologies_from_map(by_name: &Map<String, Value>) -> BTreeMap<String, TechnologyAttributes> {
    by_name
        .iter()
        .filter(|(name, _)| !name.trim().is_empty())
        .map(|(name, value)| {
            let attrs = value.as_object().map(attributes).unwrap_or_default();
            (name.trim().to_string(), attrs)
        })
        .collect()
}

fn attributes(object: &Map<String, Value>) -> TechnologyAttributes {
    TechnologyAttributes {
        version: version(object),
        confidence: object.get("confidence").and_then(confidence),
        categories: object
            .get("categories")
            .and_then(Value::as_array)
            .map(|items| items.iter().flat_map(category_names).collect())
            .unwrap_or_default(),
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn version(object: &Map<String, Value>) -> Option<String> {
    object.get("version").and_then(scalar_text).or_else(|| {
        object
            .get("versions")
            .and_then(Value::as_array)
            .and_then(|versions| versions.iter().find_map(scalar_text))
    })
}

fn confidence(value: &Value) -> Option<u8> {
    let raw = value
        .as_u64()
        .map(|n| n as f64)
        .or_else(|| value.as_f64())
        .or_else(|| value.as_str().and_then(|s| s.trim().parse::<f64>().ok()))?;
    if raw.is_nan() || raw < 0.0 {
        return None;
    }
    Some(raw.round().min(100.0) as u8)
}

/// Category names from one `categories` item.
///
/// Handles `"CMS"`, `{"id": 1, "name": "CMS"}` and the legacy `{"1": "CMS"}`.
fn category_names(item: &Value) -> Vec<String> {
    let names: Vec<String> = match item {
        Value::String(name) => vec![name.trim().to_string()],
        Value::Object(object) => match object.get("name").and_then(Value::as_str) {
            Some(name) => vec![name.trim().to_string()],
            None => object
                .values()
                .filter_map(Value::as_str)
                .map(|s| s.trim().to_string())
                .collect(),
        },
        _ => Vec::new(),
    };
    names.into_iter().filter(|name| !name.is_empty()).collect()
}
