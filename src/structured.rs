//! Extraction of event-typed JSON-LD blocks embedded in HTML documents.
//!
//! Structured data is the higher-fidelity path for markup sources; the
//! selector heuristics in `sources::markup` only supplement it. Invalid
//! blocks are skipped item by item, never fatal for the page.

use crate::datetime;
use crate::types::{CandidateEvent, SourceDescriptor};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use serde_json::Value;
use tracing::debug;

static JSON_LD: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"script[type="application/ld+json"]"#).expect("valid selector")
});

/// Scan a document for JSON-LD event nodes and convert each into a
/// candidate record.
pub fn extract_events(document: &Html, src: &SourceDescriptor) -> Vec<CandidateEvent> {
    let mut events = Vec::new();
    for node in document.select(&JSON_LD) {
        let text: String = node.text().collect();
        if text.trim().is_empty() {
            continue;
        }
        let json: Value = match serde_json::from_str(&text) {
            Ok(json) => json,
            Err(e) => {
                debug!("Skipping invalid JSON-LD block on {}: {}", src.url, e);
                continue;
            }
        };
        let nodes = match json {
            Value::Array(items) => items,
            other => vec![other],
        };
        for item in &nodes {
            if is_event_node(item) {
                events.push(to_candidate(item, src));
            }
        }
    }
    events
}

/// A node counts as an event when any entry of `@type` contains "event".
fn is_event_node(value: &Value) -> bool {
    let types = match value.get("@type") {
        Some(Value::String(s)) => vec![s.as_str()],
        Some(Value::Array(arr)) => arr.iter().filter_map(|v| v.as_str()).collect(),
        _ => return false,
    };
    types.iter().any(|t| t.to_lowercase().contains("event"))
}

fn str_field<'a>(value: &'a Value, key: &str) -> &'a str {
    value.get(key).and_then(|v| v.as_str()).unwrap_or("")
}

fn to_candidate(value: &Value, src: &SourceDescriptor) -> CandidateEvent {
    let location = value.get("location");
    let geo = location.and_then(|l| l.get("geo"));

    let mut event = CandidateEvent::new(&src.name);
    event.title = str_field(value, "name").trim().to_string();
    event.url = match str_field(value, "url") {
        "" => src.url.clone(),
        url => url.to_string(),
    };
    event.description = str_field(value, "description").trim().to_string();
    event.start = datetime::normalize(str_field(value, "startDate"));
    event.end = datetime::normalize(str_field(value, "endDate"));
    event.location = location
        .map(|l| str_field(l, "name").to_string())
        .unwrap_or_default();
    event.lat = geo.and_then(|g| g.get("latitude")).and_then(|v| v.as_f64());
    event.lon = geo.and_then(|g| g.get("longitude")).and_then(|v| v.as_f64());
    event
}
