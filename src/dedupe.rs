//! Merging records that denote the same real-world event.

use crate::types::TaggedEvent;
use std::collections::HashMap;
use tracing::debug;

/// Dedup key: lowercased title, date-only portion of the start, lowercased
/// location. Records sharing all three are the same event.
fn dedup_key(event: &TaggedEvent) -> String {
    let date = event
        .event
        .start
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default();
    format!(
        "{}|{}|{}",
        event.event.title.to_lowercase(),
        date,
        event.event.location.to_lowercase()
    )
}

/// Count of informative fields present (0-4). The richer of two colliding
/// records wins.
fn richness(event: &TaggedEvent) -> u8 {
    u8::from(!event.event.url.is_empty())
        + u8::from(!event.event.description.is_empty())
        + u8::from(!event.event.location.is_empty())
        + u8::from(!event.tags.is_empty())
}

/// Collapse duplicates down to one record per key, keeping the richest
/// record per key. Ties keep the record encountered first, and surviving
/// records keep their first-occurrence positions, so output is reproducible
/// across identical inputs.
pub fn dedupe(events: Vec<TaggedEvent>) -> Vec<TaggedEvent> {
    let mut kept: Vec<TaggedEvent> = Vec::with_capacity(events.len());
    let mut index: HashMap<String, usize> = HashMap::new();

    for event in events {
        let key = dedup_key(&event);
        match index.get(&key) {
            Some(&at) => {
                if richness(&event) > richness(&kept[at]) {
                    debug!("Replacing duplicate with richer record: {}", event.event.title);
                    kept[at] = event;
                }
            }
            None => {
                index.insert(key, kept.len());
                kept.push(event);
            }
        }
    }

    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datetime::normalize;
    use crate::types::CandidateEvent;

    fn tagged(title: &str, start: &str, location: &str) -> TaggedEvent {
        let mut ev = CandidateEvent::new("test");
        ev.title = title.to_string();
        ev.location = location.to_string();
        ev.start = normalize(start);
        TaggedEvent { event: ev, tags: Vec::new() }
    }

    #[test]
    fn title_case_is_ignored_in_key() {
        let a = tagged("Summer Concert", "2025-07-12T18:00:00", "");
        let b = tagged("summer concert", "2025-07-12T19:30:00", "");
        assert_eq!(dedupe(vec![a, b]).len(), 1);
    }

    #[test]
    fn different_days_are_different_events() {
        let a = tagged("Summer Concert", "2025-07-12T18:00:00", "");
        let b = tagged("Summer Concert", "2025-07-13T18:00:00", "");
        assert_eq!(dedupe(vec![a, b]).len(), 2);
    }

    #[test]
    fn richer_record_wins() {
        let poor = tagged("Summer Concert", "2025-07-12T18:00:00", "");
        let mut rich = tagged("Summer Concert", "2025-07-12T18:00:00", "");
        rich.event.url = "https://example.com/concert".to_string();
        rich.event.description = "An outdoor show".to_string();

        let out = dedupe(vec![poor, rich.clone()]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].event.url, rich.event.url);
        assert_eq!(out[0].event.description, rich.event.description);
    }

    #[test]
    fn ties_keep_first_encountered() {
        let mut first = tagged("Summer Concert", "2025-07-12T18:00:00", "");
        first.event.url = "https://first.example.com".to_string();
        let mut second = tagged("Summer Concert", "2025-07-12T18:00:00", "");
        second.event.url = "https://second.example.com".to_string();

        let out = dedupe(vec![first.clone(), second]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].event.url, first.event.url);
    }

    #[test]
    fn dedupe_is_idempotent() {
        let mut rich = tagged("Summer Concert", "2025-07-12T18:00:00", "Village Green");
        rich.event.url = "https://example.com".to_string();
        let events = vec![
            tagged("Summer Concert", "2025-07-12T18:00:00", "Village Green"),
            rich,
            tagged("Art Walk", "2025-07-13T10:00:00", "Downtown"),
        ];

        let once = dedupe(events);
        let twice = dedupe(once.clone());
        assert_eq!(once.len(), twice.len());
        for (a, b) in once.iter().zip(twice.iter()) {
            assert_eq!(a.event.title, b.event.title);
            assert_eq!(a.event.url, b.event.url);
        }
    }
}
