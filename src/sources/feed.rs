use crate::datetime::REFERENCE_TZ;
use crate::sources::SourceAdapter;
use crate::types::{AggregatorError, CandidateEvent, Result, SourceDescriptor};
use feed_rs::parser;
use tracing::debug;

/// RSS/Atom adapter: one candidate per item/entry element. Syndication
/// feeds carry no location or geocoordinates.
pub struct FeedAdapter;

impl SourceAdapter for FeedAdapter {
    fn parse(&self, payload: &str, src: &SourceDescriptor) -> Result<Vec<CandidateEvent>> {
        let feed = parser::parse(payload.as_bytes())
            .map_err(|e| AggregatorError::Parse(format!("failed to parse feed: {e}")))?;

        let events = feed
            .entries
            .into_iter()
            .map(|entry| {
                let mut event = CandidateEvent::new(&src.name);
                event.title = entry
                    .title
                    .map(|t| t.content.trim().to_string())
                    .unwrap_or_default();
                event.url = entry
                    .links
                    .first()
                    .map(|l| l.href.clone())
                    .unwrap_or_else(|| src.url.clone());
                event.description = entry
                    .summary
                    .map(|s| s.content.trim().to_string())
                    .unwrap_or_default();
                // A single published/updated timestamp maps to the start.
                event.start = entry
                    .published
                    .or(entry.updated)
                    .map(|dt| dt.with_timezone(&REFERENCE_TZ));
                event
            })
            .collect::<Vec<_>>();

        debug!("Feed {} yielded {} entries", src.name, events.len());
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RSS: &str = r#"<?xml version="1.0"?>
<rss version="2.0"><channel>
  <title>City Events</title>
  <item>
    <title> Summer Concert </title>
    <link>https://example.com/concert</link>
    <description>Live music on the green</description>
    <pubDate>Sat, 12 Jul 2025 18:00:00 -0600</pubDate>
  </item>
  <item>
    <title>Undated Notice</title>
  </item>
</channel></rss>"#;

    fn source() -> SourceDescriptor {
        SourceDescriptor::feed("City – RSS", "https://example.com/rss.xml")
    }

    #[test]
    fn maps_item_fields() {
        let events = FeedAdapter.parse(RSS, &source()).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].title, "Summer Concert");
        assert_eq!(events[0].url, "https://example.com/concert");
        assert_eq!(events[0].description, "Live music on the green");
        assert!(events[0].start.is_some());
        assert!(events[0].location.is_empty());
        assert!(events[0].lat.is_none());
    }

    #[test]
    fn missing_link_falls_back_to_source_url() {
        let events = FeedAdapter.parse(RSS, &source()).unwrap();
        assert_eq!(events[1].url, "https://example.com/rss.xml");
        assert!(events[1].start.is_none());
    }

    #[test]
    fn unparsable_payload_is_a_parse_error() {
        let err = FeedAdapter.parse("this is not xml", &source()).unwrap_err();
        assert!(matches!(err, AggregatorError::Parse(_)));
    }
}
