use crate::datetime;
use crate::sources::SourceAdapter;
use crate::structured;
use crate::types::{AggregatorError, CandidateEvent, Result, SourceDescriptor};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

// Captured markup text is length-capped to bound memory and output size.
const MAX_TITLE_LEN: usize = 140;
const MAX_DESCRIPTION_LEN: usize = 1200;

static TITLE: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("h1,h2,h3,.title,.event-title,.EventList-title").expect("valid selector")
});
static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").expect("valid selector"));
static TIME: Lazy<Selector> = Lazy::new(|| Selector::parse("time").expect("valid selector"));
static LOCATION: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(".location,.event-location,.EventListItem-location").expect("valid selector")
});

/// HTML adapter. Two independent extraction paths contribute to the
/// candidate set: embedded JSON-LD event blocks anywhere in the document,
/// and a source-specific CSS selector with heuristic sub-element lookups.
/// The heuristic path is best-effort and inherently lossy; deduplication
/// reconciles overlap between the two later.
pub struct MarkupAdapter;

impl SourceAdapter for MarkupAdapter {
    fn parse(&self, payload: &str, src: &SourceDescriptor) -> Result<Vec<CandidateEvent>> {
        let document = Html::parse_document(payload);

        let mut events = structured::extract_events(&document, src);
        let structured_count = events.len();

        let selector_text = src.selector.as_deref().ok_or_else(|| {
            AggregatorError::Config(format!("markup source {} has no selector", src.name))
        })?;
        let selector = Selector::parse(selector_text)
            .map_err(|e| AggregatorError::Parse(format!("bad selector for {}: {e}", src.name)))?;

        let base = Url::parse(&src.url).ok();
        for element in document.select(&selector) {
            events.push(scrape_element(element, src, base.as_ref()));
        }

        debug!(
            "Markup {}: {} structured + {} scraped candidates",
            src.name,
            structured_count,
            events.len() - structured_count
        );
        Ok(events)
    }
}

fn scrape_element(
    element: ElementRef<'_>,
    src: &SourceDescriptor,
    base: Option<&Url>,
) -> CandidateEvent {
    let mut event = CandidateEvent::new(&src.name);

    let title = element
        .select(&TITLE)
        .next()
        .map(|h| collapse_text(h))
        .filter(|t| !t.is_empty())
        .or_else(|| element.value().attr("aria-label").map(|s| s.trim().to_string()))
        .unwrap_or_else(|| collapse_text(element));
    event.title = match truncate_chars(&title, MAX_TITLE_LEN) {
        t if t.is_empty() => "Untitled".to_string(),
        t => t,
    };

    event.url = element
        .select(&ANCHOR)
        .next()
        .and_then(|a| a.value().attr("href"))
        .and_then(|href| resolve(base, href))
        .unwrap_or_else(|| src.url.clone());

    let date_guess = element
        .select(&TIME)
        .next()
        .map(|t| {
            t.value()
                .attr("datetime")
                .map(|s| s.to_string())
                .unwrap_or_else(|| collapse_text(t))
        })
        .unwrap_or_default();
    event.start = datetime::normalize(&date_guess);

    event.location = element
        .select(&LOCATION)
        .next()
        .map(|l| collapse_text(l))
        .unwrap_or_default();

    event.description = truncate_chars(&collapse_text(element), MAX_DESCRIPTION_LEN);
    event
}

/// All text under a node with whitespace collapsed.
fn collapse_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

fn resolve(base: Option<&Url>, href: &str) -> Option<String> {
    match base {
        Some(base) => base.join(href).ok().map(|u| u.to_string()),
        None => Url::parse(href).ok().map(|u| u.to_string()),
    }
}
