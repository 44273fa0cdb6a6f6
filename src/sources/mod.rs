pub mod calendar;
pub mod feed;
pub mod markup;

use crate::types::{CandidateEvent, Result, SourceDescriptor, SourceKind};

/// Converts one source's raw payload into candidate event records.
///
/// Adapters swallow malformed per-item input; only a top-level parse
/// failure of the whole payload is returned as an error, which the
/// orchestrator isolates to that source.
pub trait SourceAdapter: Send + Sync {
    fn parse(&self, payload: &str, src: &SourceDescriptor) -> Result<Vec<CandidateEvent>>;
}

/// Select the adapter matching a descriptor's kind.
pub fn adapter_for(kind: SourceKind) -> &'static dyn SourceAdapter {
    match kind {
        SourceKind::Feed => &feed::FeedAdapter,
        SourceKind::CalendarFeed => &calendar::CalendarAdapter,
        SourceKind::Markup => &markup::MarkupAdapter,
    }
}
