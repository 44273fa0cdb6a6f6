use crate::datetime::{self, REFERENCE_TZ};
use crate::sources::SourceAdapter;
use crate::types::{AggregatorError, CandidateEvent, Result, SourceDescriptor};
use chrono::{DateTime, TimeZone};
use chrono_tz::Tz;
use icalendar::{Calendar, CalendarComponent, CalendarDateTime, Component, DatePerhapsTime, Event};
use tracing::debug;

/// iCalendar adapter: selects VEVENT components only, skipping timezone
/// definitions and other non-occurrence blocks.
pub struct CalendarAdapter;

impl SourceAdapter for CalendarAdapter {
    fn parse(&self, payload: &str, src: &SourceDescriptor) -> Result<Vec<CandidateEvent>> {
        let calendar: Calendar = payload
            .parse()
            .map_err(|e| AggregatorError::Parse(format!("failed to parse calendar: {e}")))?;

        let events: Vec<CandidateEvent> = calendar
            .components
            .iter()
            .filter_map(|c| match c {
                CalendarComponent::Event(vevent) => Some(to_candidate(vevent, src)),
                _ => None,
            })
            .collect();

        debug!("Calendar {} yielded {} occurrences", src.name, events.len());
        Ok(events)
    }
}

fn to_candidate(vevent: &Event, src: &SourceDescriptor) -> CandidateEvent {
    let mut event = CandidateEvent::new(&src.name);
    event.title = prop_value(vevent, "SUMMARY");
    event.description = prop_value(vevent, "DESCRIPTION");
    event.location = prop_value(vevent, "LOCATION");
    event.url = match prop_value(vevent, "URL") {
        url if url.is_empty() => src.url.clone(),
        url => url,
    };
    event.start = vevent.get_start().and_then(resolve_time);
    event.end = vevent.get_end().and_then(resolve_time);
    event
}

fn prop_value(vevent: &Event, name: &str) -> String {
    vevent
        .property_value(name)
        .map(|v| v.trim().to_string())
        .unwrap_or_default()
}

/// A missing or unresolvable timestamp leaves the field `None`; the
/// occurrence itself is still emitted.
fn resolve_time(value: DatePerhapsTime) -> Option<DateTime<Tz>> {
    match value {
        DatePerhapsTime::Date(date) => datetime::local(date.and_hms_opt(0, 0, 0)?),
        DatePerhapsTime::DateTime(CalendarDateTime::Utc(dt)) => {
            Some(dt.with_timezone(&REFERENCE_TZ))
        }
        DatePerhapsTime::DateTime(CalendarDateTime::Floating(naive)) => datetime::local(naive),
        DatePerhapsTime::DateTime(CalendarDateTime::WithTimezone { date_time, tzid }) => {
            let tz: Tz = tzid.parse().ok()?;
            Some(
                tz.from_local_datetime(&date_time)
                    .earliest()?
                    .with_timezone(&REFERENCE_TZ),
            )
        }
    }
}
