use crate::datetime;
use crate::dedupe::dedupe;
use crate::fetcher::Fetcher;
use crate::geo;
use crate::sources::adapter_for;
use crate::tagger;
use crate::types::{
    AggregateOutcome, AggregatorError, CandidateEvent, Center, Result, SourceDescriptor,
    SourceStatus, TaggedEvent,
};
use chrono::{DateTime, Duration};
use chrono_tz::Tz;
use std::sync::Arc;
use tracing::{info, warn};

/// Orchestrates a run: concurrent bounded fetch+parse of every configured
/// source, then the strictly ordered filter stages over the combined
/// candidate superset.
pub struct Aggregator {
    sources: Vec<SourceDescriptor>,
    fetcher: Arc<Fetcher>,
}

impl Aggregator {
    pub fn new(sources: Vec<SourceDescriptor>, fetcher: Arc<Fetcher>) -> Self {
        Self { sources, fetcher }
    }

    /// Aggregate upcoming events around `center`.
    ///
    /// Per-source and per-record problems never surface as errors; they
    /// degrade the result and are reported in the returned source
    /// statuses. Only structurally invalid arguments fail.
    pub async fn aggregate(
        &self,
        center: Center,
        radius_miles: f64,
        window_days: i64,
        interests: &[String],
    ) -> Result<AggregateOutcome> {
        validate(center, radius_miles, window_days)?;

        let (candidates, sources) = self.collect_candidates().await;
        info!(
            "Gathered {} candidates from {} sources ({} failed)",
            candidates.len(),
            sources.len(),
            sources.iter().filter(|s| !s.ok).count()
        );

        let events = select_events(
            candidates,
            center,
            radius_miles,
            window_days,
            interests,
            datetime::now(),
        );
        Ok(AggregateOutcome { events, sources })
    }

    /// Fetch and parse every source concurrently. The fetcher's semaphore
    /// bounds in-flight requests; a failing source contributes an empty
    /// set plus a failed status, without affecting siblings.
    async fn collect_candidates(&self) -> (Vec<CandidateEvent>, Vec<SourceStatus>) {
        let tasks = self.sources.iter().map(|src| async move {
            match self.ingest_source(src).await {
                Ok(events) => {
                    let status = SourceStatus {
                        name: src.name.clone(),
                        ok: true,
                        error: None,
                        events: events.len(),
                    };
                    (events, status)
                }
                Err(e) => {
                    warn!("Source {} failed: {}", src.name, e);
                    let status = SourceStatus {
                        name: src.name.clone(),
                        ok: false,
                        error: Some(e.to_string()),
                        events: 0,
                    };
                    (Vec::new(), status)
                }
            }
        });

        // join_all keeps source order, so the merge is independent of
        // which fetch finishes first.
        let mut candidates = Vec::new();
        let mut statuses = Vec::new();
        for (events, status) in futures::future::join_all(tasks).await {
            candidates.extend(events);
            statuses.push(status);
        }
        (candidates, statuses)
    }

    async fn ingest_source(&self, src: &SourceDescriptor) -> Result<Vec<CandidateEvent>> {
        let payload = self.fetcher.fetch(&src.url).await?;
        adapter_for(src.kind).parse(&payload, src)
    }
}

// Upper bound on the look-ahead window; keeps the date arithmetic in
// `select_events` well inside chrono's representable range.
const MAX_WINDOW_DAYS: i64 = 3650;

fn validate(center: Center, radius_miles: f64, window_days: i64) -> Result<()> {
    if !center.lat.is_finite()
        || !center.lon.is_finite()
        || center.lat.abs() > 90.0
        || center.lon.abs() > 180.0
    {
        return Err(AggregatorError::Config(format!(
            "unsupported center coordinates: {}, {}",
            center.lat, center.lon
        )));
    }
    if !radius_miles.is_finite() || radius_miles <= 0.0 {
        return Err(AggregatorError::Config(format!(
            "invalid radius: {radius_miles}"
        )));
    }
    if !(0..=MAX_WINDOW_DAYS).contains(&window_days) {
        return Err(AggregatorError::Config(format!(
            "invalid window: {window_days} days"
        )));
    }
    Ok(())
}

/// The sequential pipeline stages over an already-gathered candidate
/// superset: time window, geofence, tagging, interest filter,
/// deduplication, chronological sort.
pub fn select_events(
    candidates: Vec<CandidateEvent>,
    center: Center,
    radius_miles: f64,
    window_days: i64,
    interests: &[String],
    now: DateTime<Tz>,
) -> Vec<TaggedEvent> {
    let window_start = datetime::start_of_day(now);
    let window_end = datetime::end_of_day(now + Duration::days(window_days));

    // Records without a valid start cannot be placed in the window.
    let in_window: Vec<CandidateEvent> = candidates
        .into_iter()
        .filter(|e| match e.start {
            Some(start) => start >= window_start && start <= window_end,
            None => false,
        })
        .collect();

    let geofenced: Vec<CandidateEvent> = in_window
        .into_iter()
        .filter(|e| geo::within_area(e, center, radius_miles))
        .collect();

    let tagged: Vec<TaggedEvent> = geofenced
        .into_iter()
        .map(|event| {
            let tags = tagger::tag(&event);
            TaggedEvent { event, tags }
        })
        .collect();

    let by_interest: Vec<TaggedEvent> = if interests.is_empty() {
        tagged
    } else {
        tagged
            .into_iter()
            .filter(|e| e.tags.iter().any(|t| interests.iter().any(|i| i == t)))
            .collect()
    };

    let mut events = dedupe(by_interest);

    // Lexicographic order on the canonical ISO form matches chronological
    // order; records with no start render as "" and therefore sort first.
    events.sort_by(|a, b| a.start_iso().cmp(&b.start_iso()));
    info!("Selected {} events", events.len());
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::America::Denver;

    fn noon_reference() -> DateTime<Tz> {
        Denver.with_ymd_and_hms(2025, 7, 10, 12, 0, 0).unwrap()
    }

    fn local_candidate(title: &str, start: Option<DateTime<Tz>>) -> CandidateEvent {
        let mut ev = CandidateEvent::new("test");
        ev.title = title.to_string();
        ev.location = "Littleton".to_string();
        ev.start = start;
        ev
    }

    fn center() -> Center {
        Center { lat: 39.61, lon: -105.01 }
    }

    #[test]
    fn window_boundaries_are_inclusive() {
        let now = noon_reference();
        let at_start = Denver.with_ymd_and_hms(2025, 7, 10, 0, 0, 0).unwrap();
        let before_start = at_start - Duration::seconds(1);
        let at_end = Denver.with_ymd_and_hms(2025, 7, 24, 23, 59, 59).unwrap();
        let past_end = at_end + Duration::seconds(1);

        let candidates = vec![
            local_candidate("at start", Some(at_start)),
            local_candidate("before start", Some(before_start)),
            local_candidate("at end", Some(at_end)),
            local_candidate("past end", Some(past_end)),
            local_candidate("undated", None),
        ];

        let events = select_events(candidates, center(), 10.0, 14, &[], now);
        let titles: Vec<&str> = events.iter().map(|e| e.event.title.as_str()).collect();
        assert!(titles.contains(&"at start"));
        assert!(titles.contains(&"at end"));
        assert!(!titles.contains(&"before start"));
        assert!(!titles.contains(&"past end"));
        assert!(!titles.contains(&"undated"));
    }

    #[test]
    fn interest_filter_intersects_tags() {
        let now = noon_reference();
        let start = Denver.with_ymd_and_hms(2025, 7, 12, 18, 0, 0).unwrap();
        let mut concert = local_candidate("Summer Concert", Some(start));
        concert.description = "Live band in Littleton".to_string();
        let hearing = local_candidate("Planning Commission hearing", Some(start));

        let interests = vec!["Music".to_string()];
        let events = select_events(vec![concert, hearing], center(), 10.0, 14, &interests, now);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event.title, "Summer Concert");
        assert!(events[0].tags.iter().any(|t| t == "Music"));
    }

    #[test]
    fn empty_interest_list_keeps_everything_in_area() {
        let now = noon_reference();
        let start = Denver.with_ymd_and_hms(2025, 7, 12, 18, 0, 0).unwrap();
        let candidates = vec![
            local_candidate("Summer Concert", Some(start)),
            local_candidate("Planning Commission hearing", Some(start)),
        ];
        let events = select_events(candidates, center(), 10.0, 14, &[], now);
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn geofence_prefers_coordinates_over_text() {
        let now = noon_reference();
        let start = Denver.with_ymd_and_hms(2025, 7, 12, 18, 0, 0).unwrap();
        // Location text matches, but the coordinates are far away.
        let mut far = local_candidate("Distant show", Some(start));
        far.lat = Some(40.7);
        far.lon = Some(-74.0);

        let events = select_events(vec![far], center(), 10.0, 14, &[], now);
        assert!(events.is_empty());
    }

    #[test]
    fn final_order_is_chronological() {
        let now = noon_reference();
        let d12 = Denver.with_ymd_and_hms(2025, 7, 12, 18, 0, 0).unwrap();
        let d11 = Denver.with_ymd_and_hms(2025, 7, 11, 9, 0, 0).unwrap();
        let candidates = vec![
            local_candidate("Later", Some(d12)),
            local_candidate("Earlier", Some(d11)),
        ];
        let events = select_events(candidates, center(), 10.0, 14, &[], now);
        let titles: Vec<&str> = events.iter().map(|e| e.event.title.as_str()).collect();
        assert_eq!(titles, vec!["Earlier", "Later"]);
    }

    #[test]
    fn invalid_center_is_a_config_error() {
        let err = validate(Center { lat: 120.0, lon: 0.0 }, 10.0, 14).unwrap_err();
        assert!(matches!(err, AggregatorError::Config(_)));
        assert!(validate(center(), 10.0, 14).is_ok());
    }

    #[test]
    fn window_outside_supported_range_is_a_config_error() {
        assert!(matches!(
            validate(center(), 10.0, -1),
            Err(AggregatorError::Config(_))
        ));
        assert!(matches!(
            validate(center(), 10.0, i64::MAX),
            Err(AggregatorError::Config(_))
        ));
        assert!(validate(center(), 10.0, MAX_WINDOW_DAYS).is_ok());
    }
}
