use chrono::DateTime;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// The three source formats the pipeline knows how to ingest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Feed,
    CalendarFeed,
    Markup,
}

/// A configured event source. Immutable once built at process start.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceDescriptor {
    pub kind: SourceKind,
    pub name: String,
    pub url: String,
    /// CSS selector locating event items; only meaningful for `Markup` sources.
    pub selector: Option<String>,
}

impl SourceDescriptor {
    pub fn feed(name: &str, url: &str) -> Self {
        Self {
            kind: SourceKind::Feed,
            name: name.to_string(),
            url: url.to_string(),
            selector: None,
        }
    }

    pub fn calendar(name: &str, url: &str) -> Self {
        Self {
            kind: SourceKind::CalendarFeed,
            name: name.to_string(),
            url: url.to_string(),
            selector: None,
        }
    }

    pub fn markup(name: &str, url: &str, selector: &str) -> Self {
        Self {
            kind: SourceKind::Markup,
            name: name.to_string(),
            url: url.to_string(),
            selector: Some(selector.to_string()),
        }
    }
}

/// One event extracted from a single source, before filtering and tagging.
///
/// `start` is either a valid instant in the reference timezone or `None`;
/// adapters never leak raw unparsed date strings downstream.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateEvent {
    pub source: String,
    pub title: String,
    pub url: String,
    pub description: String,
    pub location: String,
    pub start: Option<DateTime<Tz>>,
    pub end: Option<DateTime<Tz>>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl CandidateEvent {
    pub fn new(source: &str) -> Self {
        Self {
            source: source.to_string(),
            title: String::new(),
            url: String::new(),
            description: String::new(),
            location: String::new(),
            start: None,
            end: None,
            lat: None,
            lon: None,
        }
    }

    /// Canonical ISO-8601 rendering of the start instant, empty when absent.
    /// Lexicographic order on this string matches chronological order, which
    /// the final sort and the dedup key both rely on.
    pub fn start_iso(&self) -> String {
        self.start.map(|dt| dt.to_rfc3339()).unwrap_or_default()
    }
}

/// A candidate event plus its taxonomy tags. Tagging produces fresh records
/// rather than mutating candidates in place.
#[derive(Debug, Clone, Serialize)]
pub struct TaggedEvent {
    #[serde(flatten)]
    pub event: CandidateEvent,
    pub tags: Vec<String>,
}

impl TaggedEvent {
    pub fn start_iso(&self) -> String {
        self.event.start_iso()
    }
}

/// Per-source outcome of an aggregation run. Failures never abort the run;
/// they surface here so operators can diagnose silently-degraded output.
#[derive(Debug, Clone, Serialize)]
pub struct SourceStatus {
    pub name: String,
    pub ok: bool,
    pub error: Option<String>,
    pub events: usize,
}

/// The result of one aggregation run: the final ordered event list together
/// with the per-source status report.
#[derive(Debug, Serialize)]
pub struct AggregateOutcome {
    pub events: Vec<TaggedEvent>,
    pub sources: Vec<SourceStatus>,
}

/// Geographic center of the subscriber's area.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Center {
    pub lat: f64,
    pub lon: f64,
}

/// HTTP fetch layer configuration.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    /// Global cap on in-flight source fetches. Excess requests queue FIFO.
    pub concurrency: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "suburban-events/1.0 (+local)".to_string(),
            timeout_seconds: 20,
            concurrency: 5,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AggregatorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, AggregatorError>;
