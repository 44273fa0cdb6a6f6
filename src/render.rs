//! Day-grouped HTML rendering of the final event list.

use crate::datetime;
use crate::types::TaggedEvent;
use chrono::Datelike;
use std::env;

const DEFAULT_BRAND: &str = "South Suburban Spotlight";
const COVERAGE_NOTE: &str = "Covering Greenwood Village, Littleton, Englewood, Centennial, \
Lone Tree, Highlands Ranch and surrounding areas.";

const STYLE: &str = "body{font-family:system-ui,-apple-system,Segoe UI,Roboto,sans-serif;margin:0}\n\
.wrap{max-width:760px;margin:0 auto;padding:24px}\n\
h1{font-size:24px;margin:0 0 6px}\n\
h2{font-size:18px;margin:20px 0 8px}\n\
.item{padding:8px 0;border-bottom:1px solid #eee}\n\
.meta{color:#555;font-size:13px}\n\
a{color:#0a6;text-decoration:none}\n\
.src{color:#888;font-size:12px}\n";

/// Render the event list as a self-contained HTML fragment grouped by day.
/// Events with no start collect under a trailing `TBA` group. `area_label`
/// appears in the heading; the brand name can be overridden with the
/// `BRAND_NAME` environment variable.
pub fn render(events: &[TaggedEvent], area_label: &str) -> String {
    let mut groups: Vec<(String, Vec<&TaggedEvent>)> = Vec::new();
    for event in events {
        let label = match event.event.start {
            Some(start) => datetime::day_label(start),
            None => "TBA".to_string(),
        };
        match groups.iter_mut().find(|(l, _)| *l == label) {
            Some((_, list)) => list.push(event),
            None => groups.push((label, vec![event])),
        }
    }

    // Day headers order chronologically by re-parsing their own labels;
    // the undated group always trails.
    let anchor_year = datetime::now().year();
    groups.sort_by_key(|(label, _)| match datetime::parse_day_label(label, anchor_year) {
        Some(date) => (false, date),
        None => (true, chrono::NaiveDate::MAX),
    });

    let brand = env::var("BRAND_NAME").unwrap_or_else(|_| DEFAULT_BRAND.to_string());

    let mut html = String::new();
    html.push_str("<!doctype html><meta charset=\"utf-8\"><style>\n");
    html.push_str(STYLE);
    html.push_str("</style><div class=\"wrap\">");
    html.push_str(&format!(
        "<h1>{}: Events near {}</h1>",
        escape(&brand),
        escape(area_label)
    ));
    html.push_str(&format!("<div class=\"meta\">{COVERAGE_NOTE}</div>"));

    for (label, list) in &groups {
        html.push_str(&format!("<h2>{}</h2>", escape(label)));
        for event in list {
            let time = match event.event.start {
                Some(start) => start.format("%-I:%M%p").to_string(),
                None => "TBA".to_string(),
            };
            let location = match event.event.location.as_str() {
                "" => "TBA",
                loc => loc,
            };
            let tag_note = if event.tags.is_empty() {
                String::new()
            } else {
                format!(
                    " <span class=\"src\">&bull; {}</span>",
                    escape(&event.tags.join(", "))
                )
            };
            html.push_str("<div class=\"item\">");
            html.push_str(&format!(
                "<div><a href=\"{}\">{}</a></div>",
                escape(&event.event.url),
                escape(&event.event.title)
            ));
            html.push_str(&format!(
                "<div class=\"meta\">{} &ndash; {}{}</div>",
                time,
                escape(location),
                tag_note
            ));
            html.push_str(&format!(
                "<div class=\"src\">{}</div>",
                escape(&event.event.source)
            ));
            html.push_str("</div>");
        }
    }

    html.push_str("</div>");
    html
}

/// Minimal HTML escaping for text and attribute positions.
fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
