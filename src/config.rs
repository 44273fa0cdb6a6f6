//! Static reference data consumed by the pipeline as plain configuration:
//! the source list, the ZIP-to-centroid table and the interest taxonomy.

use crate::types::{Center, SourceDescriptor};

/// The fixed interest taxonomy. Subscribers pick any subset of these; the
/// tagger assigns the same names.
pub const INTERESTS: &[&str] = &[
    "Music",
    "Arts",
    "Theater",
    "Comedy",
    "Markets",
    "Food & Drink",
    "Outdoors",
    "Fitness",
    "Sports",
    "Kids & Family",
    "Library",
    "Classes & Workshops",
    "City & Civic",
];

/// All event sources targeted by the aggregator.
pub fn default_sources() -> Vec<SourceDescriptor> {
    vec![
        // City calendars
        SourceDescriptor::feed(
            "Greenwood Village – RSS",
            "https://www.greenwoodvillage.com/rss.aspx?cat=29",
        ),
        SourceDescriptor::calendar(
            "Greenwood Village – iCal",
            "https://www.greenwoodvillage.com/iCalendar.aspx",
        ),
        SourceDescriptor::markup(
            "City of Littleton – Events",
            "https://www.littletonco.gov/Community/City-Calendars",
            ".event-list-item, .calendar-list",
        ),
        SourceDescriptor::markup(
            "Englewood – Events",
            "https://www.englewoodco.gov/our-city/events",
            ".listing .event",
        ),
        SourceDescriptor::markup(
            "Centennial – Community Calendar",
            "https://www.centennialco.gov/Residents/Community-Resource-Hub/Community-Calendar",
            "[data-ct-event]",
        ),
        SourceDescriptor::markup(
            "City of Lone Tree – Events",
            "https://cityoflonetree.com/events/",
            ".tribe-events-calendar-list__event, .event",
        ),
        // Recreation and community associations
        SourceDescriptor::markup(
            "HRCA – Events",
            "https://hrcaonline.org/events",
            ".EventList .EventListItem, .events-list .event",
        ),
        SourceDescriptor::markup(
            "South Suburban – REC1",
            "https://register.ssprd.org/CO/south-suburban-parks-rec/catalog/index?filter=dGFiJTVCMTEzMTklNUQ9MSZzZWFyY2g9",
            ".section .item",
        ),
        // Libraries
        SourceDescriptor::markup(
            "Arapahoe Libraries – Events",
            "https://arapahoelibraries.bibliocommons.com/v2/events",
            "[data-testid='event-card']",
        ),
        SourceDescriptor::markup(
            "Douglas County Libraries – Events",
            "https://go.dcl.org/events",
            ".event, .event-list-item, .list-item",
        ),
        // Large venues and attractions
        SourceDescriptor::markup(
            "Fiddler's Green Amphitheatre",
            "https://www.fiddlersgreenamp.com/calendar/",
            ".event, .event-card, .calendar-listing",
        ),
        SourceDescriptor::markup(
            "Hudson Gardens – Public Events",
            "https://www.hudsongardens.org/calendar/",
            ".tribe-events-calendar-list__event, .event",
        ),
        SourceDescriptor::markup(
            "Lone Tree Arts Center",
            "https://www.lonetreeartscenter.org/events",
            ".event, .event-listing",
        ),
        SourceDescriptor::markup(
            "The Streets at SouthGlenn – Events & Sales",
            "https://www.shopsouthglenn.com/events-sales/",
            ".event, .events, .list",
        ),
        SourceDescriptor::markup(
            "Park Meadows – News & Events",
            "https://www.parkmeadows.com/en/events/",
            "a[href*='/events/'], .event",
        ),
        SourceDescriptor::markup(
            "Aspen Grove – Events",
            "https://aspengrovecenter.com/event-listings/",
            ".event, .listing",
        ),
        SourceDescriptor::markup(
            "High Line Canal Conservancy – Events",
            "https://highlinecanal.org/events/",
            ".tribe-events-calendar-list__event, .event",
        ),
    ]
}

/// ZIP code centroids for the covered area. Approximate centers, used only
/// to seed the geofence.
const ZIPS: &[(&str, f64, f64)] = &[
    ("80110", 39.66, -104.99),
    ("80111", 39.61, -104.89),
    ("80112", 39.58, -104.86),
    ("80113", 39.65, -104.97),
    ("80120", 39.61, -105.01),
    ("80121", 39.59, -104.96),
    ("80122", 39.58, -104.96),
    ("80123", 39.62, -105.08),
    ("80124", 39.53, -104.88),
    ("80125", 39.49, -105.06),
    ("80126", 39.55, -104.97),
    ("80127", 39.59, -105.14),
    ("80128", 39.58, -105.08),
    ("80129", 39.53, -105.01),
    ("80130", 39.54, -104.93),
    ("80134", 39.49, -104.79),
    ("80138", 39.53, -104.72),
    ("80163", 39.54, -104.89),
];

/// Look up the centroid for a supported ZIP code.
pub fn zip_centroid(zip: &str) -> Option<Center> {
    ZIPS.iter()
        .find(|(z, _, _)| *z == zip)
        .map(|&(_, lat, lon)| Center { lat, lon })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_zip_resolves() {
        let center = zip_centroid("80111").unwrap();
        assert!((center.lat - 39.61).abs() < 1e-9);
        assert!((center.lon - -104.89).abs() < 1e-9);
    }

    #[test]
    fn unknown_zip_is_none() {
        assert!(zip_centroid("10001").is_none());
    }

    #[test]
    fn markup_sources_carry_selectors() {
        for src in default_sources() {
            match src.kind {
                crate::types::SourceKind::Markup => assert!(src.selector.is_some(), "{}", src.name),
                _ => assert!(src.selector.is_none(), "{}", src.name),
            }
        }
    }
}
