//! Keyword-based event classification against the fixed interest taxonomy.

use crate::types::CandidateEvent;
use once_cell::sync::Lazy;
use regex::Regex;

fn patterns(exprs: &[&str]) -> Vec<Regex> {
    exprs
        .iter()
        .map(|e| Regex::new(&format!("(?i){e}")).expect("valid tagger pattern"))
        .collect()
}

/// Category name paired with the patterns that assign it. Order matches the
/// taxonomy in `config::INTERESTS`.
static KEYWORDS: Lazy<Vec<(&'static str, Vec<Regex>)>> = Lazy::new(|| {
    vec![
        ("Music", patterns(&[r"concert|band|orchestra|dj\b|open mic"])),
        ("Arts", patterns(&[r"\bart\b|gallery|exhibit|exhibition|sculpture|craft fair"])),
        ("Theater", patterns(&[r"theatre|theater|play\b|musical\b|improv show"])),
        ("Comedy", patterns(&[r"comedy|stand-?up"])),
        ("Markets", patterns(&[r"market|bazaar|fair|flea market|farmers market"])),
        (
            "Food & Drink",
            patterns(&[r"brewery|beer|wine|tasting|food truck|restaurant week|cookoff|brunch"]),
        ),
        ("Outdoors", patterns(&[r"hike|trail|garden|nature walk|wildflower|botanic"])),
        ("Fitness", patterns(&[r"yoga|pilates|boot ?camp|zumba|run\b|5k|spin class"])),
        (
            "Sports",
            patterns(&[r"game\b|match|tournament|league|soccer|baseball|basketball|pickleball|hockey"]),
        ),
        (
            "Kids & Family",
            patterns(&[r"kids|family|children|toddler|storytime|lego|teen|young adult"]),
        ),
        ("Library", patterns(&[r"library|libraries|book club|author talk|storytime"])),
        (
            "Classes & Workshops",
            patterns(&[r"workshop|class|course|lesson|seminar|training|clinic"]),
        ),
        (
            "City & Civic",
            patterns(&[r"city council|town hall|public meeting|board meeting|candidate forum|planning commission"]),
        ),
    ]
});

/// Sources that are always tagged Library regardless of keyword matches.
static LIBRARY_SOURCES: Lazy<Regex> = Lazy::new(|| {
    Regex::new("(?i)Arapahoe Libraries|Douglas County Libraries").expect("valid source pattern")
});

/// Assign interest tags to an event. Pure function of the event's text
/// fields and source name; output is sorted and deduplicated.
pub fn tag(event: &CandidateEvent) -> Vec<String> {
    let haystack = format!(
        "{} {} {} {}",
        event.title, event.description, event.location, event.source
    );
    let mut tags: Vec<String> = KEYWORDS
        .iter()
        .filter(|(_, pats)| pats.iter().any(|p| p.is_match(&haystack)))
        .map(|(name, _)| name.to_string())
        .collect();
    if LIBRARY_SOURCES.is_match(&event.source) && !tags.iter().any(|t| t == "Library") {
        tags.push("Library".to_string());
    }
    tags.sort();
    tags.dedup();
    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(title: &str, description: &str, source: &str) -> CandidateEvent {
        let mut ev = CandidateEvent::new(source);
        ev.title = title.to_string();
        ev.description = description.to_string();
        ev
    }

    #[test]
    fn concert_is_music() {
        let ev = event("Summer Concert in the Park", "", "City Calendar");
        assert_eq!(tag(&ev), vec!["Music"]);
    }

    #[test]
    fn multiple_categories_sorted() {
        let ev = event(
            "Family Yoga Class",
            "A beginner lesson for kids and parents",
            "Rec Center",
        );
        assert_eq!(tag(&ev), vec!["Classes & Workshops", "Fitness", "Kids & Family"]);
    }

    #[test]
    fn library_source_always_tagged_library() {
        let ev = event("Evening Lecture", "", "Arapahoe Libraries – Events");
        assert!(tag(&ev).iter().any(|t| t == "Library"));
    }

    #[test]
    fn library_source_rule_does_not_duplicate() {
        let ev = event("Book Club", "at the library", "Douglas County Libraries – Events");
        let tags = tag(&ev);
        assert_eq!(tags.iter().filter(|t| *t == "Library").count(), 1);
    }

    #[test]
    fn tagging_is_deterministic() {
        let ev = event("Farmers Market 5K", "food truck rally and fun run", "HRCA");
        assert_eq!(tag(&ev), tag(&ev));
    }

    #[test]
    fn unmatched_event_gets_no_tags() {
        let ev = event("Quarterly budget hearing transcript", "", "City of Littleton");
        assert!(tag(&ev).is_empty());
    }
}
