//! Geofencing: great-circle distance when a source supplies coordinates,
//! textual place-name matching when it does not.

use crate::types::{CandidateEvent, Center};

/// Earth radius in statute miles.
const EARTH_RADIUS_MILES: f64 = 3958.8;

/// Place names of the covered area, matched against location + description
/// when an event carries no coordinates. A deliberately lossy heuristic:
/// false negatives are preferred over geographically wrong inclusions, and
/// the list is not exhaustive for other areas.
const LOCAL_PLACE_NAMES: &[&str] = &[
    "greenwood",
    "littleton",
    "englewood",
    "centennial",
    "lone tree",
    "highlands ranch",
    "roxborough",
    "ken caryl",
    "columbine",
    "parker",
    "dtc",
];

/// Haversine distance between two points, in miles.
pub fn haversine_miles(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_MILES * a.sqrt().asin()
}

/// Decide whether an event falls inside the target area. Coordinates take
/// precedence; events without them pass only on a place-name match.
pub fn within_area(event: &CandidateEvent, center: Center, radius_miles: f64) -> bool {
    if let (Some(lat), Some(lon)) = (event.lat, event.lon) {
        return haversine_miles(lat, lon, center.lat, center.lon) <= radius_miles;
    }
    let text = format!("{} {}", event.location, event.description).to_lowercase();
    LOCAL_PLACE_NAMES.iter().any(|name| text.contains(name))
}
