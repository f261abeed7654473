//! Fixed waypoints along the trail.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// What kind of stop a landmark triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandmarkKind {
    Fort,
    River,
    /// Scripted vignette with narrative choices.
    Landmark,
    Destination,
}

/// Immutable trail waypoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Landmark {
    pub name: &'static str,
    /// Mile marker measured from the trailhead.
    pub distance: i32,
    pub kind: LandmarkKind,
}

impl Landmark {
    const fn new(name: &'static str, distance: i32, kind: LandmarkKind) -> Self {
        Self {
            name,
            distance,
            kind,
        }
    }
}

/// Every landmark in ascending mile order.
pub const LANDMARKS: [Landmark; 16] = [
    Landmark::new("Kansas River Crossing", 102, LandmarkKind::River),
    Landmark::new("Big Blue River Crossing", 185, LandmarkKind::River),
    Landmark::new("Fort Kearney", 304, LandmarkKind::Fort),
    Landmark::new("Chimney Rock", 554, LandmarkKind::Landmark),
    Landmark::new("Fort Laramie", 640, LandmarkKind::Fort),
    Landmark::new("Independence Rock", 830, LandmarkKind::Landmark),
    Landmark::new("South Pass", 932, LandmarkKind::Landmark),
    Landmark::new("Fort Bridger", 1025, LandmarkKind::Fort),
    Landmark::new("Soda Springs", 1180, LandmarkKind::Landmark),
    Landmark::new("Fort Hall", 1288, LandmarkKind::Fort),
    Landmark::new("Snake River Crossing", 1430, LandmarkKind::River),
    Landmark::new("Fort Boise", 1543, LandmarkKind::Fort),
    Landmark::new("Blue Mountains", 1700, LandmarkKind::Landmark),
    Landmark::new("The Dalles", 1850, LandmarkKind::Landmark),
    Landmark::new("Columbia River", 1950, LandmarkKind::River),
    Landmark::new("Oregon City", 2000, LandmarkKind::Destination),
];

/// First landmark reached or passed at `distance` that has not fired yet.
#[must_use]
pub fn next_arrival(distance: i32, visited: &BTreeSet<String>) -> Option<&'static Landmark> {
    LANDMARKS
        .iter()
        .find(|landmark| landmark.distance <= distance && !visited.contains(landmark.name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_is_sorted_and_ends_at_destination() {
        assert!(
            LANDMARKS
                .windows(2)
                .all(|pair| pair[0].distance < pair[1].distance)
        );
        let last = LANDMARKS.last().expect("non-empty");
        assert_eq!(last.kind, LandmarkKind::Destination);
        assert_eq!(last.distance, crate::constants::GOAL_DISTANCE);
    }

    #[test]
    fn overshoot_returns_earliest_unvisited() {
        let mut visited = BTreeSet::new();
        let first = next_arrival(200, &visited).expect("kansas");
        assert_eq!(first.name, "Kansas River Crossing");
        visited.insert(first.name.to_string());
        let second = next_arrival(200, &visited).expect("big blue");
        assert_eq!(second.name, "Big Blue River Crossing");
        visited.insert(second.name.to_string());
        assert!(next_arrival(200, &visited).is_none());
    }
}
