//! Assembled route candidates.

use super::{RouteSegment, TrafficType, TransitLeg};

/// The itinerary summary shown alongside the rendered route: total travel
/// time plus the ordered leg list.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RouteSummary {
    pub total_time_mins: u32,
    pub legs: Vec<TransitLeg>,
}

/// One complete start-to-end itinerary proposal.
///
/// # Invariants
///
/// - Consecutive segments share their boundary coordinate (stitched).
/// - Boundary walk legs in the summary carry resolved start/end names.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RouteCandidate {
    pub segments: Vec<RouteSegment>,
    pub summary: RouteSummary,
}

impl RouteCandidate {
    /// Total minutes spent on bike legs.
    pub fn bike_time_mins(&self) -> u32 {
        self.leg_time_mins(TrafficType::Bike)
    }

    /// Total minutes spent on walk legs.
    pub fn walk_time_mins(&self) -> u32 {
        self.leg_time_mins(TrafficType::Walk)
    }

    fn leg_time_mins(&self, t: TrafficType) -> u32 {
        self.summary
            .legs
            .iter()
            .filter(|l| l.traffic_type == t)
            .map(|l| l.section_time_mins)
            .sum()
    }

    pub fn has_bike_leg(&self) -> bool {
        self.summary
            .legs
            .iter()
            .any(|l| l.traffic_type == TrafficType::Bike)
    }

    pub fn has_non_bike_leg(&self) -> bool {
        self.summary
            .legs
            .iter()
            .any(|l| l.traffic_type != TrafficType::Bike)
    }

    /// The key used for duplicate removal: the serialized summary, falling
    /// back to the serialized segment list when the summary has no legs.
    pub fn dedup_key(&self) -> String {
        if self.summary.legs.is_empty() {
            serde_json::to_string(&self.segments).unwrap_or_default()
        } else {
            serde_json::to_string(&self.summary).unwrap_or_default()
        }
    }
}
