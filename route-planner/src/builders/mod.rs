//! Route candidate builders.
//!
//! Four builders assemble full start-to-end itineraries: direct transit,
//! bike-first (ride from the start-side station, then transit), bike-last
//! (transit, then ride into the end-side station), and the single-waypoint
//! variant. Each returns zero or more candidates; provider failures inside
//! a builder abort only that builder's attempt.

mod bike_first;
mod bike_last;
mod direct;
mod waypoint;

pub use bike_first::build_bike_first;
pub use bike_last::build_bike_last;
pub use direct::build_direct;
pub use waypoint::build_waypoint;

use crate::domain::{RouteSegment, SegmentKind, TrafficType, TransitLeg, TransitPath};
use crate::geo::{Coordinate, distance_m};

/// A named endpoint of the requested trip.
#[derive(Debug, Clone)]
pub struct Place {
    pub name: String,
    pub position: Coordinate,
}

impl Place {
    pub fn new(name: impl Into<String>, position: Coordinate) -> Self {
        Self {
            name: name.into(),
            position,
        }
    }
}

/// Append `segment` to `out`, forcing a shared boundary coordinate with
/// the previous segment. Empty segments are dropped.
pub(crate) fn append_stitched(out: &mut Vec<RouteSegment>, mut segment: RouteSegment) {
    if segment.points.is_empty() {
        return;
    }
    if let Some(prev_last) = out.last().and_then(|s| s.last_point()) {
        if segment.points.first() != Some(&prev_last) {
            segment.points.insert(0, prev_last);
        }
    }
    out.push(segment);
}

/// Build the renderable bike segment from a ridden geometry.
pub(crate) fn bike_segment(points: Vec<Coordinate>) -> RouteSegment {
    RouteSegment::new(SegmentKind::Bike, points)
}

/// Length of a polyline in metres.
pub(crate) fn polyline_length_m(points: &[Coordinate]) -> f64 {
    points
        .windows(2)
        .map(|pair| distance_m(pair[0], pair[1]))
        .sum()
}

/// Synthetic bike-leg duration: whole minutes, never below one.
pub(crate) fn bike_leg_mins(budget_secs: u32) -> u32 {
    ((budget_secs as f64 / 60.0).round() as u32).max(1)
}

/// Fill in display names on walk legs whose endpoints are unresolved.
///
/// A walk leg takes its missing endpoint name from the adjacent leg's
/// matching boundary (transit stop name, lane start/end, or a bike leg's
/// station); legs at the whole-trip boundary take the trip endpoint names.
pub(crate) fn attach_boundary_names(legs: &mut [TransitLeg], start_name: &str, end_name: &str) {
    for i in 0..legs.len() {
        if legs[i].traffic_type != TrafficType::Walk {
            continue;
        }
        if legs[i].start_name.is_none() && i > 0 {
            let name = entry_exit_name(&legs[i - 1], false);
            legs[i].start_name = name;
        }
        if legs[i].end_name.is_none() && i + 1 < legs.len() {
            let name = entry_exit_name(&legs[i + 1], true);
            legs[i].end_name = name;
        }
    }

    if let Some(first) = legs.first_mut() {
        if first.traffic_type == TrafficType::Walk && first.start_name.is_none() {
            first.start_name = Some(start_name.to_string());
        }
    }
    if let Some(last) = legs.last_mut() {
        if last.traffic_type == TrafficType::Walk && last.end_name.is_none() {
            last.end_name = Some(end_name.to_string());
        }
    }
}

/// The name of the side of `leg` a neighboring walk leg touches:
/// `entry` picks the leg's start side, otherwise its end side.
fn entry_exit_name(leg: &TransitLeg, entry: bool) -> Option<String> {
    if entry {
        leg.start_name
            .clone()
            .or_else(|| leg.first_stop().map(|s| s.name.clone()))
    } else {
        leg.end_name
            .clone()
            .or_else(|| leg.last_stop().map(|s| s.name.clone()))
    }
}

/// Select up to `limit` paths, preferring transit-bearing alternatives.
///
/// When too few transit-bearing alternatives exist, non-transit ones fill
/// the remainder and the fallback is logged.
pub(crate) fn select_transit_preferred(paths: Vec<TransitPath>, limit: usize) -> Vec<TransitPath> {
    let (with_transit, without): (Vec<_>, Vec<_>) =
        paths.into_iter().partition(TransitPath::has_transit_leg);

    let mut selected = with_transit;
    selected.truncate(limit);
    if selected.len() < limit && !without.is_empty() {
        let fill = (limit - selected.len()).min(without.len());
        tracing::warn!(fill, "too few transit-bearing alternatives, using non-transit fallback");
        selected.extend(without.into_iter().take(fill));
    }
    selected
}
