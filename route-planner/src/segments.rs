//! Path segment processing.
//!
//! Converts one transit-provider path into map-drawable segments. Bus and
//! subway legs carry their own stop geometry; walk gaps carry nothing, so
//! their endpoints are resolved against the trip boundaries and the
//! neighboring transit legs and their geometry is fetched from the
//! pedestrian provider. Legs are processed strictly in order: stitching
//! makes each segment start where the previous one ended, so a leg's
//! geometry depends on everything before it.

use crate::domain::{RouteSegment, SegmentKind, TrafficType, TransitLeg, TransitPath};
use crate::geo::Coordinate;
use crate::providers::PedestrianApi;

/// Convert `path` into renderable segments.
///
/// Returns `None` when a required pedestrian fetch fails outright, meaning
/// this provider path is unusable and the caller should try an alternate
/// candidate. An empty-but-valid result is `Some(vec![])`, distinct from
/// the sentinel.
///
/// Legs that contribute zero coordinates (unresolvable walk gaps, degraded
/// pedestrian responses) are dropped from the output, not rendered.
pub async fn process_path<P: PedestrianApi>(
    pedestrian: &P,
    path: &TransitPath,
    trip_start: Coordinate,
    trip_end: Coordinate,
) -> Option<Vec<RouteSegment>> {
    let mut segments: Vec<RouteSegment> = Vec::with_capacity(path.legs.len());

    for (i, leg) in path.legs.iter().enumerate() {
        let mut points = match leg.traffic_type {
            TrafficType::Subway | TrafficType::Bus => {
                leg.stops.iter().map(|s| s.position).collect()
            }
            TrafficType::Walk => {
                match resolve_walk_endpoints(&path.legs, i, trip_start, trip_end) {
                    Some((from, to)) => match pedestrian.walk_path(from, to).await {
                        Ok(points) => points,
                        Err(e) => {
                            tracing::warn!(error = %e, leg = i, "abandoning path: walk fetch failed");
                            return None;
                        }
                    },
                    None => {
                        tracing::debug!(leg = i, "walk leg endpoints unresolvable, skipping");
                        Vec::new()
                    }
                }
            }
            // Synthetic bike legs are rendered by the candidate builders,
            // never fed through a provider path.
            TrafficType::Bike => Vec::new(),
        };

        if points.is_empty() {
            continue;
        }

        // Stitch: share the previous segment's last coordinate.
        if let Some(prev_last) = segments.last().and_then(|s| s.last_point()) {
            points.insert(0, prev_last);
        }

        segments.push(RouteSegment::new(
            SegmentKind::from_traffic_type(leg.traffic_type),
            points,
        ));
    }

    Some(segments)
}

/// Resolve a walk leg's endpoints.
///
/// Start: the overall trip start for the first leg, else the last stop of
/// the immediately preceding transit leg. End: the overall trip end for the
/// last leg, else the first stop of the immediately following transit leg.
/// Returns `None` when either side cannot be resolved (e.g. two consecutive
/// walk legs with no trip boundary on one side).
fn resolve_walk_endpoints(
    legs: &[TransitLeg],
    i: usize,
    trip_start: Coordinate,
    trip_end: Coordinate,
) -> Option<(Coordinate, Coordinate)> {
    let from = if i == 0 {
        Some(trip_start)
    } else {
        transit_boundary(legs.get(i - 1), |leg| leg.last_stop())
    };

    let to = if i == legs.len() - 1 {
        Some(trip_end)
    } else {
        transit_boundary(legs.get(i + 1), |leg| leg.first_stop())
    };

    Some((from?, to?))
}

fn transit_boundary<'a>(
    leg: Option<&'a TransitLeg>,
    pick: impl Fn(&'a TransitLeg) -> Option<&'a crate::domain::Stop>,
) -> Option<Coordinate> {
    let leg = leg?;
    if !leg.traffic_type.is_transit() {
        return None;
    }
    pick(leg).map(|stop| stop.position)
}
