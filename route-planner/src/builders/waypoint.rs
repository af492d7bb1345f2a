//! Single-waypoint candidate builder.
//!
//! Solves the start-to-waypoint and waypoint-to-end halves independently
//! and combines every pair of alternatives. Also offers one whole-trip
//! bike-only candidate through the waypoint: an explicit waypoint means
//! the rider accepts a longer bike leg, so the budget filter does not
//! apply to it.

use futures::future::try_join;

use crate::config::PlannerConfig;
use crate::domain::{RouteCandidate, RouteSummary, TransitLeg};
use crate::providers::{BikeApi, PedestrianApi, ProviderError, TransitApi};
use crate::segments::process_path;

use super::{
    Place, append_stitched, attach_boundary_names, bike_leg_mins, bike_segment, polyline_length_m,
};

/// Build waypoint candidates: pairwise transit combinations through the
/// waypoint plus a direct bike-only route.
pub async fn build_waypoint<T, P, B>(
    transit: &T,
    pedestrian: &P,
    bike: &B,
    start: &Place,
    waypoint: &Place,
    end: &Place,
    config: &PlannerConfig,
) -> Result<Vec<RouteCandidate>, ProviderError>
where
    T: TransitApi,
    P: PedestrianApi,
    B: BikeApi,
{
    let (first_half, second_half) = try_join(
        transit.search(start.position, waypoint.position, &[]),
        transit.search(waypoint.position, end.position, &[]),
    )
    .await?;

    let first_half: Vec<_> = first_half
        .into_iter()
        .take(config.max_waypoint_paths)
        .collect();
    let second_half: Vec<_> = second_half
        .into_iter()
        .take(config.max_waypoint_paths)
        .collect();

    let mut candidates = Vec::new();
    for a_path in &first_half {
        for b_path in &second_half {
            let Some(a_segments) =
                process_path(pedestrian, a_path, start.position, waypoint.position).await
            else {
                continue;
            };
            let Some(b_segments) =
                process_path(pedestrian, b_path, waypoint.position, end.position).await
            else {
                continue;
            };

            let mut segments = Vec::new();
            for segment in a_segments {
                append_stitched(&mut segments, segment);
            }
            for segment in b_segments {
                append_stitched(&mut segments, segment);
            }

            let mut legs = Vec::with_capacity(a_path.legs.len() + b_path.legs.len());
            legs.extend(a_path.legs.iter().cloned());
            legs.extend(b_path.legs.iter().cloned());
            attach_boundary_names(&mut legs, &start.name, &end.name);

            candidates.push(RouteCandidate {
                segments,
                summary: RouteSummary {
                    total_time_mins: a_path.total_time_mins + b_path.total_time_mins,
                    legs,
                },
            });
        }
    }

    match bike_only_candidate(bike, start, waypoint, end).await {
        Ok(candidate) => candidates.push(candidate),
        Err(e) => {
            tracing::warn!(error = %e, "bike-only waypoint candidate unavailable");
        }
    }

    Ok(candidates)
}

/// One bike route start -> waypoint -> end as a single-leg candidate.
async fn bike_only_candidate<B: BikeApi>(
    bike: &B,
    start: &Place,
    waypoint: &Place,
    end: &Place,
) -> Result<RouteCandidate, ProviderError> {
    let route = bike
        .bike_route(&[start.position, waypoint.position, end.position])
        .await?;

    let mins = bike_leg_mins(route.duration_secs.round() as u32);
    let distance = if route.distance_m > 0.0 {
        route.distance_m
    } else {
        polyline_length_m(&route.geometry)
    };

    let leg = TransitLeg::bike(start.name.clone(), end.name.clone(), mins, distance);

    Ok(RouteCandidate {
        segments: vec![bike_segment(route.geometry)],
        summary: RouteSummary {
            total_time_mins: mins,
            legs: vec![leg],
        },
    })
}
