//! Bike-last candidate builder: transit to the transfer station, then ride
//! into the end-side station.
//!
//! Mirror image of bike-first. The split is computed from the end station
//! backwards, so the ridden geometry is traversed end-to-start here.

use futures::future::try_join;

use crate::config::PlannerConfig;
use crate::domain::{RouteCandidate, RouteSummary, Station, TransitLeg};
use crate::providers::{PedestrianApi, ProviderError, TransitApi};
use crate::segments::process_path;
use crate::split::BikeSplitResult;

use super::{
    Place, append_stitched, attach_boundary_names, bike_leg_mins, bike_segment, polyline_length_m,
    select_transit_preferred,
};

/// Build bike-last candidates for one (transfer station, end station) pair
/// at one bike-time budget.
///
/// Transit-bearing side alternatives are preferred; non-transit ones fill
/// in only when too few exist, and the fallback is logged.
pub async fn build_bike_last<T, P>(
    transit: &T,
    pedestrian: &P,
    start: &Place,
    end: &Place,
    end_station: &Station,
    split: &BikeSplitResult,
    budget_secs: u32,
    config: &PlannerConfig,
) -> Result<Vec<RouteCandidate>, ProviderError>
where
    T: TransitApi,
    P: PedestrianApi,
{
    let transfer = &split.transfer_station;
    if transfer.id == end_station.id {
        tracing::debug!(station = %end_station.id, "transfer equals end station, no ride");
        return Ok(Vec::new());
    }

    let (start_side, end_side) = try_join(
        transit.search(start.position, transfer.position, &[]),
        transit.search(end_station.position, end.position, &[]),
    )
    .await?;

    let start_side = select_transit_preferred(start_side, config.max_side_paths);
    let end_side = select_transit_preferred(end_side, config.max_side_paths);

    // The split ran from the end station outwards; ride it backwards.
    let mut ride_geometry = split.first_segment().to_vec();
    ride_geometry.reverse();
    let ride_mins = bike_leg_mins(budget_secs);
    let ride_distance = polyline_length_m(&ride_geometry);

    let mut candidates = Vec::new();
    for s_path in &start_side {
        for e_path in &end_side {
            if !s_path.has_transit_leg() && !e_path.has_transit_leg() {
                tracing::debug!("discarding pure-walk bike-last combination");
                continue;
            }

            let Some(s_segments) =
                process_path(pedestrian, s_path, start.position, transfer.position).await
            else {
                continue;
            };
            let Some(e_segments) =
                process_path(pedestrian, e_path, end_station.position, end.position).await
            else {
                continue;
            };

            let mut segments = Vec::new();
            for segment in s_segments {
                append_stitched(&mut segments, segment);
            }
            append_stitched(&mut segments, bike_segment(ride_geometry.clone()));
            for segment in e_segments {
                append_stitched(&mut segments, segment);
            }

            let bike = TransitLeg::bike(
                transfer.name.clone(),
                end_station.name.clone(),
                ride_mins,
                ride_distance,
            );

            let mut legs = Vec::with_capacity(s_path.legs.len() + 1 + e_path.legs.len());
            legs.extend(s_path.legs.iter().cloned());
            legs.push(bike);
            legs.extend(e_path.legs.iter().cloned());
            attach_boundary_names(&mut legs, &start.name, &end.name);

            candidates.push(RouteCandidate {
                segments,
                summary: RouteSummary {
                    total_time_mins: s_path.total_time_mins + ride_mins + e_path.total_time_mins,
                    legs,
                },
            });
        }
    }

    Ok(candidates)
}
