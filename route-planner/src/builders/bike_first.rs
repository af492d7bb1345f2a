//! Bike-first candidate builder: ride from the start-side station to the
//! transfer station, then continue by transit.

use futures::future::try_join;

use crate::config::PlannerConfig;
use crate::domain::{RouteCandidate, RouteSummary, Station, TransitLeg};
use crate::providers::{PedestrianApi, ProviderError, TransitApi};
use crate::segments::process_path;
use crate::split::BikeSplitResult;

use super::{
    Place, append_stitched, attach_boundary_names, bike_leg_mins, bike_segment, polyline_length_m,
};

/// Build bike-first candidates for one (start station, transfer station)
/// pair at one bike-time budget.
///
/// The two side searches are issued back-to-back and awaited together;
/// every combination of a start-side and an end-side alternative becomes a
/// candidate unless it contains no real transit leg (a pure-walk
/// combination duplicates the direct-transit builder's purpose).
pub async fn build_bike_first<T, P>(
    transit: &T,
    pedestrian: &P,
    start: &Place,
    end: &Place,
    start_station: &Station,
    split: &BikeSplitResult,
    budget_secs: u32,
    config: &PlannerConfig,
) -> Result<Vec<RouteCandidate>, ProviderError>
where
    T: TransitApi,
    P: PedestrianApi,
{
    let transfer = &split.transfer_station;
    if transfer.id == start_station.id {
        tracing::debug!(station = %start_station.id, "transfer equals start station, no ride");
        return Ok(Vec::new());
    }

    let (start_side, end_side) = try_join(
        transit.search(start.position, start_station.position, &[]),
        transit.search(transfer.position, end.position, &[]),
    )
    .await?;

    let start_side: Vec<_> = start_side.into_iter().take(config.max_side_paths).collect();
    let end_side: Vec<_> = end_side.into_iter().take(config.max_side_paths).collect();

    let ride_geometry = split.first_segment().to_vec();
    let ride_mins = bike_leg_mins(budget_secs);
    let ride_distance = polyline_length_m(&ride_geometry);

    let mut candidates = Vec::new();
    for s_path in &start_side {
        for e_path in &end_side {
            if !s_path.has_transit_leg() && !e_path.has_transit_leg() {
                tracing::debug!("discarding pure-walk bike-first combination");
                continue;
            }

            let Some(s_segments) =
                process_path(pedestrian, s_path, start.position, start_station.position).await
            else {
                continue;
            };
            let Some(e_segments) =
                process_path(pedestrian, e_path, transfer.position, end.position).await
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
                start_station.name.clone(),
                transfer.name.clone(),
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Stop, TrafficType, TransitPath};
    use crate::geo::Coordinate;
    use crate::providers::mock::{MockBike, MockPedestrian, MockTransit};
    use crate::split::BikeSplitter;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    fn start() -> Place {
        Place::new("Home", coord(37.500, 127.000))
    }

    fn end() -> Place {
        Place::new("Office", coord(37.620, 127.010))
    }

    fn rental() -> Station {
        Station::new("ST-A", "Rental Dock", coord(37.502, 127.000), 4, 10)
    }

    fn mid_station() -> Station {
        Station::new("ST-B", "Transfer Dock", coord(37.540, 127.000), 2, 10)
    }

    fn far_station() -> Station {
        Station::new("ST-C", "Far Dock", coord(37.600, 127.000), 1, 10)
    }

    fn walk_path(mins: u32) -> TransitPath {
        TransitPath {
            legs: vec![TransitLeg::walk(mins, 60.0 * mins as f64)],
            total_time_mins: mins,
        }
    }

    fn bus_path(total: u32) -> TransitPath {
        TransitPath {
            legs: vec![
                TransitLeg::walk(3, 200.0),
                TransitLeg {
                    traffic_type: TrafficType::Bus,
                    stops: vec![
                        Stop {
                            name: "Stop 1".into(),
                            position: coord(37.545, 127.001),
                        },
                        Stop {
                            name: "Stop 2".into(),
                            position: coord(37.615, 127.009),
                        },
                    ],
                    section_time_mins: total - 3,
                    distance_m: 7000.0,
                    lane_name: Some("Bus 273".into()),
                    lane_color: None,
                    start_name: None,
                    end_name: None,
                },
            ],
            total_time_mins: total,
        }
    }

    async fn split_for(budget_secs: u32) -> BikeSplitResult {
        let pool = vec![rental(), mid_station(), far_station()];
        let mock = MockBike::straight_line(
            rental().position,
            far_station().position,
            101,
            10_900.0,
            3_020.0,
        );
        let splitter = BikeSplitter::new(mock, &PlannerConfig::default());
        let result = splitter
            .split(&rental(), &far_station(), &pool, budget_secs)
            .await
            .unwrap();
        (*result).clone()
    }

    #[tokio::test]
    async fn combines_sides_around_a_bike_leg() {
        let transit = MockTransit::new();
        let pedestrian = MockPedestrian::new();
        // 900 s at 13 km/h cuts ~3.25 km in: nearest is the mid station.
        let split = split_for(900).await;
        assert_eq!(split.transfer_station.id.as_str(), "ST-B");

        transit
            .script(start().position, rental().position, vec![walk_path(4)])
            .await;
        transit
            .script(
                split.transfer_station.position,
                end().position,
                vec![bus_path(20), bus_path(25)],
            )
            .await;

        let candidates = build_bike_first(
            &transit,
            &pedestrian,
            &start(),
            &end(),
            &rental(),
            &split,
            900,
            &PlannerConfig::default(),
        )
        .await
        .unwrap();

        // 1 start-side x 2 end-side alternatives.
        assert_eq!(candidates.len(), 2);

        let first = &candidates[0];
        // walk + bike + (walk + bus) legs.
        assert_eq!(first.summary.legs.len(), 4);
        assert_eq!(first.summary.legs[1].traffic_type, TrafficType::Bike);
        assert_eq!(first.summary.legs[1].section_time_mins, 15);
        assert_eq!(first.summary.total_time_mins, 4 + 15 + 20);

        // Bike leg carries the station names.
        assert_eq!(
            first.summary.legs[1].start_name.as_deref(),
            Some("Rental Dock")
        );
        assert_eq!(
            first.summary.legs[1].end_name.as_deref(),
            Some("Transfer Dock")
        );

        // Segments are stitched across the bike boundary.
        for pair in first.segments.windows(2) {
            assert_eq!(pair[0].points.last(), pair[1].points.first());
        }
    }

    #[tokio::test]
    async fn pure_walk_combination_is_discarded() {
        let transit = MockTransit::new();
        let pedestrian = MockPedestrian::new();
        let split = split_for(900).await;

        transit
            .script(start().position, rental().position, vec![walk_path(4)])
            .await;
        transit
            .script(
                split.transfer_station.position,
                end().position,
                vec![walk_path(30)],
            )
            .await;

        let candidates = build_bike_first(
            &transit,
            &pedestrian,
            &start(),
            &end(),
            &rental(),
            &split,
            900,
            &PlannerConfig::default(),
        )
        .await
        .unwrap();

        assert!(candidates.is_empty());
    }

    #[tokio::test]
    async fn identical_start_and_transfer_station_yield_nothing() {
        let transit = MockTransit::new();
        let pedestrian = MockPedestrian::new();
        let mut split = split_for(900).await;
        split.transfer_station = rental();

        let candidates = build_bike_first(
            &transit,
            &pedestrian,
            &start(),
            &end(),
            &rental(),
            &split,
            900,
            &PlannerConfig::default(),
        )
        .await
        .unwrap();

        assert!(candidates.is_empty());
        assert_eq!(transit.call_count(), 0);
    }

    #[tokio::test]
    async fn side_path_limit_caps_combinations() {
        let transit = MockTransit::new();
        let pedestrian = MockPedestrian::new();
        let split = split_for(900).await;

        transit
            .script(
                start().position,
                rental().position,
                (0..5).map(|i| bus_path(10 + i)).collect(),
            )
            .await;
        transit
            .script(
                split.transfer_station.position,
                end().position,
                (0..5).map(|i| bus_path(20 + i)).collect(),
            )
            .await;

        let candidates = build_bike_first(
            &transit,
            &pedestrian,
            &start(),
            &end(),
            &rental(),
            &split,
            900,
            &PlannerConfig::default(),
        )
        .await
        .unwrap();

        // Capped at 3 x 3.
        assert_eq!(candidates.len(), 9);
    }
}
