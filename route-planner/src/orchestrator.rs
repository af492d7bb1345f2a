//! Multi-attempt planning orchestration.
//!
//! The planner runs the candidate builders over a widening series of
//! bike-time budgets. Attempt 0 also issues the direct transit search;
//! every attempt locates the start-side and end-side stations, splits the
//! bike route in both directions and builds bike-first and bike-last
//! combinations. The loop stops as soon as the deduplicated, ranked
//! output fills the result limit.
//!
//! Builder failures are absorbed: a provider outage on one flank degrades
//! that flank to zero candidates instead of failing the whole request. An
//! empty result is a valid answer, not an error.

use crate::builders::{Place, build_bike_first, build_bike_last, build_direct, build_waypoint};
use crate::config::PlannerConfig;
use crate::domain::{
    RouteCandidate, Station, nearest_station, nearest_station_with_bikes, nearest_station_within,
};
use crate::geo::{Coordinate, distance_m};
use crate::providers::{BikeApi, PedestrianApi, ProviderError, TransitApi};
use crate::rank::rank;
use crate::split::BikeSplitter;

/// One planning request.
#[derive(Debug, Clone)]
pub struct PlanRequest {
    pub start: Place,
    pub end: Place,
    /// At most one intermediate stop. When set, the attempt loop is
    /// bypassed in favor of the waypoint flow.
    pub waypoint: Option<Place>,
    /// Station directory snapshot for this request.
    pub stations: Vec<Station>,
}

/// Which end of the trip a notice refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripEndpoint {
    Start,
    End,
}

/// Non-fatal conditions surfaced alongside the candidate list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanNotice {
    /// No usable station near this endpoint; bike combinations on that
    /// flank were skipped.
    NoStationNearby { endpoint: TripEndpoint },
}

/// The outcome of a planning request. An empty candidate list means no
/// itinerary survived filtering, which callers present as "nothing found".
#[derive(Debug, Clone, Default)]
pub struct PlanResult {
    pub candidates: Vec<RouteCandidate>,
    pub notices: Vec<PlanNotice>,
}

/// Route planner tying the three providers together.
pub struct Planner<T, P, B> {
    transit: T,
    pedestrian: P,
    bike: B,
    splitter: BikeSplitter<B>,
    config: PlannerConfig,
}

impl<T, P, B> Planner<T, P, B>
where
    T: TransitApi,
    P: PedestrianApi,
    B: BikeApi + Clone,
{
    pub fn new(transit: T, pedestrian: P, bike: B, config: PlannerConfig) -> Self {
        let splitter = BikeSplitter::new(bike.clone(), &config);
        Self {
            transit,
            pedestrian,
            bike,
            splitter,
            config,
        }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Plan routes for `request`.
    pub async fn plan(&self, request: &PlanRequest) -> PlanResult {
        match &request.waypoint {
            Some(waypoint) => self.plan_via_waypoint(request, waypoint).await,
            None => self.plan_attempts(request).await,
        }
    }

    /// Waypoint flow: one pass through the waypoint builder, no budget
    /// filtering.
    async fn plan_via_waypoint(&self, request: &PlanRequest, waypoint: &Place) -> PlanResult {
        let candidates = absorb(
            build_waypoint(
                &self.transit,
                &self.pedestrian,
                &self.bike,
                &request.start,
                waypoint,
                &request.end,
                &self.config,
            )
            .await,
            "waypoint",
        );

        PlanResult {
            candidates: rank(candidates, &self.config, self.config.budget_base_secs, true),
            notices: Vec::new(),
        }
    }

    /// Widening attempt loop for waypoint-free requests.
    async fn plan_attempts(&self, request: &PlanRequest) -> PlanResult {
        let pool = &request.stations;
        let mut notices = Vec::new();

        // The pool is fixed for the request, so resolve both flanks once.
        let start_station = self.locate_start_station(pool, request.start.position);
        if start_station.is_none() {
            tracing::info!("no rentable station near the start, skipping bike combinations");
            notices.push(PlanNotice::NoStationNearby {
                endpoint: TripEndpoint::Start,
            });
        }
        let end_station = self.locate_end_station(pool, request.end.position);
        if end_station.is_none() {
            tracing::info!("no station near the destination, skipping bike combinations");
            notices.push(PlanNotice::NoStationNearby {
                endpoint: TripEndpoint::End,
            });
        }

        let mut pending: Vec<RouteCandidate> = Vec::new();
        let mut final_budget = self.config.budget_base_secs;

        for attempt in 0..self.config.max_attempts {
            let budget_secs = self.config.budget_for_attempt(attempt);
            final_budget = budget_secs;
            tracing::debug!(attempt, budget_secs, "planning attempt");

            if attempt == 0 {
                pending.extend(absorb(
                    build_direct(
                        &self.transit,
                        &self.pedestrian,
                        &request.start,
                        &request.end,
                        &self.config,
                    )
                    .await,
                    "direct",
                ));
            }

            if let (Some(start_station), Some(end_station)) = (start_station, end_station) {
                if start_station.id != end_station.id {
                    pending.extend(
                        self.bike_first_candidates(request, start_station, end_station, budget_secs)
                            .await,
                    );
                    pending.extend(
                        self.bike_last_candidates(request, start_station, end_station, budget_secs)
                            .await,
                    );
                }
            }

            let ranked = rank(pending.clone(), &self.config, budget_secs, false);
            if ranked.len() >= self.config.max_results {
                tracing::debug!(attempt, results = ranked.len(), "result limit reached");
                return PlanResult {
                    candidates: ranked,
                    notices,
                };
            }
        }

        PlanResult {
            candidates: rank(pending, &self.config, final_budget, false),
            notices,
        }
    }

    /// Ride out from the start-side station, transfer to transit.
    async fn bike_first_candidates(
        &self,
        request: &PlanRequest,
        start_station: &Station,
        end_station: &Station,
        budget_secs: u32,
    ) -> Vec<RouteCandidate> {
        let split = match self
            .splitter
            .split(start_station, end_station, &request.stations, budget_secs)
            .await
        {
            Ok(split) => split,
            Err(error) => {
                tracing::warn!(%error, budget_secs, "bike-first split failed");
                return Vec::new();
            }
        };

        absorb(
            build_bike_first(
                &self.transit,
                &self.pedestrian,
                &request.start,
                &request.end,
                start_station,
                &split,
                budget_secs,
                &self.config,
            )
            .await,
            "bike-first",
        )
    }

    /// Transit out, then ride into the end-side station. The split is
    /// taken from the end station backwards.
    async fn bike_last_candidates(
        &self,
        request: &PlanRequest,
        start_station: &Station,
        end_station: &Station,
        budget_secs: u32,
    ) -> Vec<RouteCandidate> {
        let split = match self
            .splitter
            .split(end_station, start_station, &request.stations, budget_secs)
            .await
        {
            Ok(split) => split,
            Err(error) => {
                tracing::warn!(%error, budget_secs, "bike-last split failed");
                return Vec::new();
            }
        };

        absorb(
            build_bike_last(
                &self.transit,
                &self.pedestrian,
                &request.start,
                &request.end,
                end_station,
                &split,
                budget_secs,
                &self.config,
            )
            .await,
            "bike-last",
        )
    }

    /// Nearest station the rider can actually rent from, honoring the
    /// radius cutoff when one is configured.
    fn locate_start_station<'a>(
        &self,
        pool: &'a [Station],
        point: Coordinate,
    ) -> Option<&'a Station> {
        let station = nearest_station_with_bikes(pool, point)?;
        match self.config.station_radius_m {
            Some(radius_m) if distance_m(station.position, point) > radius_m => None,
            _ => Some(station),
        }
    }

    /// Nearest drop-off station; availability is irrelevant on this flank.
    fn locate_end_station<'a>(
        &self,
        pool: &'a [Station],
        point: Coordinate,
    ) -> Option<&'a Station> {
        match self.config.station_radius_m {
            Some(radius_m) => nearest_station_within(pool, point, radius_m),
            None => nearest_station(pool, point),
        }
    }
}

/// Degrade a failed builder to zero candidates.
fn absorb(
    outcome: Result<Vec<RouteCandidate>, ProviderError>,
    builder: &'static str,
) -> Vec<RouteCandidate> {
    match outcome {
        Ok(candidates) => candidates,
        Err(error) => {
            tracing::warn!(%error, builder, "candidate builder failed, continuing without it");
            Vec::new()
        }
    }
}
