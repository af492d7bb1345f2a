//! Bike-segment splitting.
//!
//! Given two stations and a bike-time budget, fetch the cycling route
//! between them, walk its geometry until the budget's distance allowance
//! runs out, and resolve the reached point to the nearest real station
//! (the "transfer station").
//!
//! Results are memoized per (start, end, budget) in a `moka` future cache.
//! The in-flight computation is shared: a second caller with the same key
//! awaits the first caller's pending fetch instead of issuing a duplicate
//! network call.

use std::sync::Arc;

use crate::config::PlannerConfig;
use crate::domain::{Station, StationId, nearest_station};
use crate::geo::{Coordinate, distance_m};
use crate::providers::bike::BikeRoute;
use crate::providers::{BikeApi, ProviderError};

/// Cache key: (start station, end station, budget seconds).
type SplitKey = (StationId, StationId, u32);

/// Error from bike-segment splitting.
#[derive(Debug, thiserror::Error)]
pub enum SplitError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The provider answered with a route that has no geometry points.
    #[error("bike route has empty geometry")]
    EmptyGeometry,

    /// No stations to resolve a transfer point against.
    #[error("station pool is empty")]
    NoStations,
}

/// Result of splitting a bike route at a time budget.
#[derive(Debug, Clone)]
pub struct BikeSplitResult {
    /// The provider's full start-to-end route.
    pub route: BikeRoute,
    /// Index into `route.geometry` of the first point at or past the
    /// budget's distance allowance (the last point when the budget covers
    /// the whole route).
    pub cut_index: usize,
    /// The real station nearest the cut point.
    pub transfer_station: Station,
}

impl BikeSplitResult {
    /// Geometry of the ridden portion: start up to and including the cut
    /// point.
    pub fn first_segment(&self) -> &[Coordinate] {
        &self.route.geometry[..=self.cut_index]
    }

    /// The coordinate where the budget ran out.
    pub fn cut_point(&self) -> Coordinate {
        self.route.geometry[self.cut_index]
    }
}

/// Memoizing bike-segment splitter.
pub struct BikeSplitter<B> {
    client: B,
    speed_mps: f64,
    cache: moka::future::Cache<SplitKey, Arc<BikeSplitResult>>,
}

impl<B: BikeApi> BikeSplitter<B> {
    pub fn new(client: B, config: &PlannerConfig) -> Self {
        Self {
            client,
            speed_mps: config.bike_speed_mps(),
            cache: moka::future::Cache::builder().build(),
        }
    }

    /// Split the bike route from `start` to `end` at `budget_secs`.
    ///
    /// Memoized by (start id, end id, budget); concurrent calls with the
    /// same key share one underlying provider call.
    pub async fn split(
        &self,
        start: &Station,
        end: &Station,
        pool: &[Station],
        budget_secs: u32,
    ) -> Result<Arc<BikeSplitResult>, Arc<SplitError>> {
        if pool.is_empty() {
            return Err(Arc::new(SplitError::NoStations));
        }

        let key = (start.id.clone(), end.id.clone(), budget_secs);
        self.cache
            .try_get_with(key, self.compute(start, end, pool, budget_secs))
            .await
    }

    /// Drop all memoized splits.
    pub fn clear(&self) {
        self.cache.invalidate_all();
    }

    /// Approximate number of memoized splits (for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    async fn compute(
        &self,
        start: &Station,
        end: &Station,
        pool: &[Station],
        budget_secs: u32,
    ) -> Result<Arc<BikeSplitResult>, SplitError> {
        let route = self
            .client
            .bike_route(&[start.position, end.position])
            .await?;

        if route.geometry.is_empty() {
            return Err(SplitError::EmptyGeometry);
        }

        let allowed_m = self.speed_mps * budget_secs as f64;
        let cut_index = cut_index_at_distance(&route.geometry, allowed_m);
        let cut_point = route.geometry[cut_index];

        let transfer_station = nearest_station(pool, cut_point)
            .ok_or(SplitError::NoStations)?
            .clone();

        tracing::debug!(
            start = %start.id,
            end = %end.id,
            budget_secs,
            cut_index,
            transfer = %transfer_station.id,
            "split bike route"
        );

        Ok(Arc::new(BikeSplitResult {
            route,
            cut_index,
            transfer_station,
        }))
    }
}

/// First geometry index whose cumulative distance reaches `allowed_m`, or
/// the last index when the whole route fits the allowance.
fn cut_index_at_distance(geometry: &[Coordinate], allowed_m: f64) -> usize {
    let mut cumulative = 0.0;
    for (i, pair) in geometry.windows(2).enumerate() {
        cumulative += distance_m(pair[0], pair[1]);
        if cumulative >= allowed_m {
            return i + 1;
        }
    }
    geometry.len() - 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::mock::MockBike;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    fn station(id: &str, lat: f64, lon: f64) -> Station {
        Station::new(id, id, coord(lat, lon), 3, 10)
    }

    /// Pool spread along the meridian the mock route follows.
    fn pool() -> Vec<Station> {
        vec![
            station("S-START", 37.50, 127.0),
            station("S-MID", 37.55, 127.0),
            station("S-END", 37.60, 127.0),
        ]
    }

    fn splitter(mock: MockBike) -> BikeSplitter<MockBike> {
        BikeSplitter::new(mock, &PlannerConfig::default())
    }

    #[tokio::test]
    async fn cut_lands_mid_route_for_small_budget() {
        // ~11.1 km straight route, 101 points => ~111 m apart.
        let from = coord(37.50, 127.0);
        let to = coord(37.60, 127.0);
        let mock = MockBike::straight_line(from, to, 101, 11_120.0, 3_080.0);
        let splitter = splitter(mock);

        // 900 s at 13 km/h allows ~3250 m, less than a third of the route.
        let result = splitter
            .split(&pool()[0], &pool()[2], &pool(), 900)
            .await
            .unwrap();

        assert!(result.cut_index < 50, "cut at {}", result.cut_index);
        assert!(result.cut_index > 0);
        // The cut lands ~3250 m up the route, ~2300 m short of S-MID but
        // ~3250 m past S-START, so the mid station is nearest.
        assert_eq!(result.transfer_station.id.as_str(), "S-MID");
    }

    #[tokio::test]
    async fn budget_exceeding_route_selects_last_point() {
        let from = coord(37.50, 127.0);
        let to = coord(37.60, 127.0);
        let mock = MockBike::straight_line(from, to, 11, 11_120.0, 3_080.0);
        let splitter = splitter(mock);

        // Two hours at 13 km/h is far more than 11 km.
        let result = splitter
            .split(&pool()[0], &pool()[2], &pool(), 7_200)
            .await
            .unwrap();

        assert_eq!(result.cut_index, 10);
        assert_eq!(result.transfer_station.id.as_str(), "S-END");
        assert_eq!(result.first_segment().len(), 11);
    }

    #[tokio::test]
    async fn concurrent_identical_requests_share_one_call() {
        let from = coord(37.50, 127.0);
        let to = coord(37.60, 127.0);
        let mock = MockBike::straight_line(from, to, 11, 11_120.0, 3_080.0);
        mock.set_delay(std::time::Duration::from_millis(50)).await;
        let splitter = splitter(mock.clone());

        let pool = pool();
        let (a, b) = tokio::join!(
            splitter.split(&pool[0], &pool[2], &pool, 900),
            splitter.split(&pool[0], &pool[2], &pool, 900),
        );

        assert_eq!(mock.call_count(), 1);
        assert_eq!(
            a.unwrap().transfer_station.id,
            b.unwrap().transfer_station.id
        );
    }

    #[tokio::test]
    async fn different_budgets_are_distinct_entries() {
        let from = coord(37.50, 127.0);
        let to = coord(37.60, 127.0);
        let mock = MockBike::straight_line(from, to, 11, 11_120.0, 3_080.0);
        let splitter = splitter(mock.clone());

        let pool = pool();
        splitter.split(&pool[0], &pool[2], &pool, 900).await.unwrap();
        splitter.split(&pool[0], &pool[2], &pool, 1800).await.unwrap();

        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn clear_forces_refetch() {
        let from = coord(37.50, 127.0);
        let to = coord(37.60, 127.0);
        let mock = MockBike::straight_line(from, to, 11, 11_120.0, 3_080.0);
        let splitter = splitter(mock.clone());

        let pool = pool();
        splitter.split(&pool[0], &pool[2], &pool, 900).await.unwrap();
        splitter.clear();
        splitter.split(&pool[0], &pool[2], &pool, 900).await.unwrap();

        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn empty_pool_is_an_error() {
        let from = coord(37.50, 127.0);
        let to = coord(37.60, 127.0);
        let mock = MockBike::straight_line(from, to, 11, 11_120.0, 3_080.0);
        let splitter = splitter(mock);

        let start = station("A", 37.50, 127.0);
        let end = station("B", 37.60, 127.0);
        let err = splitter.split(&start, &end, &[], 900).await.unwrap_err();
        assert!(matches!(*err, SplitError::NoStations));
    }

    #[test]
    fn cut_index_edge_cases() {
        let line: Vec<Coordinate> = (0..5)
            .map(|i| coord(37.50 + 0.001 * i as f64, 127.0))
            .collect();
        // Each step is ~111 m.
        assert_eq!(cut_index_at_distance(&line, 0.0), 1);
        assert_eq!(cut_index_at_distance(&line, 150.0), 2);
        assert_eq!(cut_index_at_distance(&line, 1e9), 4);

        let single = vec![coord(37.5, 127.0)];
        assert_eq!(cut_index_at_distance(&single, 100.0), 0);
    }
}
