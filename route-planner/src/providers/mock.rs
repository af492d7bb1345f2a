//! In-memory mock providers for testing without network access.
//!
//! Responses are keyed by rounded origin/destination coordinates so tests
//! can script distinct answers per leg. Each mock counts its calls, which
//! the bike-split cache tests rely on.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::RwLock;

use crate::domain::TransitPath;
use crate::geo::Coordinate;

use super::bike::BikeRoute;
use super::error::ProviderError;
use super::{BikeApi, PedestrianApi, TransitApi};

/// Lookup key for scripted responses: coordinates rounded to 1e-6 degrees.
fn route_key(origin: Coordinate, destination: Coordinate) -> (i64, i64, i64, i64) {
    let q = |v: f64| (v * 1e6).round() as i64;
    (
        q(origin.lat()),
        q(origin.lon()),
        q(destination.lat()),
        q(destination.lon()),
    )
}

/// Mock transit provider serving scripted itineraries.
#[derive(Clone, Default)]
pub struct MockTransit {
    responses: Arc<RwLock<HashMap<(i64, i64, i64, i64), Vec<TransitPath>>>>,
    calls: Arc<AtomicUsize>,
    fail: Arc<RwLock<bool>>,
}

impl MockTransit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the itineraries returned for an origin/destination pair.
    pub async fn script(&self, origin: Coordinate, destination: Coordinate, paths: Vec<TransitPath>) {
        self.responses
            .write()
            .await
            .insert(route_key(origin, destination), paths);
    }

    /// Make every subsequent search fail with a provider error.
    pub async fn fail_all(&self) {
        *self.fail.write().await = true;
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TransitApi for MockTransit {
    async fn search(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        _vias: &[Coordinate],
    ) -> Result<Vec<TransitPath>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if *self.fail.read().await {
            return Err(ProviderError::Api {
                status: 500,
                body: "mock transit failure".into(),
            });
        }
        Ok(self
            .responses
            .read()
            .await
            .get(&route_key(origin, destination))
            .cloned()
            .unwrap_or_default())
    }
}

/// Mock pedestrian provider.
///
/// Unscripted pairs fall back to a straight two-point line between the
/// endpoints, which keeps stitching assertions simple. A failing mock
/// returns `Err` so the processor's abandon-path sentinel can be tested;
/// the production client never does that.
#[derive(Clone, Default)]
pub struct MockPedestrian {
    responses: Arc<RwLock<HashMap<(i64, i64, i64, i64), Vec<Coordinate>>>>,
    calls: Arc<AtomicUsize>,
    fail: Arc<RwLock<bool>>,
}

impl MockPedestrian {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn script(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        points: Vec<Coordinate>,
    ) {
        self.responses
            .write()
            .await
            .insert(route_key(origin, destination), points);
    }

    pub async fn fail_all(&self) {
        *self.fail.write().await = true;
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PedestrianApi for MockPedestrian {
    async fn walk_path(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<Vec<Coordinate>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if *self.fail.read().await {
            return Err(ProviderError::Api {
                status: 500,
                body: "mock pedestrian failure".into(),
            });
        }
        Ok(self
            .responses
            .read()
            .await
            .get(&route_key(origin, destination))
            .cloned()
            .unwrap_or_else(|| vec![origin, destination]))
    }
}

/// How a [`MockBike`] answers requests.
#[derive(Clone)]
enum MockBikeMode {
    /// One fixed route for every request.
    Fixed(BikeRoute),
    /// Straight-line geometry between the requested points.
    Dynamic { points_per_leg: usize, speed_mps: f64 },
}

/// Mock bike provider.
#[derive(Clone)]
pub struct MockBike {
    mode: MockBikeMode,
    calls: Arc<AtomicUsize>,
    delay: Arc<RwLock<Option<std::time::Duration>>>,
}

impl MockBike {
    pub fn new(route: BikeRoute) -> Self {
        Self {
            mode: MockBikeMode::Fixed(route),
            calls: Arc::new(AtomicUsize::new(0)),
            delay: Arc::new(RwLock::new(None)),
        }
    }

    /// A fixed straight-line route between `from` and `to` with `n` evenly
    /// spaced points, at the given total distance and duration.
    pub fn straight_line(
        from: Coordinate,
        to: Coordinate,
        n: usize,
        distance_m: f64,
        duration_secs: f64,
    ) -> Self {
        assert!(n >= 2);
        Self::new(BikeRoute {
            geometry: interpolate(from, to, n),
            distance_m,
            duration_secs,
        })
    }

    /// Follow whatever points each request asks for, interpolating
    /// `points_per_leg` coordinates per requested leg, with durations
    /// derived from the haversine length at `speed_mps`.
    pub fn dynamic(points_per_leg: usize, speed_mps: f64) -> Self {
        assert!(points_per_leg >= 2);
        Self {
            mode: MockBikeMode::Dynamic {
                points_per_leg,
                speed_mps,
            },
            calls: Arc::new(AtomicUsize::new(0)),
            delay: Arc::new(RwLock::new(None)),
        }
    }

    /// Delay each response, to widen the in-flight window in cache tests.
    pub async fn set_delay(&self, delay: std::time::Duration) {
        *self.delay.write().await = Some(delay);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

fn interpolate(from: Coordinate, to: Coordinate, n: usize) -> Vec<Coordinate> {
    (0..n)
        .map(|i| {
            let t = i as f64 / (n - 1) as f64;
            Coordinate::new(
                from.lat() + (to.lat() - from.lat()) * t,
                from.lon() + (to.lon() - from.lon()) * t,
            )
            .unwrap()
        })
        .collect()
}

impl BikeApi for MockBike {
    async fn bike_route(&self, points: &[Coordinate]) -> Result<BikeRoute, ProviderError> {
        if points.len() < 2 {
            return Err(ProviderError::InvalidRequest(
                "bike route needs at least two points",
            ));
        }
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = *self.delay.read().await {
            tokio::time::sleep(delay).await;
        }
        match &self.mode {
            MockBikeMode::Fixed(route) => Ok(route.clone()),
            MockBikeMode::Dynamic {
                points_per_leg,
                speed_mps,
            } => {
                let mut geometry = Vec::new();
                for pair in points.windows(2) {
                    let leg = interpolate(pair[0], pair[1], *points_per_leg);
                    let skip = usize::from(!geometry.is_empty());
                    geometry.extend(leg.into_iter().skip(skip));
                }
                let distance_m: f64 = geometry
                    .windows(2)
                    .map(|p| crate::geo::distance_m(p[0], p[1]))
                    .sum();
                Ok(BikeRoute {
                    geometry,
                    distance_m,
                    duration_secs: distance_m / speed_mps,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    #[tokio::test]
    async fn transit_serves_scripted_paths() {
        let mock = MockTransit::new();
        let a = coord(37.56, 126.97);
        let b = coord(37.50, 127.03);
        mock.script(
            a,
            b,
            vec![TransitPath {
                legs: vec![crate::domain::TransitLeg::walk(5, 300.0)],
                total_time_mins: 5,
            }],
        )
        .await;

        let paths = mock.search(a, b, &[]).await.unwrap();
        assert_eq!(paths.len(), 1);
        assert!(mock.search(b, a, &[]).await.unwrap().is_empty());
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn pedestrian_falls_back_to_straight_line() {
        let mock = MockPedestrian::new();
        let a = coord(37.56, 126.97);
        let b = coord(37.50, 127.03);
        let points = mock.walk_path(a, b).await.unwrap();
        assert_eq!(points, vec![a, b]);
    }

    #[tokio::test]
    async fn bike_straight_line_geometry() {
        let mock = MockBike::straight_line(coord(37.5, 127.0), coord(37.6, 127.0), 5, 11000.0, 3000.0);
        let route = mock
            .bike_route(&[coord(37.5, 127.0), coord(37.6, 127.0)])
            .await
            .unwrap();
        assert_eq!(route.geometry.len(), 5);
        assert!((route.geometry[2].lat() - 37.55).abs() < 1e-9);
    }
}
