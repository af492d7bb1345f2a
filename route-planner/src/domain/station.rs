//! Bike-share station types.

use std::fmt;

use crate::geo::Coordinate;

/// Identifier of a bike-share station, as assigned by the station directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct StationId(String);

impl StationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A bike-share station with its live availability snapshot.
///
/// Fetched fresh from the station directory per planning request and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Station {
    pub id: StationId,
    pub name: String,
    pub position: Coordinate,
    /// Bikes available for rent at snapshot time.
    pub available_bikes: u32,
    /// Total rack capacity.
    pub total_racks: u32,
}

impl Station {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        position: Coordinate,
        available_bikes: u32,
        total_racks: u32,
    ) -> Self {
        Self {
            id: StationId::new(id),
            name: name.into(),
            position,
            available_bikes,
            total_racks,
        }
    }

    /// Whether at least one bike can be rented here.
    pub fn has_bikes(&self) -> bool {
        self.available_bikes > 0
    }
}

/// Find the station nearest to `point` by great-circle distance.
///
/// Exhaustive scan; ties keep the first-encountered minimum. Returns `None`
/// only for an empty pool.
pub fn nearest_station(pool: &[Station], point: Coordinate) -> Option<&Station> {
    let mut best: Option<(&Station, f64)> = None;
    for station in pool {
        let d = crate::geo::distance_m(station.position, point);
        match best {
            Some((_, best_d)) if best_d <= d => {}
            _ => best = Some((station, d)),
        }
    }
    best.map(|(s, _)| s)
}

/// Like [`nearest_station`], but only considers stations within `radius_m`.
pub fn nearest_station_within(
    pool: &[Station],
    point: Coordinate,
    radius_m: f64,
) -> Option<&Station> {
    nearest_station(pool, point)
        .filter(|s| crate::geo::distance_m(s.position, point) <= radius_m)
}

/// Nearest station that has at least one bike available for rent.
pub fn nearest_station_with_bikes(pool: &[Station], point: Coordinate) -> Option<&Station> {
    let mut best: Option<(&Station, f64)> = None;
    for station in pool.iter().filter(|s| s.has_bikes()) {
        let d = crate::geo::distance_m(station.position, point);
        match best {
            Some((_, best_d)) if best_d <= d => {}
            _ => best = Some((station, d)),
        }
    }
    best.map(|(s, _)| s)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    fn pool() -> Vec<Station> {
        vec![
            Station::new("ST-1", "City Hall", coord(37.5663, 126.9779), 5, 10),
            Station::new("ST-2", "Gwanghwamun", coord(37.5759, 126.9769), 0, 15),
            Station::new("ST-3", "Seoul Station", coord(37.5547, 126.9707), 3, 20),
        ]
    }

    #[test]
    fn nearest_picks_closest() {
        let pool = pool();
        let near_gwanghwamun = coord(37.5760, 126.9770);
        let s = nearest_station(&pool, near_gwanghwamun).unwrap();
        assert_eq!(s.id.as_str(), "ST-2");
    }

    #[test]
    fn nearest_empty_pool() {
        assert!(nearest_station(&[], coord(37.5, 127.0)).is_none());
    }

    #[test]
    fn nearest_tie_keeps_first() {
        let a = Station::new("A", "a", coord(37.5, 127.0), 1, 1);
        let b = Station::new("B", "b", coord(37.5, 127.0), 1, 1);
        let pool = vec![a, b];
        let s = nearest_station(&pool, coord(37.5, 127.0)).unwrap();
        assert_eq!(s.id.as_str(), "A");
    }

    #[test]
    fn within_radius_filters() {
        let pool = pool();
        // A point far from every station.
        let far = coord(37.4000, 127.2000);
        assert!(nearest_station_within(&pool, far, 1000.0).is_none());
        assert!(nearest_station_within(&pool, far, 50_000.0).is_some());
    }

    #[test]
    fn with_bikes_skips_empty_stations() {
        let pool = pool();
        // Nearest overall is ST-2 (0 bikes); nearest with bikes is ST-1.
        let near_gwanghwamun = coord(37.5760, 126.9770);
        let s = nearest_station_with_bikes(&pool, near_gwanghwamun).unwrap();
        assert_eq!(s.id.as_str(), "ST-1");
    }
}
