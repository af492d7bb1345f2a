//! Planner configuration.

use std::time::Duration;

/// Tunable parameters for route planning.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Assumed riding speed on a shared bike, km/h.
    pub bike_speed_kmph: f64,

    /// Bike-time budget for attempt 0, in seconds.
    pub budget_base_secs: u32,

    /// Budget increase per attempt, in seconds.
    pub budget_step_secs: u32,

    /// Number of widening attempts.
    pub max_attempts: u32,

    /// Maximum direct-transit alternatives to process.
    pub max_direct_paths: usize,

    /// Maximum transit alternatives per side of a bike-first/bike-last
    /// combination.
    pub max_side_paths: usize,

    /// Maximum transit alternatives per half of a waypoint trip.
    pub max_waypoint_paths: usize,

    /// Maximum candidates returned to the caller.
    pub max_results: usize,

    /// Allowed overshoot of a candidate's bike time past the requested
    /// budget, in seconds.
    pub budget_tolerance_secs: u32,

    /// Minimum bike-leg time a candidate must reach, if set, in seconds.
    pub min_bike_secs: Option<u32>,

    /// Radius cutoff for the nearest-station lookup in the single-route
    /// flow, in metres. `None` means nearest-regardless-of-distance, as
    /// used by the widening multi-attempt search.
    pub station_radius_m: Option<f64>,
}

impl PlannerConfig {
    /// Bike-time budget for attempt `k`, in seconds.
    pub fn budget_for_attempt(&self, attempt: u32) -> u32 {
        self.budget_base_secs + self.budget_step_secs * attempt
    }

    /// Riding speed in metres per second.
    pub fn bike_speed_mps(&self) -> f64 {
        self.bike_speed_kmph * 1000.0 / 3600.0
    }

    /// Budget tolerance as a Duration.
    pub fn budget_tolerance(&self) -> Duration {
        Duration::from_secs(self.budget_tolerance_secs as u64)
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            bike_speed_kmph: 13.0,
            budget_base_secs: 900,
            budget_step_secs: 900,
            max_attempts: 4,
            max_direct_paths: 5,
            max_side_paths: 3,
            max_waypoint_paths: 2,
            max_results: 5,
            budget_tolerance_secs: 120,
            min_bike_secs: None,
            station_radius_m: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = PlannerConfig::default();
        assert_eq!(config.bike_speed_kmph, 13.0);
        assert_eq!(config.budget_base_secs, 900);
        assert_eq!(config.budget_step_secs, 900);
        assert_eq!(config.max_attempts, 4);
        assert_eq!(config.max_direct_paths, 5);
        assert_eq!(config.max_side_paths, 3);
        assert_eq!(config.max_waypoint_paths, 2);
        assert_eq!(config.max_results, 5);
        assert_eq!(config.budget_tolerance_secs, 120);
        assert!(config.min_bike_secs.is_none());
        assert!(config.station_radius_m.is_none());
    }

    #[test]
    fn attempt_budgets_widen() {
        let config = PlannerConfig::default();
        assert_eq!(config.budget_for_attempt(0), 900);
        assert_eq!(config.budget_for_attempt(1), 1800);
        assert_eq!(config.budget_for_attempt(2), 2700);
        assert_eq!(config.budget_for_attempt(3), 3600);
    }

    #[test]
    fn bike_speed_conversion() {
        let config = PlannerConfig::default();
        // 13 km/h is about 3.61 m/s.
        assert!((config.bike_speed_mps() - 3.611).abs() < 0.001);
    }
}
