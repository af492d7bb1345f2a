//! Candidate ranking, filtering and duplicate removal.
//!
//! Candidates from all builders are merged, deduplicated on their
//! serialized summaries, filtered against the bike-time budget policy,
//! and ordered: hybrid itineraries first, then transit-only, then
//! bike-only, each group by ascending total time.

use std::collections::HashSet;

use crate::config::PlannerConfig;
use crate::domain::RouteCandidate;

/// Priority class of a candidate. Order matters: lower sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Class {
    /// Both a bike leg and at least one non-bike leg.
    Hybrid,
    /// No bike leg at all.
    TransitOnly,
    /// Nothing but bike legs.
    BikeOnly,
}

fn classify(candidate: &RouteCandidate) -> Class {
    match (candidate.has_bike_leg(), candidate.has_non_bike_leg()) {
        (true, true) => Class::Hybrid,
        (false, _) => Class::TransitOnly,
        (true, false) => Class::BikeOnly,
    }
}

/// Remove semantic duplicates, keeping the first occurrence.
///
/// Two candidates are identical when their serialized summaries (or, for
/// summary-less candidates, their serialized segment lists) are equal.
pub fn deduplicate(candidates: Vec<RouteCandidate>) -> Vec<RouteCandidate> {
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|c| seen.insert(c.dedup_key()))
        .collect()
}

/// Apply the bike-time budget policy.
///
/// Only meaningful without a waypoint: a candidate is dropped when its
/// total bike time overshoots the requested budget by more than the
/// configured tolerance, or (for bike-bearing candidates) undershoots the
/// configured minimum. With a waypoint the rider has explicitly accepted a
/// longer bike leg, so no upper filter applies.
pub fn filter_by_budget(
    candidates: Vec<RouteCandidate>,
    config: &PlannerConfig,
    budget_secs: u32,
    has_waypoint: bool,
) -> Vec<RouteCandidate> {
    if has_waypoint {
        return candidates;
    }

    candidates
        .into_iter()
        .filter(|c| {
            let bike_secs = c.bike_time_mins() * 60;
            if bike_secs > budget_secs + config.budget_tolerance_secs {
                tracing::debug!(bike_secs, budget_secs, "dropping over-budget candidate");
                return false;
            }
            if let Some(min) = config.min_bike_secs {
                if c.has_bike_leg() && bike_secs < min {
                    tracing::debug!(bike_secs, min, "dropping under-minimum candidate");
                    return false;
                }
            }
            true
        })
        .collect()
}

/// Order candidates: hybrid, then transit-only, then bike-only; ascending
/// total time within a group; less aggregate walk time on total-time ties.
///
/// The sort is stable, so equal candidates keep their input order.
pub fn prioritize(mut candidates: Vec<RouteCandidate>) -> Vec<RouteCandidate> {
    candidates.sort_by_key(|c| {
        (
            classify(c),
            c.summary.total_time_mins,
            c.walk_time_mins(),
        )
    });
    candidates
}

/// Full ranking pipeline: dedup, filter, prioritize, truncate.
pub fn rank(
    candidates: Vec<RouteCandidate>,
    config: &PlannerConfig,
    budget_secs: u32,
    has_waypoint: bool,
) -> Vec<RouteCandidate> {
    let candidates = deduplicate(candidates);
    let candidates = filter_by_budget(candidates, config, budget_secs, has_waypoint);
    let mut candidates = prioritize(candidates);
    candidates.truncate(config.max_results);
    candidates
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::domain::{RouteSummary, TransitLeg};
    use proptest::prelude::*;

    fn candidate_strategy() -> impl Strategy<Value = RouteCandidate> {
        (0u8..3, 5u32..120, 0u32..30).prop_map(|(class, total, walk)| {
            let legs = match class {
                0 => vec![
                    TransitLeg::bike("a", "b", 10, 2000.0),
                    TransitLeg::walk(walk, 100.0 * walk as f64),
                ],
                1 => vec![TransitLeg::walk(walk, 100.0 * walk as f64)],
                _ => vec![TransitLeg::bike("a", "b", total, 2000.0)],
            };
            RouteCandidate {
                segments: Vec::new(),
                summary: RouteSummary {
                    total_time_mins: total,
                    legs,
                },
            }
        })
    }

    proptest! {
        #[test]
        fn prioritize_partitions_strictly(
            candidates in prop::collection::vec(candidate_strategy(), 0..20)
        ) {
            let ranked = prioritize(candidates);

            // Classes must be non-decreasing through the output.
            let rank_of = |c: &RouteCandidate| match (c.has_bike_leg(), c.has_non_bike_leg()) {
                (true, true) => 0,
                (false, _) => 1,
                (true, false) => 2,
            };
            for pair in ranked.windows(2) {
                prop_assert!(rank_of(&pair[0]) <= rank_of(&pair[1]));
            }
        }

        #[test]
        fn prioritize_sorts_within_groups(
            candidates in prop::collection::vec(candidate_strategy(), 0..20)
        ) {
            let ranked = prioritize(candidates);
            for pair in ranked.windows(2) {
                let same_class =
                    (pair[0].has_bike_leg(), pair[0].has_non_bike_leg())
                        == (pair[1].has_bike_leg(), pair[1].has_non_bike_leg());
                if same_class {
                    prop_assert!(
                        pair[0].summary.total_time_mins <= pair[1].summary.total_time_mins
                    );
                }
            }
        }

        #[test]
        fn deduplicate_is_idempotent(
            candidates in prop::collection::vec(candidate_strategy(), 0..20)
        ) {
            let once = deduplicate(candidates);
            let twice = deduplicate(once.clone());
            prop_assert_eq!(once.len(), twice.len());
        }
    }
}
