//! Domain types for the multimodal route planner.
//!
//! These types represent validated planning data: bike-share stations,
//! transit legs as returned by the transit provider, renderable route
//! segments, and assembled route candidates. All entities are created per
//! planning request and treated as immutable snapshots.

mod candidate;
mod leg;
mod segment;
mod station;

pub use candidate::{RouteCandidate, RouteSummary};
pub use leg::{Stop, TrafficType, TransitLeg, TransitPath};
pub use segment::{RouteSegment, SegmentKind};
pub use station::{
    Station, StationId, nearest_station, nearest_station_with_bikes, nearest_station_within,
};
