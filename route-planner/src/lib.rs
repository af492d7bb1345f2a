//! Multimodal route planning over Seoul's shared-bike network, public
//! transit and pedestrian paths.
//!
//! The planner composes itineraries that mix a shared-bike leg with bus,
//! subway and walking legs. Three upstream providers supply the raw
//! material: a public-transit itinerary search, a pedestrian path service
//! and a cycling directions service. The [`orchestrator::Planner`] ties
//! them together: it widens a bike-time budget over several attempts,
//! splits candidate bike routes at the budget's distance allowance,
//! resolves the cut to a real station, and merges, deduplicates and ranks
//! the resulting candidates with hybrid bike-plus-transit itineraries
//! first.
//!
//! Provider outages degrade planning rather than failing it: a flank whose
//! provider errors simply contributes no candidates, and an empty result
//! is a valid answer.

pub mod builders;
pub mod config;
pub mod domain;
pub mod geo;
pub mod orchestrator;
pub mod providers;
pub mod rank;
pub mod segments;
pub mod split;

pub use builders::Place;
pub use config::PlannerConfig;
pub use orchestrator::{PlanNotice, PlanRequest, PlanResult, Planner, TripEndpoint};
