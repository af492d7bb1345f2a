//! Routing provider clients.
//!
//! Three external services back the planner: transit search, pedestrian
//! path search, and bike path search. Each capability is a trait so the
//! core stays testable with mock providers; the HTTP clients here are the
//! production implementations. Every client applies its own request
//! timeout so a hung provider call eventually fails instead of stalling a
//! branch forever.

pub mod bike;
pub mod error;
pub mod limit;
pub mod mock;
pub mod pedestrian;
pub mod polyline;
pub mod transit;

pub use bike::{BikeClient, BikeClientConfig, BikeRoute};
pub use error::ProviderError;
pub use limit::SlidingWindowLimiter;
pub use pedestrian::{PedestrianClient, PedestrianClientConfig};
pub use transit::{TransitClient, TransitClientConfig};

use crate::domain::TransitPath;
use crate::geo::Coordinate;

/// Transit itinerary search.
///
/// Returns itinerary alternatives, each an ordered leg list. Walk gaps
/// carry no geometry; the path segment processor fills them in.
pub trait TransitApi {
    fn search(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        vias: &[Coordinate],
    ) -> impl Future<Output = Result<Vec<TransitPath>, ProviderError>>;
}

/// Pedestrian path search.
///
/// The production client never returns `Err`: any failure degrades to an
/// empty coordinate list, because one missing walking geometry should not
/// invalidate a whole multi-leg itinerary. The `Result` exists so callers
/// handle a throwing implementation defensively.
pub trait PedestrianApi {
    fn walk_path(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> impl Future<Output = Result<Vec<Coordinate>, ProviderError>>;
}

/// Bike path search over an ordered point list (≥2 points).
///
/// Implementations enforce the provider's outbound call quota; callers
/// must tolerate the call suspending until quota is available.
pub trait BikeApi {
    fn bike_route(
        &self,
        points: &[Coordinate],
    ) -> impl Future<Output = Result<BikeRoute, ProviderError>>;
}
