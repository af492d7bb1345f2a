//! Direct-transit candidate builder.

use crate::config::PlannerConfig;
use crate::domain::{RouteCandidate, RouteSummary};
use crate::providers::{PedestrianApi, ProviderError, TransitApi};
use crate::segments::process_path;

use super::{Place, attach_boundary_names};

/// Build candidates straight from the transit provider's alternatives for
/// start to end, up to the configured limit.
pub async fn build_direct<T, P>(
    transit: &T,
    pedestrian: &P,
    start: &Place,
    end: &Place,
    config: &PlannerConfig,
) -> Result<Vec<RouteCandidate>, ProviderError>
where
    T: TransitApi,
    P: PedestrianApi,
{
    let paths = transit.search(start.position, end.position, &[]).await?;

    let mut candidates = Vec::new();
    for path in paths.into_iter().take(config.max_direct_paths) {
        let Some(segments) = process_path(pedestrian, &path, start.position, end.position).await
        else {
            tracing::debug!("skipping unusable direct-transit path");
            continue;
        };

        let mut legs = path.legs;
        attach_boundary_names(&mut legs, &start.name, &end.name);

        candidates.push(RouteCandidate {
            segments,
            summary: RouteSummary {
                total_time_mins: path.total_time_mins,
                legs,
            },
        });
    }

    Ok(candidates)
}
