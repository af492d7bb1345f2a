//! Pedestrian path HTTP client.
//!
//! Wraps the walking-route provider. This client fails closed: any failure
//! (network, non-2xx, malformed payload) degrades to an empty coordinate
//! list, so a missing walking geometry costs one leg's rendering rather
//! than the whole itinerary.

use serde::Deserialize;

use crate::geo::Coordinate;

use super::PedestrianApi;
use super::error::ProviderError;

/// Configuration for the pedestrian client.
#[derive(Debug, Clone)]
pub struct PedestrianClientConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl PedestrianClientConfig {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            timeout_secs: 10,
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Pedestrian path client.
#[derive(Debug, Clone)]
pub struct PedestrianClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl PedestrianClient {
    pub fn new(config: PedestrianClientConfig) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            api_key: config.api_key,
        })
    }

    async fn fetch(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<Vec<Coordinate>, ProviderError> {
        let url = format!("{}/routes/pedestrian", self.base_url);

        let request = PedestrianRequest {
            start_x: origin.lon(),
            start_y: origin.lat(),
            end_x: destination.lon(),
            end_y: destination.lat(),
        };

        let response = self
            .http
            .post(&url)
            .header("appKey", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: PedestrianResponse =
            response
                .json()
                .await
                .map_err(|e| ProviderError::Malformed {
                    message: format!("pedestrian response: {e}"),
                })?;

        collect_line_coords(parsed)
    }
}

impl PedestrianApi for PedestrianClient {
    async fn walk_path(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<Vec<Coordinate>, ProviderError> {
        match self.fetch(origin, destination).await {
            Ok(points) => Ok(points),
            Err(e) => {
                tracing::warn!(error = %e, "pedestrian path degraded to empty");
                Ok(Vec::new())
            }
        }
    }
}

/// Flatten the LineString features into one ordered coordinate list.
fn collect_line_coords(response: PedestrianResponse) -> Result<Vec<Coordinate>, ProviderError> {
    let mut points = Vec::new();
    for feature in response.features {
        let Some(geometry) = feature.geometry else {
            continue;
        };
        if geometry.kind != "LineString" {
            continue;
        }
        for pair in geometry.coordinates {
            let &[lon, lat] = pair.as_slice() else {
                return Err(ProviderError::Malformed {
                    message: "coordinate pair is not [lon, lat]".into(),
                });
            };
            let coord = Coordinate::new(lat, lon).map_err(|e| ProviderError::Malformed {
                message: format!("pedestrian coordinate: {e}"),
            })?;
            points.push(coord);
        }
    }
    Ok(points)
}

// ---- wire types ----

#[derive(Debug, serde::Serialize)]
struct PedestrianRequest {
    #[serde(rename = "startX")]
    start_x: f64,
    #[serde(rename = "startY")]
    start_y: f64,
    #[serde(rename = "endX")]
    end_x: f64,
    #[serde(rename = "endY")]
    end_y: f64,
}

#[derive(Debug, Deserialize)]
struct PedestrianResponse {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    coordinates: Vec<Vec<f64>>,
}
