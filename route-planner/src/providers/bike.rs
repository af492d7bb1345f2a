//! Bike path HTTP client.
//!
//! Wraps the cycling-route provider. The provider enforces a hard
//! per-minute quota, so every outbound call first acquires a slot from a
//! shared sliding-window limiter; callers suspend while the quota is
//! exhausted rather than failing.

use std::sync::Arc;

use serde::Deserialize;

use crate::geo::Coordinate;

use super::BikeApi;
use super::error::ProviderError;
use super::limit::SlidingWindowLimiter;
use super::polyline;

/// A cycling route alternative: decoded geometry plus provider totals.
#[derive(Debug, Clone, PartialEq)]
pub struct BikeRoute {
    /// Decoded route geometry, ordered origin to destination.
    pub geometry: Vec<Coordinate>,
    /// Total route length in metres.
    pub distance_m: f64,
    /// Total riding time in seconds, at the provider's assumed speed.
    pub duration_secs: f64,
}

/// Configuration for the bike client.
#[derive(Debug, Clone)]
pub struct BikeClientConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout_secs: u64,
    /// Outbound quota, calls per rolling minute.
    pub max_calls_per_minute: usize,
}

impl BikeClientConfig {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            timeout_secs: 20,
            max_calls_per_minute: super::limit::DEFAULT_MAX_CALLS,
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_quota(mut self, calls_per_minute: usize) -> Self {
        self.max_calls_per_minute = calls_per_minute;
        self
    }
}

/// Bike path client.
#[derive(Debug, Clone)]
pub struct BikeClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    limiter: Arc<SlidingWindowLimiter>,
}

impl BikeClient {
    pub fn new(config: BikeClientConfig) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            api_key: config.api_key,
            limiter: Arc::new(SlidingWindowLimiter::new(
                config.max_calls_per_minute,
                super::limit::DEFAULT_WINDOW,
            )),
        })
    }

    async fn fetch(&self, points: &[Coordinate]) -> Result<BikeRoute, ProviderError> {
        if points.len() < 2 {
            return Err(ProviderError::InvalidRequest(
                "bike route needs at least two points",
            ));
        }

        self.limiter.acquire().await;

        let url = format!("{}/v2/directions/cycling-regular", self.base_url);
        let request = BikeRequest {
            coordinates: points.iter().map(|p| [p.lon(), p.lat()]).collect(),
        };

        let response = self
            .http
            .post(&url)
            .header("Authorization", &self.api_key)
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

        let parsed: BikeResponse = response.json().await.map_err(|e| ProviderError::Malformed {
            message: format!("bike response: {e}"),
        })?;

        let route = parsed
            .routes
            .into_iter()
            .next()
            .ok_or(ProviderError::EmptyResponse)?;

        let geometry = polyline::decode(&route.geometry).map_err(|e| ProviderError::Malformed {
            message: format!("bike geometry: {e}"),
        })?;

        Ok(BikeRoute {
            geometry,
            distance_m: route.summary.distance,
            duration_secs: route.summary.duration,
        })
    }
}

impl BikeApi for BikeClient {
    async fn bike_route(&self, points: &[Coordinate]) -> Result<BikeRoute, ProviderError> {
        self.fetch(points).await
    }
}

// ---- wire types ----

#[derive(Debug, serde::Serialize)]
struct BikeRequest {
    coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Deserialize)]
struct BikeResponse {
    #[serde(default)]
    routes: Vec<RawRoute>,
}

#[derive(Debug, Deserialize)]
struct RawRoute {
    geometry: String,
    summary: RawSummary,
}

#[derive(Debug, Deserialize)]
struct RawSummary {
    distance: f64,
    duration: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn rejects_short_point_list() {
        let client = BikeClient::new(BikeClientConfig::new("key", "http://localhost:1")).unwrap();
        let only = Coordinate::new(37.5, 127.0).unwrap();
        let err = client.bike_route(&[only]).await.unwrap_err();
        assert!(matches!(err, ProviderError::InvalidRequest(_)));
    }

    #[test]
    fn response_shape_parses() {
        let body = r#"{
            "routes": [
                {
                    "geometry": "_p~iF~ps|U_ulLnnqC",
                    "summary": { "distance": 5230.4, "duration": 1292.0 }
                }
            ]
        }"#;
        let parsed: BikeResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.routes.len(), 1);
        assert_eq!(parsed.routes[0].summary.distance, 5230.4);

        let decoded = polyline::decode(&parsed.routes[0].geometry).unwrap();
        assert_eq!(decoded.len(), 2);
    }
}
