//! Transit search HTTP client.
//!
//! Wraps the public-transit routing provider. The provider answers with
//! `{ error?, result?: { path: [...] } }`; each path is an ordered list of
//! sub-paths tagged 1 (subway), 2 (bus) or 3 (walk). Bus and subway legs
//! carry their stop lists; walk gaps carry nothing and are resolved later
//! by the path segment processor.

use reqwest::StatusCode;
use serde::Deserialize;

use crate::domain::{Stop, TrafficType, TransitLeg, TransitPath};
use crate::geo::Coordinate;

use super::TransitApi;
use super::error::ProviderError;

/// Configuration for the transit client.
#[derive(Debug, Clone)]
pub struct TransitClientConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl TransitClientConfig {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            timeout_secs: 20,
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Transit search client.
#[derive(Debug, Clone)]
pub struct TransitClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl TransitClient {
    pub fn new(config: TransitClientConfig) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            api_key: config.api_key,
        })
    }

    async fn search_inner(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        vias: &[Coordinate],
    ) -> Result<Vec<TransitPath>, ProviderError> {
        let url = format!("{}/searchPubTransPathT", self.base_url);

        let mut query = vec![
            ("SX", origin.lon().to_string()),
            ("SY", origin.lat().to_string()),
            ("EX", destination.lon().to_string()),
            ("EY", destination.lat().to_string()),
            ("apiKey", self.api_key.clone()),
        ];
        if !vias.is_empty() {
            let joined = vias
                .iter()
                .map(|v| format!("{},{}", v.lon(), v.lat()))
                .collect::<Vec<_>>()
                .join("_");
            query.push(("viaPoints", joined));
        }

        let response = self.http.get(&url).query(&query).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                body,
            });
        }
        if status == StatusCode::NO_CONTENT {
            return Ok(Vec::new());
        }

        let body = response.text().await?;
        let parsed: TransitResponse =
            serde_json::from_str(&body).map_err(|e| ProviderError::Malformed {
                message: format!("transit response: {e}"),
            })?;

        if let Some(err) = parsed.error {
            return Err(ProviderError::Api {
                status: status.as_u16(),
                body: err.message.unwrap_or_else(|| "unspecified error".into()),
            });
        }

        let result = parsed.result.ok_or(ProviderError::EmptyResponse)?;
        convert_paths(result.path)
    }
}

impl TransitApi for TransitClient {
    async fn search(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        vias: &[Coordinate],
    ) -> Result<Vec<TransitPath>, ProviderError> {
        self.search_inner(origin, destination, vias).await
    }
}

/// Convert raw provider paths, skipping paths with no legs.
fn convert_paths(raw: Vec<RawPath>) -> Result<Vec<TransitPath>, ProviderError> {
    let mut paths = Vec::with_capacity(raw.len());
    for path in raw {
        if path.sub_path.is_empty() {
            continue;
        }
        let legs = path
            .sub_path
            .into_iter()
            .map(convert_leg)
            .collect::<Result<Vec<_>, _>>()?;
        paths.push(TransitPath {
            legs,
            total_time_mins: path.info.total_time,
        });
    }
    Ok(paths)
}

fn convert_leg(raw: RawLeg) -> Result<TransitLeg, ProviderError> {
    let traffic_type =
        TrafficType::from_code(raw.traffic_type).ok_or_else(|| ProviderError::Malformed {
            message: format!("unknown trafficType {}", raw.traffic_type),
        })?;

    let stops = match raw.pass_stop_list {
        Some(list) => list
            .stations
            .iter()
            .map(convert_stop)
            .collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };

    let (lane_name, lane_color) = match raw.lane.as_ref().and_then(|l| l.first()) {
        Some(lane) => (
            lane.name.clone().or_else(|| lane.bus_no.clone()),
            lane.color.clone(),
        ),
        None => (None, None),
    };

    Ok(TransitLeg {
        traffic_type,
        stops,
        section_time_mins: raw.section_time,
        distance_m: raw.distance,
        lane_name,
        lane_color,
        start_name: raw.start_name,
        end_name: raw.end_name,
    })
}

fn convert_stop(raw: &RawStop) -> Result<Stop, ProviderError> {
    let lon = raw.x.as_f64().ok_or_else(|| ProviderError::Malformed {
        message: "non-numeric stop x".into(),
    })?;
    let lat = raw.y.as_f64().ok_or_else(|| ProviderError::Malformed {
        message: "non-numeric stop y".into(),
    })?;
    let position = Coordinate::new(lat, lon).map_err(|e| ProviderError::Malformed {
        message: format!("stop coordinate: {e}"),
    })?;
    Ok(Stop {
        name: raw.station_name.clone().unwrap_or_default(),
        position,
    })
}

// ---- wire types ----

#[derive(Debug, Deserialize)]
struct TransitResponse {
    error: Option<TransitErrorBody>,
    result: Option<TransitResult>,
}

#[derive(Debug, Deserialize)]
struct TransitErrorBody {
    #[serde(rename = "msg")]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TransitResult {
    #[serde(default)]
    path: Vec<RawPath>,
}

#[derive(Debug, Deserialize)]
struct RawPath {
    #[serde(rename = "subPath", default)]
    sub_path: Vec<RawLeg>,
    info: RawInfo,
}

#[derive(Debug, Deserialize)]
struct RawInfo {
    #[serde(rename = "totalTime")]
    total_time: u32,
}

#[derive(Debug, Deserialize)]
struct RawLeg {
    #[serde(rename = "trafficType")]
    traffic_type: u8,
    #[serde(rename = "passStopList")]
    pass_stop_list: Option<RawStopList>,
    #[serde(rename = "sectionTime", default)]
    section_time: u32,
    #[serde(default)]
    distance: f64,
    lane: Option<Vec<RawLane>>,
    #[serde(rename = "startName")]
    start_name: Option<String>,
    #[serde(rename = "endName")]
    end_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawLane {
    name: Option<String>,
    #[serde(rename = "busNo")]
    bus_no: Option<String>,
    #[serde(rename = "busColor")]
    color: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawStopList {
    #[serde(default)]
    stations: Vec<RawStop>,
}

#[derive(Debug, Deserialize)]
struct RawStop {
    x: NumberOrString,
    y: NumberOrString,
    #[serde(rename = "stationName")]
    station_name: Option<String>,
}

/// The provider is inconsistent about numeric fields: stop coordinates
/// arrive as strings in some deployments and numbers in others.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    String(String),
}

impl NumberOrString {
    fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::String(s) => s.parse().ok(),
        }
    }
}
