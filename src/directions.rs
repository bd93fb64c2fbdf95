//! Directions HTTP adapter.
//!
//! Speaks the OSRM `route/v1` wire format, which Mapbox Directions and
//! self-hosted OSRM both serve. Wire structs live here and are mapped
//! to the domain model at the boundary, including the axis flip from
//! GeoJSON `[lng, lat]` positions.

use serde::Deserialize;
use tracing::debug;

use crate::geo::{self, Coordinate};
use crate::planner::RouteQuery;
use crate::polyline::Polyline;
use crate::route::{Leg, Maneuver, Route, Step, TurnType};
use crate::traits::DirectionsProvider;

/// Errors from a directions request.
#[derive(Debug, thiserror::Error)]
pub enum DirectionsError {
    /// Too few waypoints to route between.
    #[error("at least 2 waypoints required, got {0}")]
    InvalidInput(usize),

    /// Transport-level failure (connect, timeout, TLS).
    #[error("directions request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("directions provider returned {status}: {message}")]
    Provider { status: u16, message: String },

    /// The response body did not match the expected wire format.
    #[error("malformed directions response: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The provider found no route between the waypoints.
    #[error("no route found between the given waypoints")]
    NoRoute,
}

/// Directions provider endpoint settings.
#[derive(Debug, Clone)]
pub struct DirectionsConfig {
    pub base_url: String,
    /// Bearer-style token appended as `access_token`; `None` for
    /// self-hosted providers.
    pub access_token: Option<String>,
    pub timeout_secs: u64,
}

impl Default for DirectionsConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            access_token: None,
            timeout_secs: 10,
        }
    }
}

/// Async client for an OSRM-compatible directions endpoint.
#[derive(Debug, Clone)]
pub struct DirectionsClient {
    config: DirectionsConfig,
    client: reqwest::Client,
}

impl DirectionsClient {
    pub fn new(config: DirectionsConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    /// Request URL for `query`: base, profile, then the waypoint path.
    pub fn route_url(&self, query: &RouteQuery) -> String {
        format!(
            "{}/route/v1/{}/{}",
            self.config.base_url,
            query.mode.profile(),
            geo::wire_path(&query.waypoints)
        )
    }

    async fn request_routes(&self, query: &RouteQuery) -> Result<Vec<Route>, DirectionsError> {
        if query.waypoints.len() < 2 {
            return Err(DirectionsError::InvalidInput(query.waypoints.len()));
        }

        let url = self.route_url(query);
        let params = request_params(query, self.config.access_token.as_deref());
        debug!("requesting directions: {} waypoints, profile {}", query.waypoints.len(), query.mode);

        let response = self.client.get(&url).query(&params).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(DirectionsError::Provider {
                status: status.as_u16(),
                message: provider_message(&body),
            });
        }

        let decoded: WireDirectionsResponse = serde_json::from_str(&body)?;
        if decoded.routes.is_empty() {
            return Err(DirectionsError::NoRoute);
        }

        debug!("directions response: {} route(s)", decoded.routes.len());
        Ok(decoded.routes.into_iter().map(Route::from).collect())
    }
}

impl DirectionsProvider for DirectionsClient {
    async fn fetch_route(&self, query: &RouteQuery) -> Result<Vec<Route>, DirectionsError> {
        self.request_routes(query).await
    }
}

/// Query parameters for a directions request: the fixed wire options
/// first, then preference-derived parameters, then the access token.
pub fn request_params(
    query: &RouteQuery,
    access_token: Option<&str>,
) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("geometries", "geojson".to_string()),
        ("overview", "full".to_string()),
        ("steps", "true".to_string()),
        ("alternatives", "true".to_string()),
        ("annotations", "distance,duration".to_string()),
    ];
    params.extend(query.preferences.query_params());
    if let Some(token) = access_token {
        params.push(("access_token", token.to_string()));
    }
    params
}

/// Best-effort human-readable message from a provider error body.
fn provider_message(body: &str) -> String {
    if let Ok(wire) = serde_json::from_str::<WireErrorBody>(body) {
        if let Some(message) = wire.message {
            return message;
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "unknown provider error".to_string()
    } else {
        trimmed.chars().take(200).collect()
    }
}

#[derive(Debug, Deserialize)]
struct WireErrorBody {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireDirectionsResponse {
    #[serde(default)]
    routes: Vec<WireRoute>,
}

#[derive(Debug, Deserialize)]
struct WireRoute {
    distance: f64,
    duration: f64,
    geometry: WireGeometry,
    #[serde(default)]
    legs: Vec<WireLeg>,
}

#[derive(Debug, Deserialize)]
struct WireGeometry {
    #[serde(default)]
    coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Deserialize)]
struct WireLeg {
    distance: f64,
    duration: f64,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    steps: Vec<WireStep>,
}

#[derive(Debug, Deserialize)]
struct WireStep {
    distance: f64,
    duration: f64,
    #[serde(default)]
    name: String,
    #[serde(default)]
    mode: String,
    geometry: Option<WireGeometry>,
    maneuver: Option<WireManeuver>,
}

#[derive(Debug, Deserialize)]
struct WireManeuver {
    instruction: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    modifier: Option<String>,
    location: Option<[f64; 2]>,
}

impl From<WireGeometry> for Polyline {
    fn from(wire: WireGeometry) -> Self {
        Polyline::new(
            wire.coordinates
                .into_iter()
                .map(|pos| Coordinate::from_lng_lat(pos[0], pos[1]))
                .collect(),
        )
    }
}

impl From<WireRoute> for Route {
    fn from(wire: WireRoute) -> Self {
        Route {
            distance: wire.distance,
            duration: wire.duration,
            geometry: wire.geometry.into(),
            legs: wire.legs.into_iter().map(Leg::from).collect(),
        }
    }
}

impl From<WireLeg> for Leg {
    fn from(wire: WireLeg) -> Self {
        Leg {
            distance: wire.distance,
            duration: wire.duration,
            summary: wire.summary,
            steps: wire.steps.into_iter().map(Step::from).collect(),
        }
    }
}

impl From<WireStep> for Step {
    fn from(wire: WireStep) -> Self {
        let geometry: Polyline = wire.geometry.map(Polyline::from).unwrap_or_default();
        let maneuver = match wire.maneuver {
            Some(m) => Maneuver {
                instruction: m.instruction,
                turn: m
                    .kind
                    .as_deref()
                    .map(TurnType::from_wire)
                    .unwrap_or(TurnType::Other),
                modifier: m
                    .modifier
                    .as_deref()
                    .and_then(crate::route::TurnModifier::from_wire),
                location: m
                    .location
                    .map(|pos| Coordinate::from_lng_lat(pos[0], pos[1]))
                    .or_else(|| geometry.first())
                    .unwrap_or(Coordinate::new(0.0, 0.0)),
            },
            // Steps without a maneuver keep a placeholder anchored to
            // the step geometry.
            None => Maneuver {
                instruction: None,
                turn: TurnType::Other,
                modifier: None,
                location: geometry.first().unwrap_or(Coordinate::new(0.0, 0.0)),
            },
        };

        Step {
            distance: wire.distance,
            duration: wire.duration,
            name: wire.name,
            travel_mode: wire.mode,
            geometry,
            maneuver,
        }
    }
}
