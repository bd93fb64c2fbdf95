//! Geocoding HTTP adapter.
//!
//! Speaks the Mapbox Geocoding v5 wire format: the query is a path
//! segment, results come back as GeoJSON features with `[lng, lat]`
//! centers.

use serde::Deserialize;
use tracing::debug;

use crate::geo::Coordinate;
use crate::traits::GeocodingProvider;

/// A named place returned by a geocoding search.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    /// Short name, e.g. `Golden Gate Park`.
    pub name: String,
    /// Full display label including region context.
    pub label: String,
    pub location: Coordinate,
}

/// Errors from a geocoding search.
#[derive(Debug, thiserror::Error)]
pub enum GeocodingError {
    /// The configured base URL is not usable.
    #[error("invalid geocoding base URL: {0}")]
    InvalidBaseUrl(String),

    /// Transport-level failure (connect, timeout, TLS).
    #[error("geocoding request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("geocoding provider returned {status}: {message}")]
    Provider { status: u16, message: String },

    /// The response body did not match the expected wire format.
    #[error("malformed geocoding response: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Geocoding provider endpoint settings.
#[derive(Debug, Clone)]
pub struct GeocodingConfig {
    pub base_url: String,
    pub access_token: Option<String>,
    /// Maximum results per search.
    pub limit: u8,
    /// BCP 47 language tag for result labels.
    pub language: String,
    pub timeout_secs: u64,
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.mapbox.com/geocoding/v5/mapbox.places".to_string(),
            access_token: None,
            limit: 5,
            language: "en".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Async client for a Mapbox-compatible geocoding endpoint.
#[derive(Debug, Clone)]
pub struct GeocodingClient {
    config: GeocodingConfig,
    base: reqwest::Url,
    client: reqwest::Client,
}

impl GeocodingClient {
    /// Validates the base URL once so per-request URL building cannot
    /// fail.
    pub fn new(config: GeocodingConfig) -> Result<Self, GeocodingError> {
        let base = reqwest::Url::parse(&config.base_url)
            .map_err(|err| GeocodingError::InvalidBaseUrl(err.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(GeocodingError::InvalidBaseUrl(
                "base URL cannot take path segments".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            config,
            base,
            client,
        })
    }

    /// Search URL for `query`: the query becomes a percent-encoded
    /// `.json` path segment under the base.
    pub fn place_url(&self, query: &str) -> reqwest::Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(&format!("{}.json", query));
        }
        url
    }

    async fn request_places(&self, query: &str) -> Result<Vec<Place>, GeocodingError> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Ok(Vec::new());
        }

        let mut params = vec![
            ("types", "place,address,poi".to_string()),
            ("limit", self.config.limit.to_string()),
            ("language", self.config.language.clone()),
        ];
        if let Some(token) = &self.config.access_token {
            params.push(("access_token", token.clone()));
        }

        debug!("geocoding search: {:?}", trimmed);
        let response = self
            .client
            .get(self.place_url(trimmed))
            .query(&params)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(GeocodingError::Provider {
                status: status.as_u16(),
                message: provider_message(&body),
            });
        }

        let decoded: WireGeocodingResponse = serde_json::from_str(&body)?;
        debug!("geocoding response: {} feature(s)", decoded.features.len());
        Ok(decoded.features.into_iter().map(Place::from).collect())
    }
}

impl GeocodingProvider for GeocodingClient {
    async fn search(&self, query: &str) -> Result<Vec<Place>, GeocodingError> {
        self.request_places(query).await
    }
}

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
struct WireGeocodingResponse {
    #[serde(default)]
    features: Vec<WireFeature>,
}

#[derive(Debug, Deserialize)]
struct WireFeature {
    #[serde(default)]
    text: String,
    #[serde(default)]
    place_name: String,
    center: [f64; 2],
}

impl From<WireFeature> for Place {
    fn from(wire: WireFeature) -> Self {
        Self {
            name: wire.text,
            label: wire.place_name,
            location: Coordinate::from_lng_lat(wire.center[0], wire.center[1]),
        }
    }
}
