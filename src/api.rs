//! Provider clients: current weather and place search
//!
//! Both calls are plain request/response with no retry and no caching.
//! Every failure mode (network error, non-success status, malformed JSON)
//! is absorbed here: weather degrades to a fixed fallback reading, search
//! degrades to an empty result list. Callers never see an error.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;

use crate::state::{Location, WeatherSnapshot};

const DEFAULT_WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
const DEFAULT_GEOCODE_URL: &str = "https://nominatim.openstreetmap.org/search";
const REQUEST_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = concat!("tui-weathermap/", env!("CARGO_PKG_VERSION"));

/// Maximum number of geocoding results requested and returned.
pub const SEARCH_RESULT_LIMIT: usize = 5;

/// Provider endpoints and credentials, injected from configuration. Tests
/// point the URLs at a local mock server.
#[derive(Clone, Debug)]
pub struct ProviderConfig {
    /// Weather provider API key. Without one the provider rejects the call
    /// and the client serves the fallback reading.
    pub api_key: Option<String>,
    pub weather_url: String,
    pub geocode_url: String,
}

impl ProviderConfig {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            weather_url: DEFAULT_WEATHER_URL.into(),
            geocode_url: DEFAULT_GEOCODE_URL.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("provider returned status {0}")]
    Status(StatusCode),
}

/// A completed weather fetch: the reading plus the provider's place name,
/// when it supplied a non-empty one.
#[derive(Clone, Debug, PartialEq)]
pub struct Observation {
    pub snapshot: WeatherSnapshot,
    pub place_name: Option<String>,
}

impl Observation {
    fn fallback() -> Self {
        Self {
            snapshot: WeatherSnapshot::fallback(),
            place_name: None,
        }
    }
}

// ============================================================================
// Weather provider payload
// ============================================================================

#[derive(Debug, Deserialize)]
struct WeatherResponse {
    main: MainSection,
    weather: Vec<ConditionSection>,
    wind: WindSection,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MainSection {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct ConditionSection {
    description: String,
}

#[derive(Debug, Deserialize)]
struct WindSection {
    speed: f64,
}

fn observation_from(response: WeatherResponse) -> Observation {
    let condition = response
        .weather
        .into_iter()
        .next()
        .map(|section| section.description)
        .unwrap_or_else(|| WeatherSnapshot::fallback().condition);

    Observation {
        snapshot: WeatherSnapshot {
            temperature_c: response.main.temp,
            condition,
            humidity_pct: response.main.humidity,
            wind_speed: response.wind.speed,
        },
        place_name: response.name.filter(|name| !name.is_empty()),
    }
}

// ============================================================================
// Geocoding provider payload
// ============================================================================

#[derive(Debug, Deserialize)]
struct PlaceResponse {
    display_name: String,
    // Coordinates arrive string-encoded
    lat: String,
    lon: String,
}

fn locations_from(places: Vec<PlaceResponse>) -> Vec<Location> {
    places
        .into_iter()
        .filter_map(|place| {
            let latitude: f64 = place.lat.parse().ok()?;
            let longitude: f64 = place.lon.parse().ok()?;
            Some(Location {
                label: place.display_name,
                latitude,
                longitude,
            })
        })
        .take(SEARCH_RESULT_LIMIT)
        .collect()
}

// ============================================================================
// Client
// ============================================================================

#[derive(Clone, Debug)]
pub struct GeoWeatherClient {
    http: Client,
    config: ProviderConfig,
}

impl GeoWeatherClient {
    pub fn new(config: ProviderConfig) -> Result<Self, FetchError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { http, config })
    }

    /// Fetch current weather for the position. Never fails: any error
    /// resolves to the fallback observation.
    pub async fn fetch_weather(&self, latitude: f64, longitude: f64) -> Observation {
        match self.try_fetch_weather(latitude, longitude).await {
            Ok(observation) => observation,
            Err(error) => {
                tracing::warn!(latitude, longitude, %error, "weather fetch failed, using fallback");
                Observation::fallback()
            }
        }
    }

    async fn try_fetch_weather(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Observation, FetchError> {
        let mut url = format!(
            "{}?lat={}&lon={}&units=metric",
            self.config.weather_url, latitude, longitude
        );
        if let Some(key) = &self.config.api_key {
            url.push_str("&appid=");
            url.push_str(key);
        }

        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }
        let body: WeatherResponse = response.json().await?;
        Ok(observation_from(body))
    }

    /// Search places by free text, up to [`SEARCH_RESULT_LIMIT`] results.
    /// Never fails: any error resolves to an empty list.
    pub async fn search_places(&self, query: &str) -> Vec<Location> {
        match self.try_search_places(query).await {
            Ok(locations) => locations,
            Err(error) => {
                tracing::warn!(query, %error, "place search failed, returning no results");
                Vec::new()
            }
        }
    }

    async fn try_search_places(&self, query: &str) -> Result<Vec<Location>, FetchError> {
        let url = format!(
            "{}?format=json&q={}&limit={}",
            self.config.geocode_url,
            urlencoding::encode(query),
            SEARCH_RESULT_LIMIT
        );

        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }
        let places: Vec<PlaceResponse> = response.json().await?;
        Ok(locations_from(places))
    }
}
