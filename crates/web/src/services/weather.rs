//! Weather client for the home page widget.
//!
//! Reads current conditions from an OpenWeatherMap-compatible endpoint.
//! Reports are cached per city for 10 minutes.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use secrecy::ExposeSecret;
use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;

use crate::config::WeatherConfig;

/// How long a report stays cached.
const CACHE_TTL: Duration = Duration::from_secs(600);

/// Upper bound on one weather request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors that can occur when fetching weather.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response did not include any conditions.
    #[error("weather response has no conditions")]
    MissingConditions,
}

/// Current weather for a city.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub city: String,
    /// Degrees Celsius
    pub temperature: f64,
    pub description: String,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    name: String,
    main: ApiMain,
    weather: Vec<ApiCondition>,
}

#[derive(Debug, Deserialize)]
struct ApiMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct ApiCondition {
    description: String,
}

impl TryFrom<ApiResponse> for WeatherReport {
    type Error = WeatherError;

    fn try_from(response: ApiResponse) -> Result<Self, Self::Error> {
        let condition = response
            .weather
            .into_iter()
            .next()
            .ok_or(WeatherError::MissingConditions)?;

        Ok(Self {
            city: response.name,
            temperature: response.main.temp,
            description: condition.description,
        })
    }
}

/// Client for current weather conditions.
#[derive(Clone)]
pub struct WeatherClient {
    inner: Arc<WeatherClientInner>,
}

struct WeatherClientInner {
    client: reqwest::Client,
    config: WeatherConfig,
    cache: Cache<String, WeatherReport>,
}

impl WeatherClient {
    /// Create a new weather client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: WeatherConfig) -> Result<Self, WeatherError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        let cache = Cache::builder()
            .max_capacity(16)
            .time_to_live(CACHE_TTL)
            .build();

        Ok(Self {
            inner: Arc::new(WeatherClientInner {
                client,
                config,
                cache,
            }),
        })
    }

    /// City this client reports on.
    #[must_use]
    pub fn city(&self) -> &str {
        &self.inner.config.city
    }

    /// Current weather for the configured city.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self), fields(city = %self.city()))]
    pub async fn current(&self) -> Result<WeatherReport, WeatherError> {
        let city = self.city().to_string();

        if let Some(report) = self.inner.cache.get(&city).await {
            tracing::debug!("Cache hit for weather");
            return Ok(report);
        }

        let config = &self.inner.config;
        let response: ApiResponse = self
            .inner
            .client
            .get(config.endpoint.clone())
            .query(&[
                ("q", config.city.as_str()),
                ("appid", config.api_key.expose_secret()),
                ("units", "metric"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let report = WeatherReport::try_from(response)?;
        self.inner.cache.insert(city, report.clone()).await;

        Ok(report)
    }
}
