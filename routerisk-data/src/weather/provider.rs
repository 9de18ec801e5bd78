//! HTTP-based `WeatherSource` using a point forecast API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use routerisk_core::{EnrichmentError, SampleCoordinate, WeatherReading, WeatherSource};
use url::Url;

use super::response::ForecastResponse;
use crate::air_quality::DEFAULT_USER_AGENT;
use crate::http::{ProviderBuildError, build_client, convert_reqwest_error, parse_base_url};

/// Default point forecast endpoint.
pub const DEFAULT_FORECAST_URL: &str = "https://data.tmd.go.th/nwpapi/v1/forecast/point";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 4;

/// Configuration for [`HttpWeatherSource`].
#[derive(Clone)]
pub struct WeatherConfig {
    /// Forecast endpoint.
    pub base_url: String,
    /// Bearer token sent in the `Authorization` header.
    pub bearer_token: String,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl std::fmt::Debug for WeatherConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherConfig")
            .field("base_url", &self.base_url)
            .field("bearer_token", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_FORECAST_URL.to_owned(),
            bearer_token: String::new(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl WeatherConfig {
    /// Create a configuration for the default endpoint with `bearer_token`.
    #[must_use]
    pub fn new(bearer_token: impl Into<String>) -> Self {
        Self {
            bearer_token: bearer_token.into(),
            ..Default::default()
        }
    }

    /// Set the forecast endpoint.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Weather source backed by a point forecast API.
#[derive(Debug)]
pub struct HttpWeatherSource {
    client: Client,
    endpoint: Url,
    config: WeatherConfig,
}

impl HttpWeatherSource {
    /// Create a source for the default endpoint.
    ///
    /// # Errors
    /// Returns an error if the HTTP client fails to build.
    pub fn new(bearer_token: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(WeatherConfig::new(bearer_token))
    }

    /// Create a source with explicit configuration.
    ///
    /// # Errors
    /// Returns an error if the base URL is invalid or the HTTP client fails
    /// to build.
    pub fn with_config(config: WeatherConfig) -> Result<Self, ProviderBuildError> {
        let endpoint = parse_base_url(&config.base_url)?;
        let client = build_client(&config.user_agent, config.timeout)?;
        Ok(Self {
            client,
            endpoint,
            config,
        })
    }
}

#[async_trait]
impl WeatherSource for HttpWeatherSource {
    async fn humidity(
        &self,
        coordinate: SampleCoordinate,
    ) -> Result<WeatherReading, EnrichmentError> {
        let convert = |err: reqwest::Error| {
            convert_reqwest_error(&err, &self.endpoint, self.config.timeout)
        };

        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[("lat", coordinate.latitude), ("lon", coordinate.longitude)])
            .bearer_auth(&self.config.bearer_token)
            .send()
            .await
            .map_err(convert)?
            .error_for_status()
            .map_err(convert)?;

        let body: ForecastResponse = response.json().await.map_err(convert)?;
        body.humidity()
            .map(WeatherReading::from_humidity)
            .ok_or(EnrichmentError::EmptyResponse)
    }
}
