//! HTTP-based `PollutionSource` using a current-conditions lookup API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use routerisk_core::{EnrichmentError, PollutantReading, PollutionSource, SampleCoordinate};
use url::Url;

use super::response::{EXTRA_COMPUTATIONS, Location, LookupRequest, LookupResponse};
use crate::http::{ProviderBuildError, build_client, convert_reqwest_error, parse_base_url};

/// Default user agent for provider requests.
pub const DEFAULT_USER_AGENT: &str = "routerisk/0.1";

/// Default current-conditions endpoint.
pub const DEFAULT_AIR_QUALITY_URL: &str =
    "https://airquality.googleapis.com/v1/currentConditions:lookup";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 4;

/// Configuration for [`HttpPollutionSource`].
#[derive(Clone)]
pub struct AirQualityConfig {
    /// Lookup endpoint.
    pub base_url: String,
    /// API key sent as the `key` query parameter.
    pub api_key: String,
    /// Language for descriptive fields in the response.
    pub language_code: String,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl std::fmt::Debug for AirQualityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AirQualityConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("language_code", &self.language_code)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl Default for AirQualityConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_AIR_QUALITY_URL.to_owned(),
            api_key: String::new(),
            language_code: "en".to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl AirQualityConfig {
    /// Create a configuration for the default endpoint with `api_key`.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    /// Set the lookup endpoint.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the response language.
    #[must_use]
    pub fn with_language_code(mut self, language_code: impl Into<String>) -> Self {
        self.language_code = language_code.into();
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

/// Pollution source backed by a current-conditions lookup API.
///
/// Each call issues one POST for one coordinate. Missing pollutants are
/// reported as missing slots; failures surface as [`EnrichmentError`] so the
/// caller can decide how to absorb them.
#[derive(Debug)]
pub struct HttpPollutionSource {
    client: Client,
    endpoint: Url,
    config: AirQualityConfig,
}

impl HttpPollutionSource {
    /// Create a source for the default endpoint.
    ///
    /// # Errors
    /// Returns an error if the HTTP client fails to build.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(AirQualityConfig::new(api_key))
    }

    /// Create a source with explicit configuration.
    ///
    /// # Errors
    /// Returns an error if the base URL is invalid or the HTTP client fails
    /// to build.
    pub fn with_config(config: AirQualityConfig) -> Result<Self, ProviderBuildError> {
        let endpoint = parse_base_url(&config.base_url)?;
        let client = build_client(&config.user_agent, config.timeout)?;
        Ok(Self {
            client,
            endpoint,
            config,
        })
    }

    fn request_body(&self, coordinate: SampleCoordinate) -> LookupRequest<'_> {
        LookupRequest {
            location: Location {
                latitude: coordinate.latitude,
                longitude: coordinate.longitude,
            },
            extra_computations: EXTRA_COMPUTATIONS,
            language_code: &self.config.language_code,
        }
    }
}

#[async_trait]
impl PollutionSource for HttpPollutionSource {
    async fn pollutants(
        &self,
        coordinate: SampleCoordinate,
    ) -> Result<PollutantReading, EnrichmentError> {
        let convert = |err: reqwest::Error| {
            convert_reqwest_error(&err, &self.endpoint, self.config.timeout)
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .query(&[("key", self.config.api_key.as_str())])
            .json(&self.request_body(coordinate))
            .send()
            .await
            .map_err(convert)?
            .error_for_status()
            .map_err(convert)?;

        let body: LookupResponse = response.json().await.map_err(convert)?;
        let reading = body.into_reading();
        if reading.is_missing() {
            log::debug!("no pollutants reported at {coordinate}");
        }
        Ok(reading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn config_builder_pattern() {
        let config = AirQualityConfig::new("secret")
            .with_base_url("http://localhost:9000/lookup")
            .with_language_code("th")
            .with_timeout(Duration::from_secs(2))
            .with_user_agent("test-agent/1.0");

        assert_eq!(config.base_url, "http://localhost:9000/lookup");
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.language_code, "th");
        assert_eq!(config.timeout, Duration::from_secs(2));
        assert_eq!(config.user_agent, "test-agent/1.0");
    }

    #[rstest]
    fn debug_output_redacts_api_key() {
        let rendered = format!("{:?}", AirQualityConfig::new("secret"));
        assert!(!rendered.contains("secret"));
    }

    #[rstest]
    fn defaults_match_provider_contract() {
        let config = AirQualityConfig::default();
        assert_eq!(config.base_url, DEFAULT_AIR_QUALITY_URL);
        assert_eq!(config.language_code, "en");
        assert_eq!(config.timeout, Duration::from_secs(4));
    }

    #[rstest]
    fn rejects_invalid_base_url() {
        let config = AirQualityConfig::new("k").with_base_url("::");
        let err = HttpPollutionSource::with_config(config).expect_err("should fail");
        assert!(matches!(err, ProviderBuildError::InvalidUrl { .. }));
    }

    #[rstest]
    fn request_body_carries_coordinate() {
        let source = HttpPollutionSource::new("k").expect("source should build");
        let body = source.request_body(SampleCoordinate::new(13.7, 100.5));
        assert_eq!(body.location.latitude, 13.7);
        assert_eq!(body.location.longitude, 100.5);
        assert_eq!(body.language_code, "en");
    }

    #[rstest]
    fn unreachable_endpoint_is_network_error() {
        let config = AirQualityConfig::new("secret")
            .with_base_url("http://127.0.0.1:9/lookup")
            .with_timeout(Duration::from_millis(500));
        let source = HttpPollutionSource::with_config(config).expect("source should build");
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("runtime should build");

        let err = runtime
            .block_on(source.pollutants(SampleCoordinate::new(0.0, 0.0)))
            .expect_err("nothing listens on the discard port");

        assert!(!err.to_string().contains("secret"));
    }
}
