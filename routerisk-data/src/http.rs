//! Client construction and error mapping shared by the HTTP adapters.

use std::time::Duration;

use reqwest::Client;
use routerisk_core::EnrichmentError;
use thiserror::Error;
use url::Url;

/// Errors raised while constructing an HTTP provider.
#[derive(Debug, Error)]
pub enum ProviderBuildError {
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// The configured base URL is not an absolute HTTP(S) URL.
    #[error("invalid base URL '{url}': {message}")]
    InvalidUrl {
        /// Rejected URL.
        url: String,
        /// Why it was rejected.
        message: String,
    },
}

pub(crate) fn build_client(user_agent: &str, timeout: Duration) -> Result<Client, ProviderBuildError> {
    Client::builder()
        .user_agent(user_agent)
        .connect_timeout(timeout)
        .timeout(timeout)
        .build()
        .map_err(ProviderBuildError::HttpClient)
}

pub(crate) fn parse_base_url(raw: &str) -> Result<Url, ProviderBuildError> {
    let url = Url::parse(raw).map_err(|err| ProviderBuildError::InvalidUrl {
        url: raw.to_owned(),
        message: err.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ProviderBuildError::InvalidUrl {
            url: raw.to_owned(),
            message: format!("unsupported scheme '{other}'"),
        }),
    }
}

/// Map a reqwest failure onto the enrichment taxonomy.
///
/// `url` must be the credential-free endpoint, never the full request URL.
pub(crate) fn convert_reqwest_error(
    error: &reqwest::Error,
    url: &Url,
    timeout: Duration,
) -> EnrichmentError {
    if error.is_timeout() {
        return EnrichmentError::Timeout {
            url: url.to_string(),
            timeout_secs: timeout.as_secs(),
        };
    }

    if let Some(status) = error.status() {
        return EnrichmentError::Http {
            url: url.to_string(),
            status: status.as_u16(),
            message: status
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_owned(),
        };
    }

    if error.is_decode() {
        return EnrichmentError::Parse {
            message: describe(error),
        };
    }

    EnrichmentError::Network {
        url: url.to_string(),
        message: describe(error),
    }
}

/// Describe the underlying cause without reqwest's URL suffix, which may
/// carry an API key in its query string.
fn describe(error: &reqwest::Error) -> String {
    std::error::Error::source(error)
        .map_or_else(|| "request failed".to_owned(), ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("https://example.com/lookup")]
    #[case("http://localhost:8080")]
    fn accepts_http_urls(#[case] raw: &str) {
        assert!(parse_base_url(raw).is_ok());
    }

    #[rstest]
    #[case("not a url")]
    #[case("ftp://example.com")]
    fn rejects_other_urls(#[case] raw: &str) {
        let err = parse_base_url(raw).expect_err("url should be rejected");
        assert!(matches!(err, ProviderBuildError::InvalidUrl { .. }));
    }
}
