//! Test helpers for writing CLI inputs and stubbing providers.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use routerisk_core::test_support::{StubPollutionSource, StubWeatherSource};
use routerisk_core::{EnrichmentError, Pollutant, PollutantReading};
use serde_json::json;
use tempfile::TempDir;

use crate::CliError;
use crate::score::{ScoreConfig, ScoreProviderBuilder};

/// Encoded path with three distinct points.
pub(super) const THREE_POINT_PATH: &str = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    fs::write(path.as_std_path(), contents).expect("write test input");
}

pub(super) fn temp_root() -> (TempDir, Utf8PathBuf) {
    let tmp = TempDir::new().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
    (tmp, root)
}

/// Request JSON with two routes sharing a path, the second twice as long.
pub(super) fn two_route_request() -> serde_json::Value {
    json!({
        "routes": [
            {
                "id": "a",
                "encodedPolyline": THREE_POINT_PATH,
                "distanceMeters": 1000.0,
                "durationSeconds": 120.0
            },
            {
                "id": "b",
                "encodedPolyline": THREE_POINT_PATH,
                "distanceMeters": 2000.0,
                "durationSeconds": 240.0
            }
        ]
    })
}

/// Builds stub providers with fixed readings.
#[derive(Debug, Clone, Copy)]
pub(super) struct StubProviderBuilder {
    pub(super) pollution: Option<PollutantReading>,
    pub(super) humidity: Option<f64>,
}

impl StubProviderBuilder {
    /// Moderate PM2.5 everywhere and 50% humidity.
    pub(super) fn moderate() -> Self {
        Self {
            pollution: Some(PollutantReading::missing().with(Pollutant::Pm25, 20.0)),
            humidity: Some(50.0),
        }
    }
}

impl ScoreProviderBuilder for StubProviderBuilder {
    type Pollution = StubPollutionSource;
    type Weather = StubWeatherSource;

    fn build(
        &self,
        _config: &ScoreConfig,
    ) -> Result<(StubPollutionSource, StubWeatherSource), CliError> {
        let pollution = self.pollution.map_or_else(
            || StubPollutionSource::with_error(EnrichmentError::EmptyResponse),
            StubPollutionSource::with_reading,
        );
        let weather = self
            .humidity
            .map_or_else(StubWeatherSource::absent, StubWeatherSource::with_humidity);
        Ok((pollution, weather))
    }
}
