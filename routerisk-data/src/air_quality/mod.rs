//! Pollutant concentrations from an air-quality lookup service.
//!
//! [`HttpPollutionSource`] implements
//! [`routerisk_core::PollutionSource`] against a current-conditions lookup
//! endpoint. One POST is issued per coordinate with the API key in the query
//! string; the response's pollutant list is normalised onto the six tracked
//! codes.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use routerisk_core::{PollutionSource, SampleCoordinate};
//! use routerisk_data::air_quality::{AirQualityConfig, HttpPollutionSource};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AirQualityConfig::new("api-key").with_timeout(Duration::from_secs(2));
//! let source = HttpPollutionSource::with_config(config)?;
//! let reading = source.pollutants(SampleCoordinate::new(13.75, 100.5)).await?;
//! println!("{:?}", reading.get(routerisk_core::Pollutant::Pm25));
//! # Ok(())
//! # }
//! ```

mod provider;
mod response;

pub use provider::{
    AirQualityConfig, DEFAULT_AIR_QUALITY_URL, DEFAULT_USER_AGENT, HttpPollutionSource,
};
