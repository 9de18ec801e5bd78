//! Provider traits for per-coordinate enrichment lookups.

use async_trait::async_trait;

use crate::{PollutantReading, SampleCoordinate, WeatherReading};

use super::error::EnrichmentError;

/// Look up pollutant concentrations at a coordinate.
///
/// Implementations must return a reading with a slot for every pollutant;
/// codes the provider did not report stay missing. Lookups are issued
/// concurrently, so implementations must be `Send + Sync`.
#[async_trait]
pub trait PollutionSource: Send + Sync {
    /// Fetch the current pollutant concentrations at `coordinate`.
    async fn pollutants(
        &self,
        coordinate: SampleCoordinate,
    ) -> Result<PollutantReading, EnrichmentError>;
}

/// Look up relative humidity at a coordinate.
#[async_trait]
pub trait WeatherSource: Send + Sync {
    /// Fetch the current relative humidity at `coordinate`.
    async fn humidity(&self, coordinate: SampleCoordinate)
    -> Result<WeatherReading, EnrichmentError>;
}
