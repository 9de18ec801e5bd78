//! Bounded-concurrency enrichment of sample coordinates.
//!
//! Every outbound call, pollution or weather, holds one permit of a shared
//! semaphore for its duration and is bounded by the configured timeout.
//! Cache hits take no permit. Failures never propagate: a failed pollution
//! lookup yields an all-missing reading and a failed weather lookup yields
//! absent humidity, each logged at `warn`.

use std::future::Future;
use std::time::Duration;

use futures_util::future::join_all;
use log::warn;
use routerisk_core::{
    Clock, EnrichmentError, PollutantReading, PollutionSource, SampleCoordinate, WeatherReading,
    WeatherSource,
};
use tokio::sync::Semaphore;

use crate::cache::EnrichmentCache;
use crate::config::EvaluatorConfig;

/// Readings gathered for one coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnrichedSample {
    /// Coordinate the readings belong to.
    pub coordinate: SampleCoordinate,
    /// Pollutant concentrations, all missing on failure.
    pub pollution: PollutantReading,
    /// Relative humidity, absent on failure.
    pub weather: WeatherReading,
}

impl EnrichedSample {
    /// Report whether the coordinate yielded any data.
    #[must_use]
    pub fn is_used(&self) -> bool {
        !self.pollution.is_missing() || self.weather.humidity().is_some()
    }
}

/// Fetches enrichment data for coordinates through the cache and the gate.
#[derive(Debug)]
pub struct EnrichmentFetcher<P, W, C> {
    pollution: P,
    weather: W,
    cache: EnrichmentCache<C>,
    gate: Semaphore,
    call_timeout: Duration,
}

impl<P, W, C> EnrichmentFetcher<P, W, C>
where
    P: PollutionSource,
    W: WeatherSource,
    C: Clock,
{
    /// Fetcher over the given providers and cache.
    #[must_use]
    pub fn new(pollution: P, weather: W, cache: EnrichmentCache<C>, config: &EvaluatorConfig) -> Self {
        Self {
            pollution,
            weather,
            cache,
            gate: Semaphore::new(config.permits()),
            call_timeout: config.call_timeout,
        }
    }

    /// Pollution readings for `coordinates`, in input order.
    ///
    /// Used for the batch baseline; weather is not requested.
    pub async fn pollution_readings(&self, coordinates: &[SampleCoordinate]) -> Vec<PollutantReading> {
        join_all(coordinates.iter().map(|&coord| self.cached_pollution(coord))).await
    }

    /// Pollution and weather readings for `coordinates`, in input order.
    ///
    /// Pollution is served from the cache when fresh; weather is always
    /// requested.
    pub async fn enrich(&self, coordinates: &[SampleCoordinate]) -> Vec<EnrichedSample> {
        join_all(coordinates.iter().map(|&coordinate| async move {
            let (pollution, weather) =
                tokio::join!(self.cached_pollution(coordinate), self.fresh_weather(coordinate));
            EnrichedSample {
                coordinate,
                pollution,
                weather,
            }
        }))
        .await
    }

    /// Cache consulted and refreshed by this fetcher.
    #[must_use]
    pub const fn cache(&self) -> &EnrichmentCache<C> {
        &self.cache
    }

    /// Pollution provider.
    #[must_use]
    pub const fn pollution_source(&self) -> &P {
        &self.pollution
    }

    /// Weather provider.
    #[must_use]
    pub const fn weather_source(&self) -> &W {
        &self.weather
    }

    async fn cached_pollution(&self, coordinate: SampleCoordinate) -> PollutantReading {
        if let Some(hit) = self.cache.lookup(coordinate) {
            return hit;
        }
        match self
            .gated("pollution", self.pollution.pollutants(coordinate))
            .await
        {
            Ok(reading) => {
                self.cache.store(coordinate, reading);
                reading
            }
            Err(err) => {
                warn!("pollution lookup failed at {coordinate}: {err}");
                PollutantReading::missing()
            }
        }
    }

    async fn fresh_weather(&self, coordinate: SampleCoordinate) -> WeatherReading {
        self.gated("weather", self.weather.humidity(coordinate))
            .await
            .unwrap_or_else(|err| {
                warn!("weather lookup failed at {coordinate}: {err}");
                WeatherReading::absent()
            })
    }

    async fn gated<T, F>(&self, provider: &str, call: F) -> Result<T, EnrichmentError>
    where
        F: Future<Output = Result<T, EnrichmentError>>,
    {
        // The gate is never closed.
        let _permit = self.gate.acquire().await.ok();
        tokio::time::timeout(self.call_timeout, call)
            .await
            .map_err(|_| EnrichmentError::Timeout {
                url: provider.to_owned(),
                timeout_secs: self.call_timeout.as_secs(),
            })?
    }
}
