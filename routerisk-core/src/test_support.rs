//! Deterministic collaborators for unit and behaviour tests.
//!
//! The stubs count their calls so tests can assert on cache hits and on the
//! number of outbound requests an operation issued.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use camino::Utf8PathBuf;

use crate::{
    Clock, EnrichmentError, OntologyError, OntologyModel, OntologySource, PollutantReading,
    PollutionSource, SampleCoordinate, WeatherReading, WeatherSource,
};

/// Clock advanced explicitly by the test.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Instant>,
}

impl ManualClock {
    /// Start the clock at the current instant.
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Instant::now()),
        }
    }

    /// Move the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        if let Ok(mut now) = self.now.lock() {
            *now += by;
        }
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now
            .lock()
            .map_or_else(|poisoned| *poisoned.into_inner(), |now| *now)
    }
}

/// Key used by the stubs to match coordinates exactly.
fn coordinate_key(coord: SampleCoordinate) -> (u64, u64) {
    (coord.latitude.to_bits(), coord.longitude.to_bits())
}

/// Pollution source returning canned readings.
///
/// Coordinates with an explicit reading take precedence over the fallback.
/// The fallback is either a reading or an error applied to every other
/// coordinate.
#[derive(Debug)]
pub struct StubPollutionSource {
    fallback: Result<PollutantReading, EnrichmentError>,
    by_coordinate: HashMap<(u64, u64), PollutantReading>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl StubPollutionSource {
    /// Return `reading` for every coordinate.
    pub fn with_reading(reading: PollutantReading) -> Self {
        Self::from_fallback(Ok(reading))
    }

    /// Fail every lookup with `error`.
    pub fn with_error(error: EnrichmentError) -> Self {
        Self::from_fallback(Err(error))
    }

    fn from_fallback(fallback: Result<PollutantReading, EnrichmentError>) -> Self {
        Self {
            fallback,
            by_coordinate: HashMap::new(),
            delay: None,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
        }
    }

    /// Return `reading` for `coord` specifically.
    #[must_use]
    pub fn with_reading_at(mut self, coord: SampleCoordinate, reading: PollutantReading) -> Self {
        self.by_coordinate.insert(coordinate_key(coord), reading);
        self
    }

    /// Sleep for `delay` before answering, holding the call open.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of lookups served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of lookups observed running at once.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PollutionSource for StubPollutionSource {
    async fn pollutants(
        &self,
        coord: SampleCoordinate,
    ) -> Result<PollutantReading, EnrichmentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(running, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        match self.by_coordinate.get(&coordinate_key(coord)) {
            Some(reading) => Ok(*reading),
            None => self.fallback.clone(),
        }
    }
}

/// Weather source returning a fixed humidity or error.
#[derive(Debug)]
pub struct StubWeatherSource {
    response: Result<WeatherReading, EnrichmentError>,
    by_coordinate: HashMap<(u64, u64), WeatherReading>,
    calls: AtomicUsize,
}

impl StubWeatherSource {
    /// Report `percent` humidity everywhere.
    pub fn with_humidity(percent: f64) -> Self {
        Self::from_response(Ok(WeatherReading::from_humidity(percent)))
    }

    /// Report no humidity anywhere.
    pub fn absent() -> Self {
        Self::from_response(Ok(WeatherReading::absent()))
    }

    /// Fail every lookup with `error`.
    pub fn with_error(error: EnrichmentError) -> Self {
        Self::from_response(Err(error))
    }

    fn from_response(response: Result<WeatherReading, EnrichmentError>) -> Self {
        Self {
            response,
            by_coordinate: HashMap::new(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Report `percent` humidity at `coord` specifically.
    #[must_use]
    pub fn with_humidity_at(mut self, coord: SampleCoordinate, percent: f64) -> Self {
        self.by_coordinate
            .insert(coordinate_key(coord), WeatherReading::from_humidity(percent));
        self
    }

    /// Number of lookups served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WeatherSource for StubWeatherSource {
    async fn humidity(&self, coord: SampleCoordinate) -> Result<WeatherReading, EnrichmentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.by_coordinate.get(&coordinate_key(coord)) {
            Some(reading) => Ok(*reading),
            None => self.response.clone(),
        }
    }
}

/// Ontology source serving an in-memory model, or failing.
#[derive(Debug, Clone)]
pub struct StubOntologySource {
    model: Option<OntologyModel>,
}

impl StubOntologySource {
    /// Serve `model` on every load.
    pub fn with_model(model: OntologyModel) -> Self {
        Self { model: Some(model) }
    }

    /// Fail every load as if the document were empty.
    pub fn unavailable() -> Self {
        Self { model: None }
    }
}

impl OntologySource for StubOntologySource {
    fn load(&self) -> Result<OntologyModel, OntologyError> {
        self.model.clone().ok_or_else(|| OntologyError::Empty {
            path: Utf8PathBuf::from("stub://ontology"),
        })
    }
}
