//! Core domain types for the route risk engine.
//!
//! The crate defines the values exchanged between the evaluation pipeline and
//! its collaborators: candidate [`Route`]s, the [`SampleCoordinate`]s drawn
//! from their encoded paths, per-coordinate [`PollutantReading`] and
//! [`WeatherReading`] values, and the [`OntologyModel`] used to attribute
//! pollution to human or natural sources.
//!
//! Collaborators are expressed as traits so adapters can live in other
//! crates: [`PollutionSource`] and [`WeatherSource`] fetch enrichment data,
//! [`OntologySource`] loads the relation graph, and [`Clock`] supplies the
//! time base for cache expiry.
//!
//! Constructors validate their input and return `Result` so invalid values
//! surface early rather than deep inside the scoring arithmetic.

mod clock;
pub mod enrichment;
mod evaluation;
mod ontology;
mod pollutant;
#[cfg(feature = "serde")]
mod request;
mod route;
mod sample;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use clock::{Clock, SystemClock};
pub use enrichment::{EnrichmentError, PollutionSource, WeatherSource};
pub use evaluation::{
    EvaluationResult, Indicators, OntologyClassification, SeverityLevel, SourceLabel,
};
pub use ontology::{OntologyError, OntologyModel, OntologySource, OntologyStatus, SourceKind};
pub use pollutant::{Pollutant, PollutantReading, WeatherReading};
#[cfg(feature = "serde")]
pub use request::{OntologySummary, RouteScore, ScoreRequest, ScoreResponse, round_to};
pub use route::{Route, RouteError};
pub use sample::{
    DEFAULT_SAMPLE_STRIDE, POLYLINE_PRECISION, SampleCoordinate, decode_path, sample_path,
};
