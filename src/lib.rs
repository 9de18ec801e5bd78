//! Facade crate for the route risk engine.
//!
//! This crate re-exports the core domain types and scoring primitives, and
//! exposes the batch evaluator and HTTP providers behind feature flags.

#![forbid(unsafe_code)]

pub use routerisk_core::{
    Clock, DEFAULT_SAMPLE_STRIDE, EnrichmentError, EvaluationResult, Indicators,
    OntologyClassification, OntologyError, OntologyModel, OntologySource, OntologyStatus,
    Pollutant, PollutantReading, PollutionSource, Route, RouteError, SampleCoordinate,
    SeverityLevel, SourceKind, SourceLabel, SystemClock, WeatherReading, WeatherSource,
    decode_path, sample_path,
};

#[cfg(feature = "serde")]
pub use routerisk_core::{OntologySummary, RouteScore, ScoreRequest, ScoreResponse, round_to};

pub use routerisk_scorer::{
    BaselineStatistics, BatchRange, BlendWeights, CriticWeights, DataAvailability,
    SeverityBand, blend, classify, pollution_indicator, rule_based_severity, weather_summary,
};

#[cfg(feature = "evaluator")]
pub use routerisk_evaluator::{
    BatchError, EnrichmentCache, EnrichmentFetcher, EvaluationError, EvaluatorConfig,
    RouteEvaluator,
};

#[cfg(feature = "http")]
pub use routerisk_data::{
    AirQualityConfig, FileOntologySource, HttpPollutionSource, HttpWeatherSource,
    ProviderBuildError, WeatherConfig,
};
