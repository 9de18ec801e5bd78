//! Adapters connecting the route risk engine to external data.
//!
//! Responsibilities:
//! - Fetch pollutant concentrations from an air-quality lookup service.
//! - Fetch relative humidity from a point forecast service.
//! - Load the pollutant/source ontology from a JSON triple document.
//!
//! Boundaries:
//! - Do not encode scoring rules (live in `routerisk-scorer`).
//! - Do not retry or cache; the evaluator decides how failures and repeated
//!   lookups are handled.
//!
//! Invariants:
//! - Credentials never appear in error messages or logs.
//! - No global mutable state.

pub mod air_quality;
mod http;
pub mod ontology;
pub mod weather;

pub use air_quality::{AirQualityConfig, HttpPollutionSource};
pub use http::ProviderBuildError;
pub use ontology::FileOntologySource;
pub use weather::{HttpWeatherSource, WeatherConfig};
