//! Fetch pollution and weather readings for sample coordinates.
//!
//! The [`PollutionSource`] and [`WeatherSource`] traits abstract the
//! third-party providers consulted while enriching a route. Implementations
//! report failures through [`EnrichmentError`]; callers decide whether a
//! failure is absorbed as missing data.

mod error;
mod provider;

pub use error::EnrichmentError;
pub use provider::{PollutionSource, WeatherSource};
