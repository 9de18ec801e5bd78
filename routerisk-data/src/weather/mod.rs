//! Relative humidity from a point forecast service.
//!
//! [`HttpWeatherSource`] implements [`routerisk_core::WeatherSource`] by
//! issuing a bearer-authenticated GET with `lat`/`lon` query parameters and
//! reading the humidity of the first forecast item.

mod provider;
mod response;

pub use provider::{DEFAULT_FORECAST_URL, HttpWeatherSource, WeatherConfig};
