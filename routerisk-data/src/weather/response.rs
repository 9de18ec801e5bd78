//! Wire types for the point forecast API.
//!
//! Two response shapes are in circulation: items carrying a nested `data`
//! object with an `rh` field, and flat items with `relativeHumidity`. Both
//! are accepted; the nested form wins when both are present.

use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct ForecastResponse {
    #[serde(default)]
    pub weather_forecasts: Vec<PointForecast>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct PointForecast {
    #[serde(default)]
    pub weather_forecast_items: Vec<ForecastItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ForecastItem {
    pub data: Option<ForecastData>,
    pub relative_humidity: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ForecastData {
    pub rh: Option<f64>,
}

impl ForecastResponse {
    /// Humidity of the first item of the first forecast.
    pub(crate) fn humidity(&self) -> Option<f64> {
        let item = self.weather_forecasts.first()?.weather_forecast_items.first()?;
        item.data
            .as_ref()
            .and_then(|data| data.rh)
            .or(item.relative_humidity)
            .filter(|h| h.is_finite())
    }
}
