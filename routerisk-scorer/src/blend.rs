//! Availability-driven blending of the four route indicators.

use routerisk_core::Indicators;

/// Which external data a route actually received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DataAvailability {
    /// At least one sample carried a non-zero pollutant value.
    pub pollution: bool,
    /// At least one sample carried humidity.
    pub weather: bool,
}

impl DataAvailability {
    /// Availability from the two presence flags.
    #[must_use]
    pub const fn new(pollution: bool, weather: bool) -> Self {
        Self { pollution, weather }
    }
}

/// Linear blend coefficients for one availability case.
///
/// Every row sums to one and the distance/time pair carries at least half.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendWeights {
    /// Coefficient of the distance indicator.
    pub distance: f64,
    /// Coefficient of the time indicator.
    pub time: f64,
    /// Coefficient of the pollution indicator.
    pub pollution: f64,
    /// Coefficient of the weather indicator.
    pub weather: f64,
}

const TRAVEL_ONLY: BlendWeights = BlendWeights {
    distance: 0.5,
    time: 0.5,
    pollution: 0.0,
    weather: 0.0,
};

const WITH_WEATHER: BlendWeights = BlendWeights {
    distance: 0.45,
    time: 0.45,
    pollution: 0.0,
    weather: 0.10,
};

const WITH_POLLUTION: BlendWeights = BlendWeights {
    distance: 0.30,
    time: 0.30,
    pollution: 0.40,
    weather: 0.0,
};

const WITH_BOTH: BlendWeights = BlendWeights {
    distance: 0.30,
    time: 0.30,
    pollution: 0.30,
    weather: 0.10,
};

impl BlendWeights {
    /// Coefficients for the given availability.
    ///
    /// # Examples
    /// ```
    /// use routerisk_scorer::{BlendWeights, DataAvailability};
    ///
    /// let weights = BlendWeights::for_availability(DataAvailability::new(true, false));
    /// assert_eq!(weights.pollution, 0.40);
    /// assert_eq!(weights.weather, 0.0);
    /// ```
    #[must_use]
    pub const fn for_availability(availability: DataAvailability) -> Self {
        match (availability.pollution, availability.weather) {
            (false, false) => TRAVEL_ONLY,
            (false, true) => WITH_WEATHER,
            (true, false) => WITH_POLLUTION,
            (true, true) => WITH_BOTH,
        }
    }

    /// Weighted sum of `indicators`, clamped to `[0, 1]`.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "linear blend")]
    pub fn apply(&self, indicators: &Indicators) -> f64 {
        let score = self.distance * indicators.distance
            + self.time * indicators.time
            + self.pollution * indicators.pollution
            + self.weather * indicators.weather;
        score.clamp(0.0, 1.0)
    }
}

/// Blend `indicators` with the coefficients for `availability`.
#[must_use]
pub fn blend(indicators: &Indicators, availability: DataAvailability) -> f64 {
    BlendWeights::for_availability(availability).apply(indicators)
}
