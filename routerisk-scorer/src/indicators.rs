//! Batch-relative distance/time indicators and the humidity indicator.

use crate::stats::{count_f64, mean};

/// Indicator used when a comparison is undefined.
pub const NEUTRAL_INDICATOR: f64 = 0.5;

/// Humidity above this percentage is tier 3.
pub const HUMID_ABOVE: f64 = 75.0;

/// Humidity below this percentage is tier 1.
pub const DRY_BELOW: f64 = 40.0;

/// Range of one route attribute across a batch.
///
/// # Examples
/// ```
/// use routerisk_scorer::BatchRange;
///
/// let range = BatchRange::from_values([1_000.0, 2_000.0]);
/// assert_eq!(range.indicator(1_000.0), 0.5);
/// assert_eq!(range.indicator(2_000.0), 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchRange {
    min: f64,
    max: f64,
}

impl BatchRange {
    /// Range over the finite values of `values`.
    #[must_use]
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(Self { min: f64::INFINITY, max: f64::NEG_INFINITY }, |range, v| Self {
                min: range.min.min(v),
                max: range.max.max(v),
            })
    }

    /// Largest value in the batch, if any.
    #[must_use]
    pub fn max(&self) -> Option<f64> {
        self.max.is_finite().then_some(self.max)
    }

    /// `1 - value / max`, clamped to `[0, 1]`.
    ///
    /// Neutral when the value or the maximum is zero or undefined, and when
    /// every route in the batch shares the same value.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "relative indicator")]
    pub fn indicator(&self, value: f64) -> f64 {
        let Some(max) = self.max() else {
            return NEUTRAL_INDICATOR;
        };
        if !value.is_finite() || value <= 0.0 || max <= 0.0 || self.min >= max {
            return NEUTRAL_INDICATOR;
        }
        (1.0 - value / max).clamp(0.0, 1.0)
    }
}

/// Comfort tier of a humidity reading: 3 humid, 1 dry, 2 otherwise.
#[must_use]
pub const fn humidity_tier(percent: f64) -> u8 {
    if percent > HUMID_ABOVE {
        3
    } else if percent < DRY_BELOW {
        1
    } else {
        2
    }
}

/// Humidity summary of one route.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherSummary {
    /// `(mean tier - 1) / 2`, or neutral without samples.
    pub indicator: f64,
    /// Mean humidity over valid samples.
    pub average_humidity: Option<f64>,
}

/// Summarise the valid humidity readings of a route.
#[must_use]
#[expect(clippy::float_arithmetic, reason = "tier averaging")]
pub fn weather_summary(humidity: &[f64]) -> WeatherSummary {
    let valid: Vec<f64> = humidity.iter().copied().filter(|h| h.is_finite()).collect();
    let tier_total: u32 = valid.iter().map(|&h| u32::from(humidity_tier(h))).sum();
    let indicator = if valid.is_empty() {
        NEUTRAL_INDICATOR
    } else {
        let mean_tier = f64::from(tier_total) / count_f64(valid.len());
        ((mean_tier - 1.0) / 2.0).clamp(0.0, 1.0)
    };
    WeatherSummary {
        indicator,
        average_humidity: mean(&valid),
    }
}

#[cfg(test)]
#[expect(clippy::float_arithmetic, reason = "tests compare floating-point results")]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn equal_values_are_neutral() {
        let range = BatchRange::from_values([500.0, 500.0, 500.0]);
        assert!((range.indicator(500.0) - NEUTRAL_INDICATOR).abs() < f64::EPSILON);
    }

    #[rstest]
    #[case(0.0)]
    #[case(f64::NAN)]
    fn undefined_values_are_neutral(#[case] value: f64) {
        let range = BatchRange::from_values([1_000.0, 2_000.0]);
        assert!((range.indicator(value) - NEUTRAL_INDICATOR).abs() < f64::EPSILON);
    }

    #[rstest]
    fn empty_batch_is_neutral() {
        let range = BatchRange::from_values(std::iter::empty());
        assert_eq!(range.max(), None);
        assert!((range.indicator(10.0) - NEUTRAL_INDICATOR).abs() < f64::EPSILON);
    }

    #[rstest]
    fn longest_route_scores_zero() {
        let range = BatchRange::from_values([1_000.0, 1_500.0, 2_000.0]);
        assert!(range.indicator(2_000.0).abs() < f64::EPSILON);
        assert!((range.indicator(1_500.0) - 0.25).abs() < 1e-12);
    }

    #[rstest]
    #[case(80.0, 3)]
    #[case(75.0, 2)]
    #[case(40.0, 2)]
    #[case(39.9, 1)]
    fn humidity_tiers(#[case] percent: f64, #[case] expected: u8) {
        assert_eq!(humidity_tier(percent), expected);
    }

    #[rstest]
    fn weather_summary_averages_tiers() {
        let summary = weather_summary(&[80.0, 30.0, 60.0, f64::NAN]);
        // tiers 3, 1, 2 -> mean 2 -> 0.5
        assert!((summary.indicator - 0.5).abs() < 1e-12);
        let avg = summary.average_humidity.expect("humidity present");
        assert!((avg - 56.666_666_666_666_664).abs() < 1e-9);
    }

    #[rstest]
    fn weather_summary_without_samples_is_neutral() {
        let summary = weather_summary(&[]);
        assert!((summary.indicator - NEUTRAL_INDICATOR).abs() < f64::EPSILON);
        assert_eq!(summary.average_humidity, None);
    }
}
