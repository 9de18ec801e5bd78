//! Pollution models: the CRITIC composite and rule-based severity bands.

use routerisk_core::{Pollutant, PollutantReading, SeverityLevel};

use crate::baseline::BaselineStatistics;

/// Floor applied to baseline deviations before computing z-scores.
pub const MIN_STD: f64 = 0.1;

/// Indicator reported when a route has no usable pollution data.
pub const NEUTRAL_POLLUTION: f64 = 0.5;

/// Weighted logistic exposure of `average` against the batch baseline.
///
/// Each pollutant present in both the reading and the baseline contributes
/// `logistic((value - mean) / max(std, MIN_STD))` scaled by its weight; the
/// result is normalised by the contributing weights. Returns `None` when no
/// weighted pollutant contributes.
#[must_use]
#[expect(clippy::float_arithmetic, reason = "z-scores and weighted averages")]
pub fn composite_exposure(average: &PollutantReading, baseline: &BaselineStatistics) -> Option<f64> {
    let (weighted, weight_sum) = baseline
        .weights()
        .iter()
        .filter_map(|(pollutant, weight)| {
            let value = average.get(pollutant)?;
            let moments = baseline.moments(pollutant)?;
            let z = (value - moments.mean) / moments.std.max(MIN_STD);
            Some((weight * logistic(z), weight))
        })
        .fold((0.0, 0.0), |(acc, total), (term, weight)| {
            (acc + term, total + weight)
        });
    (weight_sum > 0.0).then(|| (weighted / weight_sum).clamp(0.0, 1.0))
}

/// Pollution indicator: one minus the composite exposure, higher cleaner.
///
/// Falls back to [`NEUTRAL_POLLUTION`] when no exposure can be computed.
#[must_use]
#[expect(clippy::float_arithmetic, reason = "indicator inverts exposure")]
pub fn pollution_indicator(average: &PollutantReading, baseline: &BaselineStatistics) -> f64 {
    composite_exposure(average, baseline).map_or(NEUTRAL_POLLUTION, |exposure| 1.0 - exposure)
}

#[expect(clippy::float_arithmetic, reason = "logistic map")]
fn logistic(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// Fixed concentration cut points for one pollutant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeverityBand {
    /// Pollutant the band applies to.
    pub pollutant: Pollutant,
    /// Divisor converting provider units to band units.
    pub divisor: f64,
    /// Values strictly above this are tier 1.
    pub worst_above: f64,
    /// Values strictly above this are tier 2.
    pub poor_above: f64,
}

impl SeverityBand {
    /// Tier for `value`: 1 worst, 3 best.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "unit conversion")]
    pub const fn tier(&self, value: f64) -> u8 {
        let converted = value / self.divisor;
        if converted > self.worst_above {
            1
        } else if converted > self.poor_above {
            2
        } else {
            3
        }
    }
}

/// Severity bands in canonical pollutant order. CO is reported in µg/m³
/// and banded in mg/m³.
pub const SEVERITY_BANDS: [SeverityBand; Pollutant::COUNT] = [
    SeverityBand {
        pollutant: Pollutant::Pm25,
        divisor: 1.0,
        worst_above: 75.0,
        poor_above: 50.0,
    },
    SeverityBand {
        pollutant: Pollutant::Pm10,
        divisor: 1.0,
        worst_above: 180.0,
        poor_above: 120.0,
    },
    SeverityBand {
        pollutant: Pollutant::Co,
        divisor: 1000.0,
        worst_above: 10.0,
        poor_above: 6.0,
    },
    SeverityBand {
        pollutant: Pollutant::No2,
        divisor: 1.0,
        worst_above: 200.0,
        poor_above: 100.0,
    },
    SeverityBand {
        pollutant: Pollutant::O3,
        divisor: 1.0,
        worst_above: 180.0,
        poor_above: 100.0,
    },
    SeverityBand {
        pollutant: Pollutant::So2,
        divisor: 1.0,
        worst_above: 350.0,
        poor_above: 125.0,
    },
];

/// Rule-based severity of `average`: the worst tier across present
/// pollutants, mapped onto `[0, 1]` as `(level - 1) / 2`.
///
/// Returns `None` when no pollutant is present.
///
/// # Examples
/// ```
/// use routerisk_core::{Pollutant, PollutantReading};
/// use routerisk_scorer::rule_based_severity;
///
/// let reading = PollutantReading::missing().with(Pollutant::Pm25, 200.0);
/// let severity = rule_based_severity(&reading).expect("pm2.5 present");
/// assert_eq!(severity.level, 1);
/// assert_eq!(severity.normalised, 0.0);
/// ```
#[must_use]
#[expect(clippy::float_arithmetic, reason = "tier normalisation")]
pub fn rule_based_severity(average: &PollutantReading) -> Option<SeverityLevel> {
    let level = SEVERITY_BANDS
        .iter()
        .filter_map(|band| average.get(band.pollutant).map(|value| band.tier(value)))
        .min()?;
    Some(SeverityLevel {
        level,
        normalised: f64::from(level.saturating_sub(1)) / 2.0,
    })
}

#[cfg(test)]
#[expect(clippy::float_arithmetic, reason = "tests compare floating-point results")]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn baseline() -> BaselineStatistics {
        let samples = [
            PollutantReading::missing()
                .with(Pollutant::Pm25, 10.0)
                .with(Pollutant::No2, 20.0),
            PollutantReading::missing()
                .with(Pollutant::Pm25, 30.0)
                .with(Pollutant::No2, 60.0),
            PollutantReading::missing()
                .with(Pollutant::Pm25, 20.0)
                .with(Pollutant::No2, 25.0),
        ];
        BaselineStatistics::from_samples(&samples, &[])
    }

    #[rstest]
    fn reading_at_the_mean_is_neutral(baseline: BaselineStatistics) {
        let pm = baseline.moments(Pollutant::Pm25).expect("pm25").mean;
        let no2 = baseline.moments(Pollutant::No2).expect("no2").mean;
        let average = PollutantReading::missing()
            .with(Pollutant::Pm25, pm)
            .with(Pollutant::No2, no2);
        let exposure = composite_exposure(&average, &baseline).expect("exposure");
        assert!((exposure - 0.5).abs() < 1e-12);
    }

    #[rstest]
    fn dirtier_air_lowers_the_indicator(baseline: BaselineStatistics) {
        let clean = PollutantReading::missing()
            .with(Pollutant::Pm25, 5.0)
            .with(Pollutant::No2, 10.0);
        let dirty = PollutantReading::missing()
            .with(Pollutant::Pm25, 50.0)
            .with(Pollutant::No2, 90.0);
        assert!(pollution_indicator(&clean, &baseline) > pollution_indicator(&dirty, &baseline));
    }

    #[rstest]
    fn missing_reading_is_neutral(baseline: BaselineStatistics) {
        let indicator = pollution_indicator(&PollutantReading::missing(), &baseline);
        assert!((indicator - NEUTRAL_POLLUTION).abs() < f64::EPSILON);
    }

    #[rstest]
    fn constant_baseline_uses_deviation_floor() {
        let sample = PollutantReading::missing().with(Pollutant::O3, 40.0);
        let flat = BaselineStatistics::from_samples(&[sample, sample], &[]);
        let average = PollutantReading::missing().with(Pollutant::O3, 40.1);
        let exposure = composite_exposure(&average, &flat).expect("exposure");
        // z = 0.1 / 0.1 = 1
        assert!((exposure - logistic(1.0)).abs() < 1e-9);
    }

    #[rstest]
    #[case(Pollutant::Pm25, 80.0, 1)]
    #[case(Pollutant::Pm25, 75.0, 2)]
    #[case(Pollutant::Pm25, 50.0, 3)]
    #[case(Pollutant::Co, 10_500.0, 1)]
    #[case(Pollutant::Co, 7_000.0, 2)]
    #[case(Pollutant::Co, 900.0, 3)]
    #[case(Pollutant::So2, 200.0, 2)]
    fn bands_classify_concentrations(
        #[case] pollutant: Pollutant,
        #[case] value: f64,
        #[case] expected: u8,
    ) {
        let reading = PollutantReading::missing().with(pollutant, value);
        let severity = rule_based_severity(&reading).expect("pollutant present");
        assert_eq!(severity.level, expected);
    }

    #[rstest]
    fn worst_pollutant_dominates() {
        let reading = PollutantReading::missing()
            .with(Pollutant::Pm25, 10.0)
            .with(Pollutant::No2, 150.0);
        let severity = rule_based_severity(&reading).expect("present");
        assert_eq!(severity.level, 2);
        assert!((severity.normalised - 0.5).abs() < f64::EPSILON);
    }

    #[rstest]
    fn severity_is_absent_without_values() {
        assert_eq!(rule_based_severity(&PollutantReading::missing()), None);
    }

    #[rstest]
    fn bands_follow_canonical_order() {
        for (band, pollutant) in SEVERITY_BANDS.iter().zip(Pollutant::ALL) {
            assert_eq!(band.pollutant, pollutant);
        }
    }
}
