//! Objective pollutant weighting with the CRITIC method.
//!
//! CRITIC derives a criterion's importance from two properties of the
//! observed population: its contrast (standard deviation after rescaling)
//! and its conflict with the other criteria (one minus correlation, summed).
//! A pollutant that varies a lot and moves independently of the others
//! carries more information and therefore more weight.

use std::collections::BTreeMap;

use routerisk_core::{Pollutant, PollutantReading};

use crate::stats::{count_f64, mean, pearson, population_std};

/// Guard added to the rescaling denominator for constant columns.
pub const RESCALE_EPSILON: f64 = 1e-12;

/// Multiplier applied to focus pollutants before renormalising.
pub const FOCUS_BOOST: f64 = 100.0;

/// Normalised per-pollutant weights.
///
/// Weights are non-negative and sum to one over the pollutants they cover.
///
/// # Examples
/// ```
/// use routerisk_core::{Pollutant, PollutantReading};
/// use routerisk_scorer::CriticWeights;
///
/// let samples = [
///     PollutantReading::missing().with(Pollutant::Pm25, 10.0).with(Pollutant::No2, 40.0),
///     PollutantReading::missing().with(Pollutant::Pm25, 30.0).with(Pollutant::No2, 20.0),
///     PollutantReading::missing().with(Pollutant::Pm25, 20.0).with(Pollutant::No2, 45.0),
/// ];
/// let weights = CriticWeights::from_samples(&samples);
/// assert!((weights.total() - 1.0).abs() < 1e-9);
/// assert_eq!(weights.get(Pollutant::So2), None);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CriticWeights {
    weights: BTreeMap<Pollutant, f64>,
}

impl CriticWeights {
    /// Equal weights over `pollutants`.
    ///
    /// An empty set falls back to all six pollutants.
    #[must_use]
    pub fn equal<I>(pollutants: I) -> Self
    where
        I: IntoIterator<Item = Pollutant>,
    {
        let mut keys: Vec<Pollutant> = pollutants.into_iter().collect();
        if keys.is_empty() {
            keys = Pollutant::ALL.to_vec();
        }
        let share = equal_share(keys.len());
        Self {
            weights: keys.into_iter().map(|p| (p, share)).collect(),
        }
    }

    /// Derive weights from a population of readings.
    ///
    /// Rows are the readings with at least one present value. Columns are the
    /// pollutants present in every such row, so a code reported by only a few
    /// samples never discards the rest of the population. Degenerate
    /// populations (no shared column, no contrast) fall back to equal weights.
    #[must_use]
    pub fn from_samples(samples: &[PollutantReading]) -> Self {
        let rows: Vec<&PollutantReading> = samples.iter().filter(|s| !s.is_missing()).collect();
        let columns = shared_columns(&rows);
        if columns.is_empty() {
            log::debug!("no pollutant is shared by every sample; using equal weights");
            return Self::equal(observed(&rows));
        }
        let shared: Vec<Pollutant> = columns.iter().map(|(p, _)| *p).collect();

        let rescaled: Vec<(Pollutant, Vec<f64>)> = columns
            .into_iter()
            .map(|(p, values)| (p, rescale_inverted(&values)))
            .collect();
        let information: Vec<(Pollutant, f64)> = rescaled
            .iter()
            .map(|(p, column)| (*p, information_content(column, &rescaled)))
            .collect();

        Self::normalised(information).unwrap_or_else(|| {
            log::debug!("pollutant population has no contrast; using equal weights");
            Self::equal(shared)
        })
    }

    /// Boost the named pollutants by [`FOCUS_BOOST`] and renormalise.
    ///
    /// Pollutants without a weight are ignored.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "boosting scales weights")]
    pub fn with_focus(self, focus: &[Pollutant]) -> Self {
        if !focus.iter().any(|p| self.weights.contains_key(p)) {
            return self;
        }
        let boosted = self.weights.iter().map(|(&p, &w)| {
            let factor = if focus.contains(&p) { FOCUS_BOOST } else { 1.0 };
            (p, w * factor)
        });
        Self::normalised(boosted.collect()).unwrap_or(self)
    }

    /// Weight of `pollutant`, if covered.
    #[must_use]
    pub fn get(&self, pollutant: Pollutant) -> Option<f64> {
        self.weights.get(&pollutant).copied()
    }

    /// Iterate over `(pollutant, weight)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Pollutant, f64)> + '_ {
        self.weights.iter().map(|(&p, &w)| (p, w))
    }

    /// Sum of all weights; one up to rounding.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.weights.values().sum()
    }

    #[expect(clippy::float_arithmetic, reason = "normalisation divides by the sum")]
    fn normalised(raw: Vec<(Pollutant, f64)>) -> Option<Self> {
        let sum: f64 = raw.iter().map(|(_, w)| w).sum();
        if !sum.is_finite() || sum <= 0.0 {
            return None;
        }
        Some(Self {
            weights: raw.into_iter().map(|(p, w)| (p, w / sum)).collect(),
        })
    }
}

#[expect(clippy::float_arithmetic, reason = "equal shares divide one by a count")]
fn equal_share(count: usize) -> f64 {
    1.0 / count_f64(count.max(1))
}

/// Pollutants reported by at least one row.
fn observed(rows: &[&PollutantReading]) -> Vec<Pollutant> {
    Pollutant::ALL
        .into_iter()
        .filter(|&p| rows.iter().any(|s| s.get(p).is_some()))
        .collect()
}

/// Columns for the pollutants present in every row.
///
/// Empty when there are no rows.
fn shared_columns(rows: &[&PollutantReading]) -> Vec<(Pollutant, Vec<f64>)> {
    if rows.is_empty() {
        return Vec::new();
    }
    Pollutant::ALL
        .into_iter()
        .filter_map(|p| {
            let values: Option<Vec<f64>> = rows.iter().map(|s| s.get(p)).collect();
            values.map(|column| (p, column))
        })
        .collect()
}

/// Rescale so the column maximum maps to 0 and the minimum to 1.
#[expect(clippy::float_arithmetic, reason = "min-max rescaling")]
fn rescale_inverted(values: &[f64]) -> Vec<f64> {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let span = max - min + RESCALE_EPSILON;
    values.iter().map(|v| (max - v) / span).collect()
}

/// Contrast times conflict for one rescaled column.
///
/// An undefined correlation (a constant column) counts as zero.
#[expect(clippy::float_arithmetic, reason = "CRITIC combines spread and conflict")]
fn information_content(column: &[f64], all: &[(Pollutant, Vec<f64>)]) -> f64 {
    let centre = mean(column).unwrap_or_default();
    let contrast = population_std(column, centre);
    let conflict: f64 = all
        .iter()
        .map(|(_, other)| 1.0 - pearson(column, other).unwrap_or(0.0))
        .sum();
    contrast * conflict
}
