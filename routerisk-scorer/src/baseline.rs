//! Batch-wide pollution statistics shared by every route in a request.

use std::collections::BTreeMap;

use routerisk_core::{Pollutant, PollutantReading};

use crate::critic::CriticWeights;
use crate::stats::{mean, population_std};

/// Mean and population standard deviation of one pollutant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Moments {
    /// Arithmetic mean.
    pub mean: f64,
    /// Population standard deviation.
    pub std: f64,
}

/// Statistics computed once per batch before any route is scored.
///
/// Means and deviations use every present value of a pollutant across the
/// batch, independently per pollutant. Weights come from
/// [`CriticWeights::from_samples`], optionally boosted towards the caller's
/// focus pollutants.
#[derive(Debug, Clone, PartialEq)]
pub struct BaselineStatistics {
    moments: BTreeMap<Pollutant, Moments>,
    weights: CriticWeights,
    sample_count: usize,
}

impl BaselineStatistics {
    /// Build the baseline from every sample reading gathered for the batch.
    #[must_use]
    pub fn from_samples(samples: &[PollutantReading], focus: &[Pollutant]) -> Self {
        let valid: Vec<PollutantReading> = samples
            .iter()
            .filter(|s| !s.is_missing())
            .copied()
            .collect();
        let moments = Pollutant::ALL
            .into_iter()
            .filter_map(|p| {
                let values: Vec<f64> = valid.iter().filter_map(|s| s.get(p)).collect();
                let centre = mean(&values)?;
                Some((
                    p,
                    Moments {
                        mean: centre,
                        std: population_std(&values, centre),
                    },
                ))
            })
            .collect();
        Self {
            moments,
            weights: CriticWeights::from_samples(&valid).with_focus(focus),
            sample_count: valid.len(),
        }
    }

    /// Moments of `pollutant`, if it was observed anywhere in the batch.
    #[must_use]
    pub fn moments(&self, pollutant: Pollutant) -> Option<Moments> {
        self.moments.get(&pollutant).copied()
    }

    /// Pollutant weights.
    #[must_use]
    pub const fn weights(&self) -> &CriticWeights {
        &self.weights
    }

    /// Number of readings with at least one present value.
    #[must_use]
    pub const fn sample_count(&self) -> usize {
        self.sample_count
    }
}
