//! Source attribution of a route's pollution and the hazard penalty.
//!
//! Each present concentration is split between the human and natural
//! buckets in proportion to how many of the pollutant's tagged sources fall
//! in each. Pollutants without tagged sources contribute to neither bucket.

use routerisk_core::{
    OntologyClassification, OntologyModel, PollutantReading, SourceKind, SourceLabel,
};

/// Ratio a bucket must reach to dominate the label.
pub const DOMINANT_RATIO: f64 = 0.6;

/// Ratio the other bucket must stay below for a dominant label.
pub const MINOR_RATIO: f64 = 0.4;

/// Hazard weight of human-attributed pollution.
pub const HUMAN_HAZARD: f64 = 0.7;

/// Hazard weight of naturally attributed pollution.
pub const NATURAL_HAZARD: f64 = 0.3;

/// Fraction of the score removed at a hazard index of one.
pub const MAX_PENALTY: f64 = 0.3;

/// Concentration attributed to each bucket.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SourceMix {
    /// Concentration attributed to human sources.
    pub human: f64,
    /// Concentration attributed to natural sources.
    pub natural: f64,
}

impl SourceMix {
    /// Attribute `average` using the relations in `model`.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "proportional attribution")]
    pub fn attribute(average: &PollutantReading, model: &OntologyModel) -> Self {
        average
            .present()
            .filter(|&(_, value)| value > 0.0 && value.is_finite())
            .fold(Self::default(), |mix, (pollutant, value)| {
                let (human, natural) = model.source_kinds(pollutant).fold(
                    (0_u32, 0_u32),
                    |(h, n), kind| match kind {
                        SourceKind::Human => (h.saturating_add(1), n),
                        SourceKind::Natural => (h, n.saturating_add(1)),
                    },
                );
                let tagged = f64::from(human) + f64::from(natural);
                if tagged <= 0.0 {
                    return mix;
                }
                Self {
                    human: mix.human + value * f64::from(human) / tagged,
                    natural: mix.natural + value * f64::from(natural) / tagged,
                }
            })
    }

    /// Total attributed concentration.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "bucket sum")]
    pub const fn total(&self) -> f64 {
        self.human + self.natural
    }

    /// `(human, natural)` shares of the total, or `None` when nothing was
    /// attributed.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "ratio of buckets")]
    pub fn ratios(&self) -> Option<(f64, f64)> {
        let total = self.total();
        (total > 0.0).then(|| (self.human / total, self.natural / total))
    }

    /// Dominant origin of the mix.
    #[must_use]
    pub fn label(&self) -> SourceLabel {
        match self.ratios() {
            None => SourceLabel::Unknown,
            Some((h, n)) if h >= DOMINANT_RATIO && n < MINOR_RATIO => SourceLabel::HumanSources,
            Some((h, n)) if n >= DOMINANT_RATIO && h < MINOR_RATIO => SourceLabel::NaturalSources,
            Some(_) => SourceLabel::Mixed,
        }
    }
}

/// Weighted hazard of a ratio pair, in `[0, 1]` when the ratios sum to one.
#[must_use]
#[expect(clippy::float_arithmetic, reason = "weighted hazard")]
pub const fn hazard_index(human_ratio: f64, natural_ratio: f64) -> f64 {
    HUMAN_HAZARD * human_ratio + NATURAL_HAZARD * natural_ratio
}

/// Multiplier applied to the final score; never above one.
#[must_use]
#[expect(clippy::float_arithmetic, reason = "linear penalty")]
pub fn penalty_factor(hazard: f64) -> f64 {
    (1.0 - MAX_PENALTY * hazard).clamp(0.0, 1.0)
}

/// Classify a route's average reading and penalise `final_score`.
///
/// # Examples
/// ```
/// use routerisk_core::{OntologyModel, Pollutant, PollutantReading, SourceKind, SourceLabel};
/// use routerisk_scorer::classify;
///
/// let model = OntologyModel::default()
///     .with_source(Pollutant::No2, "Traffic")
///     .with_source_kind("Traffic", SourceKind::Human);
/// let average = PollutantReading::missing().with(Pollutant::No2, 40.0);
/// let result = classify(&average, &model, 0.8);
/// assert_eq!(result.label, SourceLabel::HumanSources);
/// assert!(result.adjusted_score < 0.8);
/// ```
#[must_use]
#[expect(clippy::float_arithmetic, reason = "score adjustment")]
pub fn classify(
    average: &PollutantReading,
    model: &OntologyModel,
    final_score: f64,
) -> OntologyClassification {
    let mix = SourceMix::attribute(average, model);
    let (human_ratio, natural_ratio) = mix.ratios().unwrap_or((0.0, 0.0));
    let hazard = hazard_index(human_ratio, natural_ratio);
    let penalty = penalty_factor(hazard);
    OntologyClassification {
        label: mix.label(),
        human_ratio,
        natural_ratio,
        hazard_index: hazard,
        penalty_factor: penalty,
        adjusted_score: (final_score * penalty).clamp(0.0, final_score.max(0.0)),
    }
}
