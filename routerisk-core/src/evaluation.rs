//! Per-route scoring outcomes.

/// Normalised per-route indicators, each in `[0, 1]` with higher safer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Indicators {
    /// Distance relative to the longest route in the batch.
    pub distance: f64,
    /// Duration relative to the slowest route in the batch.
    pub time: f64,
    /// Pollution safety derived from the composite exposure.
    pub pollution: f64,
    /// Humidity tier score; `0.5` when humidity is unknown.
    pub weather: f64,
}

/// Dominant origin of a route's pollution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceLabel {
    /// At least sixty percent human-attributed.
    HumanSources,
    /// At least sixty percent naturally attributed.
    NaturalSources,
    /// Neither origin dominates.
    Mixed,
    /// No concentration could be attributed.
    Unknown,
}

impl SourceLabel {
    /// Wire name of the label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HumanSources => "HumanSources",
            Self::NaturalSources => "NaturalSources",
            Self::Mixed => "Mixed",
            Self::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for SourceLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source attribution and the penalty it applies to a score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OntologyClassification {
    /// Dominant origin label.
    pub label: SourceLabel,
    /// Share of attributed concentration assigned to human sources.
    pub human_ratio: f64,
    /// Share of attributed concentration assigned to natural sources.
    pub natural_ratio: f64,
    /// Weighted hazard, `0.7 * human + 0.3 * natural`.
    pub hazard_index: f64,
    /// Multiplier in `[0.7, 1]` applied to the final score.
    pub penalty_factor: f64,
    /// Final score after the penalty.
    pub adjusted_score: f64,
}

/// Banded severity from the fixed threshold table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeverityLevel {
    /// Tier from `1` (worst) to `3` (best).
    pub level: u8,
    /// Tier mapped onto `[0, 1]`.
    pub normalised: f64,
}

/// Everything computed for one route.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationResult {
    /// Identifier echoed from the request.
    pub route_id: String,
    /// Component indicators.
    pub indicators: Indicators,
    /// Blended score before any ontology penalty.
    pub final_score: f64,
    /// Mean humidity over valid samples.
    pub average_humidity: Option<f64>,
    /// Coordinates kept after striding.
    pub points_sampled: usize,
    /// Sampled coordinates that yielded pollution or humidity data.
    pub points_used: usize,
    /// Whether any sample carried a non-zero pollutant value.
    pub pollution_present: bool,
    /// Whether any sample carried humidity.
    pub weather_present: bool,
    /// Threshold-table severity, when any pollutant was observed.
    pub rule_based: Option<SeverityLevel>,
    /// Source attribution, when the ontology stage ran.
    pub ontology: Option<OntologyClassification>,
}

impl EvaluationResult {
    /// Score reported to callers: the adjusted score when the ontology stage
    /// ran, otherwise the blended score.
    #[must_use]
    pub fn risk_score(&self) -> f64 {
        self.ontology
            .map_or(self.final_score, |o| o.adjusted_score)
    }

    /// Human-readable data availability note.
    #[must_use]
    pub const fn note(&self) -> &'static str {
        match (self.pollution_present, self.weather_present) {
            (true, true) => "ok",
            (false, true) => "pollution unavailable",
            (true, false) => "weather unavailable",
            (false, false) => "pollution and weather unavailable",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn result(pollution: bool, weather: bool) -> EvaluationResult {
        EvaluationResult {
            route_id: "r".into(),
            indicators: Indicators {
                distance: 0.5,
                time: 0.5,
                pollution: 0.5,
                weather: 0.5,
            },
            final_score: 0.5,
            average_humidity: None,
            points_sampled: 0,
            points_used: 0,
            pollution_present: pollution,
            weather_present: weather,
            rule_based: None,
            ontology: None,
        }
    }

    #[rstest]
    #[case(true, true, "ok")]
    #[case(false, true, "pollution unavailable")]
    #[case(true, false, "weather unavailable")]
    #[case(false, false, "pollution and weather unavailable")]
    fn note_reflects_availability(#[case] p: bool, #[case] w: bool, #[case] expected: &str) {
        assert_eq!(result(p, w).note(), expected);
    }

    #[rstest]
    fn risk_score_prefers_adjusted_score() {
        let mut res = result(true, true);
        assert!((res.risk_score() - 0.5).abs() < f64::EPSILON);
        res.ontology = Some(OntologyClassification {
            label: SourceLabel::HumanSources,
            human_ratio: 1.0,
            natural_ratio: 0.0,
            hazard_index: 0.7,
            penalty_factor: 0.79,
            adjusted_score: 0.395,
        });
        assert!((res.risk_score() - 0.395).abs() < f64::EPSILON);
    }
}
