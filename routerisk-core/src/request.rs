//! Batch scoring request and response bodies.
//!
//! Field names follow the camelCase wire format consumed by trip-planning
//! front-ends.

use serde::{Deserialize, Serialize};

use crate::{EvaluationResult, Pollutant, Route};

const fn default_stride() -> i64 {
    20
}

/// A batch of candidate routes to score.
///
/// # Examples
/// ```
/// use routerisk_core::ScoreRequest;
///
/// let request: ScoreRequest = serde_json::from_str(
///     r#"{"routes":[{"id":"a","distanceMeters":1000,"durationSeconds":120}]}"#,
/// ).unwrap();
/// assert_eq!(request.stride(), 20);
/// assert!(!request.use_ontology);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRequest {
    /// Routes to score.
    pub routes: Vec<Route>,
    /// Decimation factor for decoded paths. Values below one disable
    /// decimation.
    #[serde(default = "default_stride")]
    pub sample_stride: i64,
    /// Pollutant codes the caller wants weighted more heavily.
    #[serde(default)]
    pub focus_pollutants: Vec<String>,
    /// Whether to apply the ontology penalty.
    #[serde(default)]
    pub use_ontology: bool,
}

impl ScoreRequest {
    /// Request with default stride and no preferences.
    #[must_use]
    pub fn new(routes: Vec<Route>) -> Self {
        Self {
            routes,
            sample_stride: default_stride(),
            focus_pollutants: Vec::new(),
            use_ontology: false,
        }
    }

    /// Effective stride, at least one.
    #[must_use]
    pub fn stride(&self) -> usize {
        usize::try_from(self.sample_stride).map_or(1, |stride| stride.max(1))
    }

    /// Recognised focus pollutants; unknown codes are dropped.
    #[must_use]
    pub fn focus(&self) -> Vec<Pollutant> {
        let mut focus: Vec<Pollutant> = self
            .focus_pollutants
            .iter()
            .filter_map(|code| code.parse().ok())
            .collect();
        focus.sort();
        focus.dedup();
        focus
    }
}

/// Source attribution as reported to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OntologySummary {
    /// Dominant origin, e.g. `HumanSources`.
    pub label: String,
    /// Human-attributed share.
    pub human_ratio: f64,
    /// Naturally attributed share.
    pub natural_ratio: f64,
    /// Weighted hazard index.
    pub hazard_index: f64,
    /// Multiplier applied to the base score.
    pub penalty_factor: f64,
}

/// One scored route in a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteScore {
    /// Route identifier.
    pub id: String,
    /// Reported risk score.
    pub risk_score: f64,
    /// Blended score before the ontology penalty.
    pub base_score: f64,
    /// Distance indicator.
    pub di: f64,
    /// Time indicator.
    pub dt: f64,
    /// Pollution indicator.
    pub dp: f64,
    /// Weather indicator.
    pub dw: f64,
    /// Mean relative humidity, `null` when unknown.
    pub avg_humidity: Option<f64>,
    /// Coordinates sampled from the path.
    pub points_sampled: usize,
    /// Coordinates that yielded enrichment data.
    pub points_used: usize,
    /// Data availability note.
    pub note: String,
    /// Threshold-table tier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_based_level: Option<u8>,
    /// Threshold-table tier mapped onto `[0, 1]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_based_norm: Option<f64>,
    /// Source attribution when the ontology stage ran.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ontology: Option<OntologySummary>,
}

impl From<&EvaluationResult> for RouteScore {
    fn from(result: &EvaluationResult) -> Self {
        let indicators = result.indicators;
        Self {
            id: result.route_id.clone(),
            risk_score: round_to(result.risk_score(), 4),
            base_score: round_to(result.final_score, 4),
            di: round_to(indicators.distance, 4),
            dt: round_to(indicators.time, 4),
            dp: round_to(indicators.pollution, 4),
            dw: round_to(indicators.weather, 4),
            avg_humidity: result.average_humidity.map(|h| round_to(h, 2)),
            points_sampled: result.points_sampled,
            points_used: result.points_used,
            note: result.note().to_owned(),
            rule_based_level: result.rule_based.map(|s| s.level),
            rule_based_norm: result.rule_based.map(|s| round_to(s.normalised, 4)),
            ontology: result.ontology.map(|o| OntologySummary {
                label: o.label.as_str().to_owned(),
                human_ratio: round_to(o.human_ratio, 4),
                natural_ratio: round_to(o.natural_ratio, 4),
                hazard_index: round_to(o.hazard_index, 4),
                penalty_factor: round_to(o.penalty_factor, 4),
            }),
        }
    }
}

/// Scores for every route that could be evaluated, in request order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreResponse {
    /// Per-route scores.
    pub scores: Vec<RouteScore>,
}

impl FromIterator<RouteScore> for ScoreResponse {
    fn from_iter<T: IntoIterator<Item = RouteScore>>(iter: T) -> Self {
        Self {
            scores: iter.into_iter().collect(),
        }
    }
}

/// Round `value` half away from zero to `decimals` places.
///
/// # Examples
/// ```
/// use routerisk_core::round_to;
///
/// assert_eq!(round_to(0.123_456, 4), 0.1235);
/// assert_eq!(round_to(61.234, 2), 61.23);
/// ```
#[must_use]
#[expect(clippy::float_arithmetic, reason = "rounding scales by a power of ten")]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10_f64.powi(decimals);
    (value * scale).round() / scale
}
