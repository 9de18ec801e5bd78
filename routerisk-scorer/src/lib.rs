//! Scoring models for candidate routes.
//!
//! The crate is pure computation; it never performs I/O. A batch is scored in
//! two steps:
//! - **Baseline**: every pollution sample gathered across the batch feeds
//!   [`BaselineStatistics`], holding per-pollutant moments and objective
//!   [`CriticWeights`].
//! - **Per route**: the route's average reading is compared against the
//!   baseline ([`pollution_indicator`], [`rule_based_severity`]), distance and
//!   duration are compared against the batch ([`BatchRange`]), humidity is
//!   tiered ([`weather_summary`]) and the indicators are combined by
//!   [`blend`]. When an ontology is available, [`classify`] attributes the
//!   pollution to human or natural sources and penalises the score.
//!
//! # Examples
//!
//! ```
//! use routerisk_core::Indicators;
//! use routerisk_scorer::{BatchRange, DataAvailability, blend};
//!
//! let distances = BatchRange::from_values([1_000.0, 2_000.0]);
//! let durations = BatchRange::from_values([120.0, 240.0]);
//! let indicators = Indicators {
//!     distance: distances.indicator(1_000.0),
//!     time: durations.indicator(120.0),
//!     pollution: 0.5,
//!     weather: 0.5,
//! };
//! let score = blend(&indicators, DataAvailability::default());
//! assert!((score - 0.5).abs() < 1e-12);
//! ```

#![forbid(unsafe_code)]

mod baseline;
mod blend;
mod critic;
mod indicators;
mod ontology;
mod pollution;
mod stats;

pub use baseline::{BaselineStatistics, Moments};
pub use blend::{BlendWeights, DataAvailability, blend};
pub use critic::{CriticWeights, FOCUS_BOOST, RESCALE_EPSILON};
pub use indicators::{
    BatchRange, DRY_BELOW, HUMID_ABOVE, NEUTRAL_INDICATOR, WeatherSummary, humidity_tier,
    weather_summary,
};
pub use ontology::{SourceMix, classify, hazard_index, penalty_factor};
pub use pollution::{
    MIN_STD, NEUTRAL_POLLUTION, SEVERITY_BANDS, SeverityBand, composite_exposure,
    pollution_indicator, rule_based_severity,
};
