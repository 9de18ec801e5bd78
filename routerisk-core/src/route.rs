//! Candidate routes submitted for risk scoring.
//!
//! A route carries its precomputed distance and duration together with an
//! optional encoded path. Routes are immutable once received; the evaluator
//! validates them before scoring.

use thiserror::Error;

use crate::sample::{SampleCoordinate, decode_path, sample_path};

/// A candidate travel route.
///
/// # Examples
///
/// ```
/// use routerisk_core::Route;
///
/// # fn main() -> Result<(), routerisk_core::RouteError> {
/// let route = Route::new("a", Some("_p~iF~ps|U_ulLnnqC_mqNvxq`@".into()), 1_000.0, 120.0)?;
/// assert_eq!(route.samples(1).len(), 3);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct Route {
    /// Caller-supplied identifier echoed in the response.
    pub id: String,
    /// Encoded polyline describing the path, if one was supplied.
    #[cfg_attr(feature = "serde", serde(default))]
    pub encoded_polyline: Option<String>,
    /// Route length in meters.
    pub distance_meters: f64,
    /// Expected travel time in seconds.
    pub duration_seconds: f64,
}

/// Errors returned by [`Route::new`] and [`Route::validate`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouteError {
    /// The identifier was empty or whitespace.
    #[error("route id must not be empty")]
    EmptyId,
    /// The distance was negative or not finite.
    #[error("route {id} has invalid distance {value}")]
    InvalidDistance {
        /// Identifier of the offending route.
        id: String,
        /// Rejected distance in meters.
        value: f64,
    },
    /// The duration was negative or not finite.
    #[error("route {id} has invalid duration {value}")]
    InvalidDuration {
        /// Identifier of the offending route.
        id: String,
        /// Rejected duration in seconds.
        value: f64,
    },
}

impl Route {
    /// Validates and constructs a [`Route`].
    ///
    /// # Errors
    /// Returns [`RouteError`] when the id is blank or the distance or
    /// duration is negative or not finite.
    pub fn new(
        id: impl Into<String>,
        encoded_polyline: Option<String>,
        distance_meters: f64,
        duration_seconds: f64,
    ) -> Result<Self, RouteError> {
        let route = Self {
            id: id.into(),
            encoded_polyline,
            distance_meters,
            duration_seconds,
        };
        route.validate()?;
        Ok(route)
    }

    /// Check the invariants enforced by [`Route::new`].
    ///
    /// Routes decoded from a request bypass the constructor, so the
    /// evaluator calls this before scoring.
    ///
    /// # Errors
    /// See [`Route::new`].
    pub fn validate(&self) -> Result<(), RouteError> {
        if self.id.trim().is_empty() {
            return Err(RouteError::EmptyId);
        }
        if !is_non_negative(self.distance_meters) {
            return Err(RouteError::InvalidDistance {
                id: self.id.clone(),
                value: self.distance_meters,
            });
        }
        if !is_non_negative(self.duration_seconds) {
            return Err(RouteError::InvalidDuration {
                id: self.id.clone(),
                value: self.duration_seconds,
            });
        }
        Ok(())
    }

    /// Decode the route's path and keep every `stride`-th coordinate.
    ///
    /// Returns an empty vector when the path is absent or undecodable.
    #[must_use]
    pub fn samples(&self, stride: usize) -> Vec<SampleCoordinate> {
        let decoded = self
            .encoded_polyline
            .as_deref()
            .map(decode_path)
            .unwrap_or_default();
        sample_path(&decoded, stride)
    }
}

fn is_non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}
