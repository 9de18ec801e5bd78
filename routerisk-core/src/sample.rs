//! Reduce decoded paths to evenly strided sample coordinates.
//!
//! Paths arrive as encoded polylines. Decoding uses the standard polyline
//! codec with five decimal places of precision; any decoding failure yields
//! an empty path so the caller can skip the route without reporting an
//! error.

use geo::Coord;

/// Default decimation factor applied to decoded paths.
pub const DEFAULT_SAMPLE_STRIDE: usize = 20;

/// Decimal precision of encoded polylines.
pub const POLYLINE_PRECISION: u32 = 5;

/// A latitude/longitude pair drawn from a route's path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleCoordinate {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

impl SampleCoordinate {
    /// Construct a coordinate from latitude and longitude.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl From<Coord<f64>> for SampleCoordinate {
    /// Geometry coordinates store longitude in `x` and latitude in `y`.
    fn from(coord: Coord<f64>) -> Self {
        Self::new(coord.y, coord.x)
    }
}

impl std::fmt::Display for SampleCoordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}

/// Decode an encoded polyline into coordinates.
///
/// Returns an empty vector for blank or malformed input.
///
/// # Examples
///
/// ```
/// use routerisk_core::decode_path;
///
/// let path = decode_path("_p~iF~ps|U_ulLnnqC_mqNvxq`@");
/// assert_eq!(path.len(), 3);
/// assert!((path[0].latitude - 38.5).abs() < 1e-9);
/// assert!(decode_path("").is_empty());
/// ```
#[must_use]
pub fn decode_path(encoded: &str) -> Vec<SampleCoordinate> {
    if encoded.trim().is_empty() {
        return Vec::new();
    }
    polyline::decode_polyline(encoded, POLYLINE_PRECISION)
        .map(|line| line.0.into_iter().map(SampleCoordinate::from).collect())
        .unwrap_or_default()
}

/// Keep every `stride`-th coordinate starting at index zero.
///
/// A stride of zero is treated as one, so no decimation happens.
///
/// # Examples
///
/// ```
/// use routerisk_core::{SampleCoordinate, sample_path};
///
/// let path: Vec<_> = (0..5)
///     .map(|i| SampleCoordinate::new(f64::from(i), 0.0))
///     .collect();
/// let sampled = sample_path(&path, 2);
/// assert_eq!(sampled.len(), 3);
/// assert_eq!(sampled[1].latitude, 2.0);
/// ```
#[must_use]
pub fn sample_path(path: &[SampleCoordinate], stride: usize) -> Vec<SampleCoordinate> {
    path.iter().step_by(stride.max(1)).copied().collect()
}
