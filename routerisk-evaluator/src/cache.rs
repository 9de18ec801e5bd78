//! TTL-bounded memo of per-coordinate pollution readings.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use routerisk_core::{Clock, PollutantReading, SampleCoordinate, SystemClock};

use crate::config::DEFAULT_CACHE_TTL;

/// Decimal places kept when quantising coordinates.
pub const KEY_PRECISION: i32 = 4;

/// Coordinate quantised to [`KEY_PRECISION`] decimal places.
///
/// Distinct coordinates closer than roughly eleven metres alias to the same
/// key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    latitude: i64,
    longitude: i64,
}

impl CacheKey {
    /// Quantise `coordinate`.
    #[must_use]
    pub fn from_coordinate(coordinate: SampleCoordinate) -> Self {
        Self {
            latitude: quantise(coordinate.latitude),
            longitude: quantise(coordinate.longitude),
        }
    }
}

#[expect(clippy::float_arithmetic, reason = "fixed-point quantisation")]
#[expect(
    clippy::cast_possible_truncation,
    reason = "quantised degrees stay far inside the i64 range"
)]
fn quantise(degrees: f64) -> i64 {
    (degrees * 10_f64.powi(KEY_PRECISION)).round() as i64
}

/// Shared pollution cache.
///
/// Entries are whole `(stored_at, reading)` values replaced atomically per
/// key; lookups on distinct keys do not contend. Stale entries are never
/// purged, only refreshed on the next miss for the same key.
///
/// # Examples
/// ```
/// use routerisk_core::{Pollutant, PollutantReading, SampleCoordinate};
/// use routerisk_evaluator::EnrichmentCache;
///
/// let cache = EnrichmentCache::new();
/// let here = SampleCoordinate::new(13.756_31, 100.501_81);
/// cache.store(here, PollutantReading::missing().with(Pollutant::Pm25, 18.0));
///
/// let nearby = SampleCoordinate::new(13.756_33, 100.501_79);
/// assert_eq!(cache.lookup(nearby).and_then(|r| r.get(Pollutant::Pm25)), Some(18.0));
/// ```
#[derive(Debug)]
pub struct EnrichmentCache<C = SystemClock> {
    entries: DashMap<CacheKey, (Instant, PollutantReading)>,
    ttl: Duration,
    clock: C,
}

impl EnrichmentCache<SystemClock> {
    /// Cache with the default lifetime and the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(DEFAULT_CACHE_TTL, SystemClock)
    }
}

impl Default for EnrichmentCache<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> EnrichmentCache<C> {
    /// Cache with an explicit lifetime and time source.
    #[must_use]
    pub fn with_clock(ttl: Duration, clock: C) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            clock,
        }
    }

    /// Reading cached for `coordinate`, if younger than the lifetime.
    #[must_use]
    pub fn lookup(&self, coordinate: SampleCoordinate) -> Option<PollutantReading> {
        let entry = self.entries.get(&CacheKey::from_coordinate(coordinate))?;
        let (stored_at, reading) = *entry;
        let age = self.clock.now().saturating_duration_since(stored_at);
        (age < self.ttl).then_some(reading)
    }

    /// Insert or replace the reading for `coordinate`, stamped now.
    pub fn store(&self, coordinate: SampleCoordinate, reading: PollutantReading) {
        self.entries.insert(
            CacheKey::from_coordinate(coordinate),
            (self.clock.now(), reading),
        );
    }

    /// Number of keys ever stored, fresh or stale.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Report whether nothing has been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Configured lifetime.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Time source.
    #[must_use]
    pub const fn clock(&self) -> &C {
        &self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use routerisk_core::Pollutant;
    use routerisk_core::test_support::ManualClock;
    use rstest::{fixture, rstest};

    const TTL: Duration = Duration::from_secs(300);

    #[fixture]
    fn cache() -> EnrichmentCache<ManualClock> {
        EnrichmentCache::with_clock(TTL, ManualClock::new())
    }

    fn reading() -> PollutantReading {
        PollutantReading::missing().with(Pollutant::No2, 42.0)
    }

    #[rstest]
    #[case(13.756_31, 13.756_33, true)]
    #[case(13.756_31, 13.756_41, false)]
    #[case(-33.868_82, -33.868_84, true)]
    fn keys_quantise_to_four_decimals(#[case] a: f64, #[case] b: f64, #[case] same: bool) {
        let lhs = CacheKey::from_coordinate(SampleCoordinate::new(a, 100.0));
        let rhs = CacheKey::from_coordinate(SampleCoordinate::new(b, 100.0));
        assert_eq!(lhs == rhs, same);
    }

    #[rstest]
    fn hit_within_ttl(cache: EnrichmentCache<ManualClock>) {
        let here = SampleCoordinate::new(1.0, 2.0);
        cache.store(here, reading());
        cache.clock().advance(TTL - Duration::from_secs(1));
        assert_eq!(cache.lookup(here), Some(reading()));
    }

    #[rstest]
    fn miss_at_ttl(cache: EnrichmentCache<ManualClock>) {
        let here = SampleCoordinate::new(1.0, 2.0);
        cache.store(here, reading());
        cache.clock().advance(TTL);
        assert_eq!(cache.lookup(here), None);
        assert_eq!(cache.len(), 1);
    }

    #[rstest]
    fn store_refreshes_stale_entry(cache: EnrichmentCache<ManualClock>) {
        let here = SampleCoordinate::new(1.0, 2.0);
        cache.store(here, reading());
        cache.clock().advance(TTL);
        let fresh = PollutantReading::missing().with(Pollutant::O3, 7.0);
        cache.store(here, fresh);
        assert_eq!(cache.lookup(here), Some(fresh));
        assert_eq!(cache.len(), 1);
    }

    #[rstest]
    fn unknown_coordinate_misses(cache: EnrichmentCache<ManualClock>) {
        assert!(cache.is_empty());
        assert_eq!(cache.lookup(SampleCoordinate::new(0.0, 0.0)), None);
    }
}
