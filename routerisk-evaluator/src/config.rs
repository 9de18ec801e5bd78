//! Tunables for the evaluation pipeline.

use std::time::Duration;

/// Default cap on simultaneous external calls.
pub const DEFAULT_MAX_CONCURRENCY: usize = 10;

/// Default age after which a cached pollution reading is refetched.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// Default bound on a single external call.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(4);

/// Configuration for [`RouteEvaluator`](crate::RouteEvaluator).
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use routerisk_evaluator::EvaluatorConfig;
///
/// let config = EvaluatorConfig::default()
///     .with_max_concurrency(4)
///     .with_call_timeout(Duration::from_secs(2));
/// assert_eq!(config.max_concurrency, 4);
/// assert_eq!(config.cache_ttl, Duration::from_secs(300));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluatorConfig {
    /// Upper bound on outstanding pollution and weather calls. Zero is
    /// treated as one.
    pub max_concurrency: usize,
    /// Lifetime of a cached pollution reading.
    pub cache_ttl: Duration,
    /// Time allowed for one external call before it counts as failed.
    pub call_timeout: Duration,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            cache_ttl: DEFAULT_CACHE_TTL,
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }
}

impl EvaluatorConfig {
    /// Override the concurrency cap.
    #[must_use]
    pub const fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    /// Override the cache lifetime.
    #[must_use]
    pub const fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Override the per-call timeout.
    #[must_use]
    pub const fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    /// Concurrency cap with the zero case lifted to one.
    #[must_use]
    pub const fn permits(&self) -> usize {
        if self.max_concurrency == 0 {
            1
        } else {
            self.max_concurrency
        }
    }
}
