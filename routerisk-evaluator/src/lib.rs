//! Route evaluation pipeline.
//!
//! [`RouteEvaluator`] scores a batch of routes in two passes. The baseline
//! pass fetches pollution for every sample coordinate across the batch and
//! derives the shared statistics. The route pass then enriches each route's
//! coordinates with pollution (served from the [`EnrichmentCache`]) and fresh
//! weather, and scores the route against the baseline. Routes are evaluated
//! concurrently, and every external call in both passes shares one
//! concurrency gate.
//!
//! Failures are isolated at the smallest possible scope: a failed lookup
//! becomes missing data, a failed route is dropped, and only an empty request
//! or a batch in which every route failed is reported as a [`BatchError`].

#![forbid(unsafe_code)]

mod cache;
mod config;
mod error;
mod evaluator;
mod fetcher;

pub use cache::{CacheKey, EnrichmentCache, KEY_PRECISION};
pub use config::{
    DEFAULT_CACHE_TTL, DEFAULT_CALL_TIMEOUT, DEFAULT_MAX_CONCURRENCY, EvaluatorConfig,
};
pub use error::{BatchError, EvaluationError};
pub use evaluator::RouteEvaluator;
pub use fetcher::{EnrichedSample, EnrichmentFetcher};
