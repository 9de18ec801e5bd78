//! Batch pipeline: baseline pass, then independent per-route evaluation.

use futures_util::future::join_all;
use log::{debug, info, warn};
use routerisk_core::{
    Clock, EvaluationResult, Indicators, OntologyModel, OntologySource, Pollutant,
    PollutantReading, PollutionSource, Route, RouteScore, SampleCoordinate, ScoreRequest,
    ScoreResponse, SystemClock, WeatherSource,
};
use routerisk_scorer::{
    BaselineStatistics, BatchRange, DataAvailability, blend, classify, pollution_indicator,
    rule_based_severity, weather_summary,
};

use crate::cache::EnrichmentCache;
use crate::config::EvaluatorConfig;
use crate::error::{BatchError, EvaluationError};
use crate::fetcher::EnrichmentFetcher;

/// Batch-wide context shared by every route evaluation.
struct BatchContext {
    baseline: BaselineStatistics,
    distances: BatchRange,
    durations: BatchRange,
    ontology: Option<OntologyModel>,
}

/// A route that passed validation and yielded sample coordinates.
struct SampledRoute<'a> {
    route: &'a Route,
    samples: Vec<SampleCoordinate>,
}

/// Scores batches of candidate routes.
///
/// The evaluator owns the providers, the pollution cache and the
/// concurrency gate, so one instance should serve many requests.
///
/// # Examples
/// ```
/// use routerisk_core::test_support::{StubPollutionSource, StubWeatherSource};
/// use routerisk_core::{PollutantReading, Route, ScoreRequest};
/// use routerisk_evaluator::RouteEvaluator;
///
/// # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
/// let evaluator = RouteEvaluator::new(
///     StubPollutionSource::with_reading(PollutantReading::missing()),
///     StubWeatherSource::absent(),
/// );
/// let path = Some("_p~iF~ps|U_ulLnnqC_mqNvxq`@".to_owned());
/// let request = ScoreRequest::new(vec![
///     Route::new("a", path.clone(), 1_000.0, 120.0).unwrap(),
///     Route::new("b", path, 2_000.0, 240.0).unwrap(),
/// ]);
/// let response = evaluator.score(&request, None).await.unwrap();
/// assert_eq!(response.scores.len(), 2);
/// assert_eq!(response.scores[0].risk_score, 0.5);
/// # });
/// ```
#[derive(Debug)]
pub struct RouteEvaluator<P, W, C = SystemClock> {
    fetcher: EnrichmentFetcher<P, W, C>,
}

impl<P, W> RouteEvaluator<P, W, SystemClock>
where
    P: PollutionSource,
    W: WeatherSource,
{
    /// Evaluator with the default configuration.
    #[must_use]
    pub fn new(pollution: P, weather: W) -> Self {
        Self::with_config(pollution, weather, EvaluatorConfig::default())
    }

    /// Evaluator with an explicit configuration and the system clock.
    #[must_use]
    pub fn with_config(pollution: P, weather: W, config: EvaluatorConfig) -> Self {
        let cache = EnrichmentCache::with_clock(config.cache_ttl, SystemClock);
        Self::with_cache(pollution, weather, cache, &config)
    }
}

impl<P, W, C> RouteEvaluator<P, W, C>
where
    P: PollutionSource,
    W: WeatherSource,
    C: Clock,
{
    /// Evaluator sharing an explicitly constructed cache.
    #[must_use]
    pub fn with_cache(
        pollution: P,
        weather: W,
        cache: EnrichmentCache<C>,
        config: &EvaluatorConfig,
    ) -> Self {
        Self {
            fetcher: EnrichmentFetcher::new(pollution, weather, cache, config),
        }
    }

    /// Underlying fetcher, exposing the providers and the cache.
    #[must_use]
    pub const fn fetcher(&self) -> &EnrichmentFetcher<P, W, C> {
        &self.fetcher
    }

    /// Score `request` and shape the results for the wire.
    ///
    /// # Errors
    /// See [`RouteEvaluator::evaluate`].
    pub async fn score(
        &self,
        request: &ScoreRequest,
        ontology: Option<&dyn OntologySource>,
    ) -> Result<ScoreResponse, BatchError> {
        let results = self.evaluate(request, ontology).await?;
        Ok(results.iter().map(RouteScore::from).collect())
    }

    /// Evaluate every route in `request`.
    ///
    /// Routes without sample coordinates are skipped. Routes that fail are
    /// logged and dropped. Results follow request order.
    ///
    /// The ontology is loaded on the calling task when the request opts in,
    /// so `ontology` should be cheap to load, such as an in-memory
    /// [`routerisk_core::OntologyModel`].
    ///
    /// # Errors
    /// Returns [`BatchError::EmptyBatch`] when the request has no routes and
    /// [`BatchError::AllRoutesFailed`] when every route failed. A batch of
    /// skipped and failed routes is an empty success.
    pub async fn evaluate(
        &self,
        request: &ScoreRequest,
        ontology: Option<&dyn OntologySource>,
    ) -> Result<Vec<EvaluationResult>, BatchError> {
        if request.routes.is_empty() {
            return Err(BatchError::EmptyBatch);
        }

        let stride = request.stride();
        let mut failures = Vec::new();
        let mut valid = Vec::new();
        let mut sampled = Vec::new();
        for route in &request.routes {
            if let Err(err) = route.validate() {
                warn!("skipping invalid route: {err}");
                failures.push(EvaluationError::from(err));
                continue;
            }
            valid.push(route);
            let samples = route.samples(stride);
            if samples.is_empty() {
                debug!("route {} has no sample coordinates; skipping", route.id);
                continue;
            }
            sampled.push(SampledRoute { route, samples });
        }

        let ontology_source = request.use_ontology.then_some(ontology).flatten();
        if request.use_ontology && ontology_source.is_none() {
            info!("ontology adjustment requested but no source is configured");
        }
        let context = self
            .batch_context(request, &valid, &sampled, ontology_source)
            .await;

        let outcomes =
            join_all(sampled.iter().map(|route| self.evaluate_route(route, &context))).await;

        let mut results = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            match outcome {
                Ok(result) => results.push(result),
                Err(err) => {
                    warn!("dropping route from batch: {err}");
                    failures.push(err);
                }
            }
        }

        if results.is_empty() && failures.len() == request.routes.len() {
            return Err(BatchError::AllRoutesFailed { failures });
        }
        Ok(results)
    }

    async fn batch_context(
        &self,
        request: &ScoreRequest,
        valid: &[&Route],
        sampled: &[SampledRoute<'_>],
        ontology: Option<&dyn OntologySource>,
    ) -> BatchContext {
        let coordinates: Vec<SampleCoordinate> = sampled
            .iter()
            .flat_map(|route| route.samples.iter().copied())
            .collect();
        let readings = self.fetcher.pollution_readings(&coordinates).await;
        let focus: Vec<Pollutant> = request.focus();
        let baseline = BaselineStatistics::from_samples(&readings, &focus);
        debug!(
            "baseline built from {} of {} samples",
            baseline.sample_count(),
            readings.len()
        );

        BatchContext {
            baseline,
            distances: BatchRange::from_values(valid.iter().map(|r| r.distance_meters)),
            durations: BatchRange::from_values(valid.iter().map(|r| r.duration_seconds)),
            ontology: ontology.and_then(|source| {
                source
                    .load()
                    .inspect_err(|err| info!("ontology unavailable, scoring without it: {err}"))
                    .ok()
            }),
        }
    }

    async fn evaluate_route(
        &self,
        sampled: &SampledRoute<'_>,
        context: &BatchContext,
    ) -> Result<EvaluationResult, EvaluationError> {
        let route = sampled.route;
        let samples = self.fetcher.enrich(&sampled.samples).await;

        let average = PollutantReading::mean(samples.iter().map(|s| &s.pollution));
        let humidity: Vec<f64> = samples.iter().filter_map(|s| s.weather.humidity()).collect();
        let weather = weather_summary(&humidity);
        let availability = DataAvailability::new(
            samples.iter().any(|s| s.pollution.has_signal()),
            !humidity.is_empty(),
        );

        let indicators = Indicators {
            distance: context.distances.indicator(route.distance_meters),
            time: context.durations.indicator(route.duration_seconds),
            pollution: pollution_indicator(&average, &context.baseline),
            weather: weather.indicator,
        };
        let final_score = blend(&indicators, availability);
        if !final_score.is_finite() {
            return Err(EvaluationError::NonFiniteScore {
                route_id: route.id.clone(),
            });
        }

        Ok(EvaluationResult {
            route_id: route.id.clone(),
            indicators,
            final_score,
            average_humidity: weather.average_humidity,
            points_sampled: samples.len(),
            points_used: samples.iter().filter(|s| s.is_used()).count(),
            pollution_present: availability.pollution,
            weather_present: availability.weather,
            rule_based: rule_based_severity(&average),
            ontology: context
                .ontology
                .as_ref()
                .map(|model| classify(&average, model, final_score)),
        })
    }
}
