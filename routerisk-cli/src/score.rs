//! Score command implementation for the route risk CLI.

use std::io::{BufReader, Write};
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use log::{debug, info};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use routerisk_core::{
    OntologyModel, OntologySource, PollutionSource, ScoreRequest, ScoreResponse, WeatherSource,
};
use routerisk_data::air_quality::DEFAULT_AIR_QUALITY_URL;
use routerisk_data::weather::DEFAULT_FORECAST_URL;
use routerisk_data::{
    AirQualityConfig, FileOntologySource, HttpPollutionSource, HttpWeatherSource, WeatherConfig,
};
use routerisk_evaluator::{EvaluatorConfig, RouteEvaluator};
use serde::{Deserialize, Serialize};

use crate::fs::{file_is_file, open_utf8_file};
use crate::output::write_json;
use crate::{
    ARG_AIR_QUALITY_KEY, ARG_AIR_QUALITY_URL, ARG_MAX_CONCURRENCY, ARG_ONTOLOGY,
    ARG_SAMPLE_STRIDE, ARG_SCORE_REQUEST, ARG_TIMEOUT_SECS, ARG_WEATHER_TOKEN, ARG_WEATHER_URL,
    CliError, ENV_AIR_QUALITY_KEY, ENV_SCORE_REQUEST, ENV_WEATHER_TOKEN,
};

/// CLI arguments for the `score` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Score a batch of candidate routes. The request is a JSON \
                 document listing routes with their encoded paths, distances \
                 and durations. Pollution and humidity are fetched for \
                 sampled points along each path and blended with relative \
                 distance and time into a risk score per route.",
    about = "Score a batch of candidate routes"
)]
#[ortho_config(prefix = "ROUTERISK")]
pub(crate) struct ScoreArgs {
    /// Path to a JSON file containing a score request.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) request_path: Option<Utf8PathBuf>,
    /// API key for the air-quality lookup service.
    #[arg(long = ARG_AIR_QUALITY_KEY, value_name = "key")]
    #[serde(default)]
    pub(crate) air_quality_key: Option<String>,
    /// Override the air-quality lookup endpoint.
    #[arg(long = ARG_AIR_QUALITY_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) air_quality_url: Option<String>,
    /// Bearer token for the weather forecast service.
    #[arg(long = ARG_WEATHER_TOKEN, value_name = "token")]
    #[serde(default)]
    pub(crate) weather_token: Option<String>,
    /// Override the weather forecast endpoint.
    #[arg(long = ARG_WEATHER_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) weather_url: Option<String>,
    /// Pollutant ontology used when a request opts in to source attribution.
    #[arg(long = ARG_ONTOLOGY, value_name = "path")]
    #[serde(default)]
    pub(crate) ontology: Option<Utf8PathBuf>,
    /// Override the sample stride carried by the request.
    #[arg(long = ARG_SAMPLE_STRIDE, value_name = "n")]
    #[serde(default)]
    pub(crate) sample_stride: Option<i64>,
    /// Maximum number of provider calls in flight.
    #[arg(long = ARG_MAX_CONCURRENCY, value_name = "n")]
    #[serde(default)]
    pub(crate) max_concurrency: Option<usize>,
    /// Per-call timeout for provider requests, in seconds.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
}

impl ScoreArgs {
    pub(crate) fn into_config(self) -> Result<ScoreConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ScoreConfig::try_from(merged)
    }
}

/// Resolved `score` command configuration.
#[derive(Clone, PartialEq, Eq)]
pub(crate) struct ScoreConfig {
    /// Path to the JSON request file.
    pub(crate) request_path: Utf8PathBuf,
    /// Air-quality service credential.
    pub(crate) air_quality_key: String,
    /// Air-quality lookup endpoint.
    pub(crate) air_quality_url: String,
    /// Weather service credential.
    pub(crate) weather_token: String,
    /// Weather forecast endpoint.
    pub(crate) weather_url: String,
    /// Ontology document, if configured.
    pub(crate) ontology: Option<Utf8PathBuf>,
    /// Stride forced onto every request.
    pub(crate) sample_stride: Option<i64>,
    /// Evaluator limits.
    pub(crate) evaluator: EvaluatorConfig,
}

impl std::fmt::Debug for ScoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoreConfig")
            .field("request_path", &self.request_path)
            .field("air_quality_key", &"<redacted>")
            .field("air_quality_url", &self.air_quality_url)
            .field("weather_token", &"<redacted>")
            .field("weather_url", &self.weather_url)
            .field("ontology", &self.ontology)
            .field("sample_stride", &self.sample_stride)
            .field("evaluator", &self.evaluator)
            .finish()
    }
}

impl ScoreConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        match file_is_file(&self.request_path) {
            Ok(true) => Ok(()),
            Ok(false) => Err(CliError::SourcePathNotFile {
                field: ARG_SCORE_REQUEST,
                path: self.request_path.clone(),
            }),
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                Err(CliError::MissingSourceFile {
                    field: ARG_SCORE_REQUEST,
                    path: self.request_path.clone(),
                })
            }
            Err(source) => Err(CliError::InspectSourcePath {
                field: ARG_SCORE_REQUEST,
                path: self.request_path.clone(),
                source,
            }),
        }
    }

    pub(crate) fn air_quality_config(&self) -> AirQualityConfig {
        AirQualityConfig::new(self.air_quality_key.clone())
            .with_base_url(self.air_quality_url.clone())
            .with_timeout(self.evaluator.call_timeout)
    }

    pub(crate) fn weather_config(&self) -> WeatherConfig {
        WeatherConfig::new(self.weather_token.clone())
            .with_base_url(self.weather_url.clone())
            .with_timeout(self.evaluator.call_timeout)
    }
}

impl TryFrom<ScoreArgs> for ScoreConfig {
    type Error = CliError;

    fn try_from(args: ScoreArgs) -> Result<Self, Self::Error> {
        let request_path = args.request_path.ok_or(CliError::MissingArgument {
            field: ARG_SCORE_REQUEST,
            env: ENV_SCORE_REQUEST,
        })?;
        let air_quality_key = args.air_quality_key.ok_or(CliError::MissingArgument {
            field: ARG_AIR_QUALITY_KEY,
            env: ENV_AIR_QUALITY_KEY,
        })?;
        let weather_token = args.weather_token.ok_or(CliError::MissingArgument {
            field: ARG_WEATHER_TOKEN,
            env: ENV_WEATHER_TOKEN,
        })?;

        let mut evaluator = EvaluatorConfig::default();
        if let Some(limit) = args.max_concurrency {
            evaluator = evaluator.with_max_concurrency(limit);
        }
        if let Some(secs) = args.timeout_secs {
            evaluator = evaluator.with_call_timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            request_path,
            air_quality_key,
            air_quality_url: args
                .air_quality_url
                .unwrap_or_else(|| DEFAULT_AIR_QUALITY_URL.to_owned()),
            weather_token,
            weather_url: args
                .weather_url
                .unwrap_or_else(|| DEFAULT_FORECAST_URL.to_owned()),
            ontology: args.ontology,
            sample_stride: args.sample_stride,
            evaluator,
        })
    }
}

/// Builds the enrichment providers for the current score invocation.
pub(super) trait ScoreProviderBuilder {
    type Pollution: PollutionSource;
    type Weather: WeatherSource;

    fn build(&self, config: &ScoreConfig) -> Result<(Self::Pollution, Self::Weather), CliError>;
}

pub(super) struct DefaultScoreProviderBuilder;

impl ScoreProviderBuilder for DefaultScoreProviderBuilder {
    type Pollution = HttpPollutionSource;
    type Weather = HttpWeatherSource;

    fn build(
        &self,
        config: &ScoreConfig,
    ) -> Result<(HttpPollutionSource, HttpWeatherSource), CliError> {
        let pollution = HttpPollutionSource::with_config(config.air_quality_config())
            .map_err(CliError::BuildPollutionProvider)?;
        let weather = HttpWeatherSource::with_config(config.weather_config())
            .map_err(CliError::BuildWeatherProvider)?;
        Ok((pollution, weather))
    }
}

pub(super) fn run_score(args: ScoreArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_score_with(args, &DefaultScoreProviderBuilder, &mut stdout)
}

pub(super) fn run_score_with<B: ScoreProviderBuilder>(
    args: ScoreArgs,
    builder: &B,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let response = execute_score(args, builder)?;
    write_json(writer, &response)
}

fn execute_score<B: ScoreProviderBuilder>(
    args: ScoreArgs,
    builder: &B,
) -> Result<ScoreResponse, CliError> {
    let config = resolve_score_config(args)?;
    let mut request = load_score_request(&config.request_path)?;
    if let Some(stride) = config.sample_stride {
        request.sample_stride = stride;
    }
    debug!(
        "scoring {} routes from {}",
        request.routes.len(),
        config.request_path
    );

    let (pollution, weather) = builder.build(&config)?;
    let evaluator = RouteEvaluator::with_config(pollution, weather, config.evaluator);
    let ontology = request
        .use_ontology
        .then(|| load_ontology(config.ontology.as_deref()))
        .flatten();
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;
    let response = runtime.block_on(evaluator.score(
        &request,
        ontology.as_ref().map(|model| model as &dyn OntologySource),
    ))?;
    Ok(response)
}

/// Read the ontology document before scoring starts.
///
/// A missing or unreadable document disables source attribution.
fn load_ontology(path: Option<&Utf8Path>) -> Option<OntologyModel> {
    let Some(document) = path else {
        debug!("no ontology document configured");
        return None;
    };
    FileOntologySource::new(document.to_path_buf())
        .load()
        .inspect_err(|err| info!("ontology unavailable, scoring without it: {err}"))
        .ok()
}

fn resolve_score_config(args: ScoreArgs) -> Result<ScoreConfig, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    Ok(config)
}

/// Loads a JSON-encoded [`ScoreRequest`] from disk.
pub(super) fn load_score_request(path: &Utf8Path) -> Result<ScoreRequest, CliError> {
    let file = open_utf8_file(path).map_err(|source| CliError::OpenScoreRequest {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|source| CliError::ParseScoreRequest {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<ScoreConfig, CliError> {
    let merged = ScoreArgs::merge_from_layers(layers).map_err(CliError::from)?;
    ScoreConfig::try_from(merged)
}
