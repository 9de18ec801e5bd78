//! Command-line interface for the route risk engine.
//!
//! `routerisk score` reads a JSON batch of candidate routes, enriches their
//! sample coordinates with pollution and humidity from the configured
//! providers, and prints the scored batch as JSON. `routerisk
//! ontology-status` reports whether an ontology document can be loaded.
//!
//! Options are layered with `ortho_config`: command-line flags override
//! environment variables (prefixed `ROUTERISK_`), which override
//! configuration files.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod fs;
mod ontology_status;
mod output;
mod score;

pub use error::CliError;
use ontology_status::{OntologyStatusArgs, run_ontology_status};
use score::{ScoreArgs, run_score};

const ARG_SCORE_REQUEST: &str = "request";
const ARG_AIR_QUALITY_KEY: &str = "air-quality-key";
const ARG_AIR_QUALITY_URL: &str = "air-quality-url";
const ARG_WEATHER_TOKEN: &str = "weather-token";
const ARG_WEATHER_URL: &str = "weather-url";
const ARG_ONTOLOGY: &str = "ontology";
const ARG_SAMPLE_STRIDE: &str = "sample-stride";
const ARG_MAX_CONCURRENCY: &str = "max-concurrency";
const ARG_TIMEOUT_SECS: &str = "timeout-secs";
const ENV_SCORE_REQUEST: &str = "ROUTERISK_CMDS_SCORE_REQUEST_PATH";
const ENV_AIR_QUALITY_KEY: &str = "ROUTERISK_CMDS_SCORE_AIR_QUALITY_KEY";
const ENV_WEATHER_TOKEN: &str = "ROUTERISK_CMDS_SCORE_WEATHER_TOKEN";
const ENV_ONTOLOGY: &str = "ROUTERISK_CMDS_ONTOLOGY_STATUS_ONTOLOGY";

/// Run the CLI with the current process arguments and environment.
///
/// # Errors
/// Returns [`CliError`] when argument parsing, configuration, input loading,
/// scoring, or writing the output fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Score(args) => run_score(args),
        Command::OntologyStatus(args) => run_ontology_status(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "routerisk",
    about = "Score candidate routes by air-quality and weather exposure",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Score a batch of routes read from a JSON request.
    Score(ScoreArgs),
    /// Report whether the pollutant ontology can be loaded.
    OntologyStatus(OntologyStatusArgs),
}

#[cfg(test)]
mod tests;
