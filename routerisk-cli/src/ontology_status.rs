//! Ontology status command.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use routerisk_core::OntologySource;
use routerisk_data::FileOntologySource;
use serde::{Deserialize, Serialize};

use crate::output::write_json;
use crate::{ARG_ONTOLOGY, CliError, ENV_ONTOLOGY};

/// CLI arguments for the `ontology-status` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Load the pollutant ontology and report how many pollutants \
                 and sources it relates. An unreadable or empty document is \
                 reported as unavailable rather than failing the command.",
    about = "Report whether the pollutant ontology can be loaded"
)]
#[ortho_config(prefix = "ROUTERISK")]
pub(crate) struct OntologyStatusArgs {
    /// Path to the ontology triple document.
    #[arg(long = ARG_ONTOLOGY, value_name = "path")]
    #[serde(default)]
    pub(crate) ontology: Option<Utf8PathBuf>,
}

impl OntologyStatusArgs {
    fn into_ontology_path(self) -> Result<Utf8PathBuf, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        merged.ontology.ok_or(CliError::MissingArgument {
            field: ARG_ONTOLOGY,
            env: ENV_ONTOLOGY,
        })
    }
}

pub(super) fn run_ontology_status(args: OntologyStatusArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_ontology_status_with(args, &mut stdout)
}

pub(super) fn run_ontology_status_with(
    args: OntologyStatusArgs,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let source = FileOntologySource::new(args.into_ontology_path()?);
    let status = source.status();
    if let Some(reason) = &status.error {
        log::info!("ontology at {} is unavailable: {reason}", source.path());
    }
    write_json(writer, &status)
}
