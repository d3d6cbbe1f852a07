//! `yaml2sdf`: compiles authored KAIROS YAML schemas into one SDF JSON-LD library.
//!
//! **Usage:**
//! ```
//! yaml2sdf --input-files <F>... --output-file <OUT.json> [--ontology <PATH>]
//!          [--config <TOML>] [--coref-mode <MODE>] [--skip-failed]
//!          [--no-round-trip] [--validate] [--validator-url <URL>] [-v...]
//! ```
//!
//! The library `@id` is the output file stem. Exits non-zero if any schema is
//! malformed or rejected (unless `--skip-failed`), or if the ontology cannot
//! be loaded.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use kairos_sdf::OntologyStore;
use kairos_sdf_clients::{logging, run, Config, RunReport, Settings};
use kairos_sdf_compiler::{BatchPolicy, CorefMode};
use kairos_sdf_validation::ValidatorOutcome;

/// Compile YAML schemas into an SDF library.
#[derive(Parser)]
#[command(
    name = "yaml2sdf",
    version,
    about = "Compile authored KAIROS YAML schemas into an SDF JSON-LD library"
)]
struct Args {
    /// Authored YAML files, concatenated in the given order.
    #[arg(long, num_args = 1.., required = true)]
    input_files: Vec<PathBuf>,

    /// Output JSON-LD file. Its stem becomes the library id.
    #[arg(long)]
    output_file: PathBuf,

    /// Ontology document (default: ontology.json).
    #[arg(long, env = "SDF_ONTOLOGY")]
    ontology: Option<PathBuf>,

    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Coreference output: refvar, entity-relations, or both.
    #[arg(long)]
    coref_mode: Option<CorefMode>,

    /// Leave rejected schemas out instead of aborting the run.
    #[arg(long)]
    skip_failed: bool,

    /// Skip the raw-versus-parsed consistency check.
    #[arg(long)]
    no_round_trip: bool,

    /// Send the finished library to the program validator.
    #[arg(long)]
    validate: bool,

    /// Program validator endpoint.
    #[arg(long, env = "SDF_VALIDATOR_URL")]
    validator_url: Option<String>,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    /// Merges the configuration file with command-line overrides.
    fn into_settings(self) -> Result<Settings> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        if let Some(mode) = self.coref_mode {
            config.compile.coref_mode = mode;
        }
        if self.skip_failed {
            config.compile.batch_policy = BatchPolicy::SkipSchema;
        }
        if self.no_round_trip {
            config.compile.round_trip_check = false;
        }
        if self.validate {
            config.validator.enabled = true;
        }
        if let Some(url) = self.validator_url {
            config.validator.endpoint = url;
        }
        let ontology = self
            .ontology
            .or(config.ontology)
            .unwrap_or_else(|| PathBuf::from(OntologyStore::DEFAULT_PATH));
        Ok(Settings {
            inputs: self.input_files,
            output: self.output_file,
            ontology,
            compile: config.compile,
            validator: config.validator,
        })
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let settings = args.into_settings().context("Failed to load configuration")?;
    let report = run(&settings)?;
    print_report(&report, &settings);
    Ok(())
}

fn print_report(report: &RunReport, settings: &Settings) {
    println!(
        "Wrote {} schema(s) to {} ({})",
        report.schema_count,
        settings.output.display(),
        report.library_id
    );
    for skipped in &report.skipped {
        println!("  Skipped: {skipped}");
    }
    println!(
        "{} warning(s), {} error(s)",
        report.diagnostics.warning_count(),
        report.diagnostics.error_count()
    );

    match &report.validator {
        Some(ValidatorOutcome::Report(found)) if !found.is_clean() => {
            println!("Messages from program validator:");
            for message in found.messages() {
                println!("\t{message}");
            }
        }
        Some(ValidatorOutcome::Unavailable(reason)) => {
            eprintln!("Program validator unavailable: {reason}");
        }
        _ => {}
    }
}
