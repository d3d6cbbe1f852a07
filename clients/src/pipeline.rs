//! The YAML to SDF conversion run.
//!
//! Stages, each fatal on failure unless noted:
//!
//! 1. load the ontology
//! 2. read and concatenate every input file
//! 3. typed parse of all records
//! 4. round-trip self-consistency check (when enabled)
//! 5. compile per the batch policy
//! 6. program validator call (when enabled; advisory)
//! 7. write the library

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use kairos_sdf::authored::{from_records, load_records};
use kairos_sdf::serializer::jsonld::write_json_ld;
use kairos_sdf::OntologyStore;
use kairos_sdf_compiler::{compile_library, CompileOptions, Diagnostics};
use kairos_sdf_validation::{check_round_trip, RemoteValidator, RemoteValidatorConfig, ValidatorOutcome};

/// Fully resolved settings of one run.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Authored YAML files, concatenated in this order.
    pub inputs: Vec<PathBuf>,
    /// Output JSON-LD file; its stem becomes the library id.
    pub output: PathBuf,
    /// Ontology document.
    pub ontology: PathBuf,
    /// Compiler options.
    pub compile: CompileOptions,
    /// Program validator settings.
    pub validator: RemoteValidatorConfig,
}

/// What a successful run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Library id written to the output.
    pub library_id: String,
    /// Number of schemas in the output.
    pub schema_count: usize,
    /// Warnings, plus errors for skipped schemas.
    pub diagnostics: Diagnostics,
    /// Schemas left out of the library.
    pub skipped: Vec<String>,
    /// Program validator result, when it was called.
    pub validator: Option<ValidatorOutcome>,
}

/// Library id derived from the output path: its file stem.
///
/// # Errors
///
/// Returns an error if `output` has no file name.
pub fn library_id(output: &Path) -> Result<String> {
    output
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .ok_or_else(|| anyhow!("output path {} has no file name", output.display()))
}

/// Runs the whole conversion.
///
/// # Errors
///
/// Returns an error if the ontology cannot be loaded, an input cannot be read
/// or parsed, the round-trip check fails, compilation is aborted, or the
/// output cannot be written. The output file is not touched on error.
pub fn run(settings: &Settings) -> Result<RunReport> {
    let ontology = OntologyStore::load(&settings.ontology)
        .with_context(|| format!("Failed to load ontology {}", settings.ontology.display()))?;

    let mut raw = Vec::new();
    for input in &settings.inputs {
        let text = fs::read_to_string(input)
            .with_context(|| format!("Failed to read {}", input.display()))?;
        let records = load_records(&text)
            .with_context(|| format!("Failed to parse {}", input.display()))?;
        tracing::info!(path = %input.display(), records = records.len(), "read input");
        raw.extend(records);
    }
    let schemas = from_records(&raw).context("Malformed schema records")?;

    if settings.compile.round_trip_check {
        check_round_trip(&raw, &schemas).context("Round-trip check failed")?;
    }

    let library_id = library_id(&settings.output)?;
    let compiled = compile_library(&ontology, &settings.compile, &library_id, &schemas)
        .context("Compilation aborted")?;

    let validator = if settings.validator.enabled {
        let client = RemoteValidator::new(&settings.validator)
            .context("Failed to set up program validator")?;
        Some(client.validate(&compiled.document))
    } else {
        None
    };

    let file = File::create(&settings.output)
        .with_context(|| format!("Failed to create {}", settings.output.display()))?;
    let mut writer = BufWriter::new(file);
    write_json_ld(&mut writer, &compiled.document)
        .with_context(|| format!("Failed to write {}", settings.output.display()))?;
    writer
        .flush()
        .with_context(|| format!("Failed to write {}", settings.output.display()))?;

    Ok(RunReport {
        library_id,
        schema_count: compiled.document.schemas.len(),
        diagnostics: compiled.diagnostics,
        skipped: compiled.skipped,
        validator,
    })
}
