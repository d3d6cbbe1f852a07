//! Library assembly and batch compilation.

use kairos_sdf::{AuthoredSchema, CanonicalSchema, LibraryDocument, OntologyStore};

use crate::error::CompileError;
use crate::options::{BatchPolicy, CompileOptions};
use crate::report::{Diagnostics, SOURCE_SCHEMA};
use crate::schema::SchemaCompiler;

/// Wraps compiled schemas into a library document.
#[must_use]
pub fn assemble_library(id: impl Into<String>, schemas: Vec<CanonicalSchema>) -> LibraryDocument {
    LibraryDocument::new(id, schemas)
}

/// Result of compiling a batch.
#[derive(Debug, Clone)]
pub struct CompiledLibrary {
    /// The assembled library.
    pub document: LibraryDocument,
    /// Diagnostics of every schema, in input order.
    pub diagnostics: Diagnostics,
    /// Ids of schemas left out under [`BatchPolicy::SkipSchema`].
    pub skipped: Vec<String>,
}

/// Compiles every schema of a batch and assembles the library `library_id`.
///
/// Every schema is attempted regardless of earlier failures, so a single run
/// reports all problems of the batch.
///
/// # Errors
///
/// Under [`BatchPolicy::AbortRun`], returns the rejection of the failing schema,
/// or [`CompileError::Batch`] when several schemas failed. Under
/// [`BatchPolicy::SkipSchema`] this never fails; rejected schemas are recorded
/// as error diagnostics and listed in [`CompiledLibrary::skipped`].
pub fn compile_library(
    ontology: &OntologyStore,
    options: &CompileOptions,
    library_id: &str,
    schemas: &[AuthoredSchema],
) -> Result<CompiledLibrary, CompileError> {
    let compiler = SchemaCompiler::new(ontology, options);
    let mut compiled = Vec::with_capacity(schemas.len());
    let mut diagnostics = Diagnostics::new();
    let mut failures = Vec::new();
    let mut skipped = Vec::new();

    for authored in schemas {
        match compiler.compile(authored) {
            Ok(schema) => {
                diagnostics.extend(schema.diagnostics);
                compiled.push(schema.schema);
            }
            Err(err) => match options.batch_policy {
                BatchPolicy::AbortRun => failures.push(err),
                BatchPolicy::SkipSchema => {
                    diagnostics.error(SOURCE_SCHEMA, &authored.schema_id, err.to_string());
                    skipped.push(authored.schema_id.clone());
                }
            },
        }
    }

    if failures.len() == 1 {
        if let Some(err) = failures.pop() {
            return Err(err);
        }
    }
    if !failures.is_empty() {
        return Err(CompileError::Batch(failures));
    }

    tracing::info!(
        library = library_id,
        schemas = compiled.len(),
        skipped = skipped.len(),
        warnings = diagnostics.warning_count(),
        "assembled library"
    );
    Ok(CompiledLibrary {
        document: assemble_library(library_id, compiled),
        diagnostics,
        skipped,
    })
}
