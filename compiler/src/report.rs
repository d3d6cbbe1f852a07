//! Compilation diagnostics: severity levels, entries, and report aggregation.
//!
//! Warnings never stop compilation. They are logged through `tracing` as they
//! are raised and accumulated here so callers can summarize them afterwards.

use std::fmt;

/// Diagnostic source: event type missing from the ontology.
pub const SOURCE_EVENT: &str = "ontology/event";
/// Diagnostic source: role not permitted for its event type.
pub const SOURCE_ROLE: &str = "ontology/role";
/// Diagnostic source: entity constraint missing from the ontology.
pub const SOURCE_ENTITY: &str = "ontology/entity";
/// Diagnostic source: slot without a reference variable.
pub const SOURCE_REFVAR: &str = "coref/refvar";
/// Diagnostic source: schema rejected under the skip-schema batch policy.
pub const SOURCE_SCHEMA: &str = "schema/rejected";

/// Severity level of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Non-blocking finding.
    Warning,
    /// A schema was rejected.
    Error,
}

impl Severity {
    /// Upper-case label used when printing reports.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Severity::Warning => "WARN",
            Severity::Error => "ERROR",
        }
    }
}

/// A single diagnostic raised while compiling one schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Short identifier of the check that produced this entry.
    pub source: &'static str,
    /// Schema the entry belongs to.
    pub schema: String,
    /// Human-readable message naming the offending step, role, type, or entity.
    pub message: String,
    /// Severity of the entry.
    pub severity: Severity,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} ({}): {}",
            self.severity.label(),
            self.source,
            self.schema,
            self.message
        )
    }
}

/// Aggregated diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    /// All entries in the order they were raised.
    pub entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Creates an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a warning and logs it.
    pub fn warn(&mut self, source: &'static str, schema: &str, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(source, schema, "{message}");
        self.entries.push(Diagnostic {
            source,
            schema: schema.to_owned(),
            message,
            severity: Severity::Warning,
        });
    }

    /// Records an error and logs it.
    pub fn error(&mut self, source: &'static str, schema: &str, message: impl Into<String>) {
        let message = message.into();
        tracing::error!(source, schema, "{message}");
        self.entries.push(Diagnostic {
            source,
            schema: schema.to_owned(),
            message,
            severity: Severity::Error,
        });
    }

    /// Appends all entries of another report.
    pub fn extend(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    /// Entries produced by `source`.
    pub fn from_source<'a>(&'a self, source: &'a str) -> impl Iterator<Item = &'a Diagnostic> {
        self.entries.iter().filter(move |d| d.source == source)
    }

    /// Number of warnings.
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    /// Number of errors.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    /// Returns true if nothing was reported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
