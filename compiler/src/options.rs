//! Compiler configuration.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How coreference between slots is represented in the output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CorefMode {
    /// Bare `refvar` tags on slots; `entityRelations` stays empty.
    #[default]
    Refvar,
    /// Explicit `sameAs` entity relations; slots carry no tag.
    EntityRelations,
    /// Both representations.
    Both,
}

impl CorefMode {
    /// Whether slots keep their `refvar` tag.
    #[must_use]
    pub fn emits_refvar(self) -> bool {
        matches!(self, CorefMode::Refvar | CorefMode::Both)
    }

    /// Whether `entityRelations` is populated.
    #[must_use]
    pub fn emits_relations(self) -> bool {
        matches!(self, CorefMode::EntityRelations | CorefMode::Both)
    }
}

/// What happens to the rest of a batch when one schema is rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BatchPolicy {
    /// Attempt every schema, then fail the run if any was rejected.
    #[default]
    AbortRun,
    /// Log rejected schemas and leave them out of the library.
    SkipSchema,
}

/// Unrecognized option value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}' (expected one of: {expected})")]
pub struct UnknownOption {
    kind: &'static str,
    value: String,
    expected: &'static str,
}

impl FromStr for CorefMode {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "refvar" => Ok(CorefMode::Refvar),
            "entity-relations" => Ok(CorefMode::EntityRelations),
            "both" => Ok(CorefMode::Both),
            _ => Err(UnknownOption {
                kind: "coreference mode",
                value: s.to_owned(),
                expected: "refvar, entity-relations, both",
            }),
        }
    }
}

impl FromStr for BatchPolicy {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "abort-run" => Ok(BatchPolicy::AbortRun),
            "skip-schema" => Ok(BatchPolicy::SkipSchema),
            _ => Err(UnknownOption {
                kind: "batch policy",
                value: s.to_owned(),
                expected: "abort-run, skip-schema",
            }),
        }
    }
}

/// Options controlling one compilation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompileOptions {
    /// Coreference output shape.
    pub coref_mode: CorefMode,
    /// Failure propagation across a batch.
    pub batch_policy: BatchPolicy,
    /// Compare re-serialized input records against the raw input before compiling.
    pub round_trip_check: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            coref_mode: CorefMode::default(),
            batch_policy: BatchPolicy::default(),
            round_trip_check: true,
        }
    }
}
