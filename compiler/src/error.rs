//! Fatal compilation errors.

use std::fmt;

use thiserror::Error;

/// One reason a schema was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// Two or more steps share this id.
    DuplicateStepId(String),
    /// A slot role is empty or whitespace-only.
    EmptyRole {
        /// Step id owning the slot, or `None` for a schema-level slot.
        step: Option<String>,
        /// 0-based position of the slot in its container.
        index: usize,
    },
    /// An order relation references a step id that is not declared.
    MissingOrderStep(String),
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::DuplicateStepId(id) => write!(f, "step id '{id}' is declared more than once"),
            Violation::EmptyRole {
                step: Some(step),
                index,
            } => write!(f, "slot #{index} of step '{step}' has an empty role"),
            Violation::EmptyRole { step: None, index } => {
                write!(f, "schema slot #{index} has an empty role")
            }
            Violation::MissingOrderStep(id) => {
                write!(f, "the ID '{id}' in `order` is not in `steps`")
            }
        }
    }
}

/// Errors that abort compilation.
#[derive(Debug, Error)]
pub enum CompileError {
    /// A schema failed structural validation; every violation is listed.
    #[error("schema '{schema_id}' rejected:\n{}", render(.violations))]
    Rejected {
        /// Id of the rejected schema.
        schema_id: String,
        /// Every violation found.
        violations: Vec<Violation>,
    },
    /// Several schemas of a batch were rejected.
    #[error("{} schema(s) rejected:\n{}", .0.len(), render(.0))]
    Batch(Vec<CompileError>),
}

impl CompileError {
    /// Flattens this error into `(schema_id, violation)` pairs.
    #[must_use]
    pub fn violations(&self) -> Vec<(&str, &Violation)> {
        match self {
            CompileError::Rejected {
                schema_id,
                violations,
            } => violations.iter().map(|v| (schema_id.as_str(), v)).collect(),
            CompileError::Batch(errors) => errors.iter().flat_map(|e| e.violations()).collect(),
        }
    }
}

fn render<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(|item| format!("  {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}
