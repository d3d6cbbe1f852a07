//! Authored YAML schema format.
//!
//! Schema authors write a YAML sequence of [`AuthoredSchema`] records. Every
//! record type is closed: unknown keys are rejected at parse time so that a
//! misspelled field never silently disappears from the compiled output.

use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use thiserror::Error;

/// Argument of a schema or of one of its steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Slot {
    /// Semantic role, e.g. `Giver`.
    pub role: String,
    /// Reference variable shared by every slot denoting the same entity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refvar: Option<String>,
    /// Coarse-grained entity types, e.g. `PER`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<Vec<String>>,
    /// External fine-grained entity type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Free-form author comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// One event step of a schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Step {
    /// Step identifier, unique within its schema.
    pub id: String,
    /// Dotted event type, e.g. `Transaction.ExchangeBuySell`.
    pub primitive: String,
    /// Free-form author comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Event arguments.
    pub slots: Vec<Slot>,
}

/// `before` happens earlier than `after`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Precedence {
    /// Free-form author comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Earlier step id.
    pub before: String,
    /// Later step id.
    pub after: String,
}

/// `container` temporally contains `contained`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Containment {
    /// Free-form author comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Containing step id.
    pub container: String,
    /// Contained step id.
    pub contained: String,
}

/// All listed steps overlap in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Overlap {
    /// Free-form author comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Overlapping step ids.
    pub overlaps: Vec<String>,
}

/// Temporal relation between steps, discriminated by its keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OrderRelation {
    /// `{before, after}`.
    Precedence(Precedence),
    /// `{container, contained}`.
    Containment(Containment),
    /// `{overlaps: [..]}`.
    Overlap(Overlap),
}

impl OrderRelation {
    /// Step ids referenced by this relation, in authored order.
    #[must_use]
    pub fn step_refs(&self) -> Vec<&str> {
        match self {
            OrderRelation::Precedence(p) => vec![p.before.as_str(), p.after.as_str()],
            OrderRelation::Containment(c) => vec![c.container.as_str(), c.contained.as_str()],
            OrderRelation::Overlap(o) => o.overlaps.iter().map(String::as_str).collect(),
        }
    }

    /// The author's comment on this relation, if any.
    #[must_use]
    pub fn comment(&self) -> Option<&str> {
        match self {
            OrderRelation::Precedence(p) => p.comment.as_deref(),
            OrderRelation::Containment(c) => c.comment.as_deref(),
            OrderRelation::Overlap(o) => o.comment.as_deref(),
        }
    }
}

/// A complex event schema as written by its author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthoredSchema {
    /// Schema IRI, e.g. `cmu:Heist`.
    pub schema_id: String,
    /// Human-readable label.
    pub schema_name: String,
    /// Description.
    pub schema_dscpt: String,
    /// Version string.
    pub schema_version: String,
    /// Schema-level arguments.
    pub slots: Vec<Slot>,
    /// Event steps in declaration order.
    pub steps: Vec<Step>,
    /// Temporal relations between steps.
    pub order: Vec<OrderRelation>,
    /// Free-form author comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl AuthoredSchema {
    /// Converts this schema back into a raw YAML record, omitting absent optionals.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization to a YAML value fails.
    pub fn to_record(&self) -> Result<Value, serde_yaml::Error> {
        serde_yaml::to_value(self)
    }
}

/// A single schema record that failed structural validation.
#[derive(Debug)]
pub struct RecordFailure {
    /// 0-based index of the record in the concatenated input.
    pub index: usize,
    /// `schema_id` of the record, when one could be read.
    pub schema_id: Option<String>,
    /// Underlying deserialization error.
    pub source: serde_yaml::Error,
}

impl std::fmt::Display for RecordFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.schema_id {
            Some(id) => write!(f, "schema #{} ({id}): {}", self.index, self.source),
            None => write!(f, "schema #{}: {}", self.index, self.source),
        }
    }
}

/// Errors raised while reading authored schemas.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The document is not valid YAML.
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// The document is valid YAML but not a sequence of records.
    #[error("expected a sequence of schema records, found {found}")]
    NotASequence {
        /// Kind of YAML node found instead.
        found: &'static str,
    },
    /// One or more records do not match the authored schema format.
    #[error("{} malformed schema record(s):\n{}", .0.len(), render_failures(.0))]
    Records(Vec<RecordFailure>),
}

fn render_failures(failures: &[RecordFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("  {f}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn node_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

/// Reads the raw schema records of one YAML document.
///
/// # Errors
///
/// Returns [`ParseError::Yaml`] on a syntax error and
/// [`ParseError::NotASequence`] if the top-level node is not a sequence.
pub fn load_records(yaml: &str) -> Result<Vec<Value>, ParseError> {
    match serde_yaml::from_str::<Value>(yaml)? {
        Value::Sequence(records) => Ok(records),
        other => Err(ParseError::NotASequence {
            found: node_kind(&other),
        }),
    }
}

/// Converts raw records into typed schemas.
///
/// Every record is attempted; all failures are reported together.
///
/// # Errors
///
/// Returns [`ParseError::Records`] listing every record that failed.
pub fn from_records(records: &[Value]) -> Result<Vec<AuthoredSchema>, ParseError> {
    let mut schemas = Vec::with_capacity(records.len());
    let mut failures = Vec::new();
    for (index, record) in records.iter().enumerate() {
        match serde_yaml::from_value::<AuthoredSchema>(record.clone()) {
            Ok(schema) => schemas.push(schema),
            Err(source) => {
                let schema_id = record
                    .get("schema_id")
                    .and_then(Value::as_str)
                    .map(str::to_owned);
                tracing::error!(index, schema = ?schema_id, %source, "malformed schema record");
                failures.push(RecordFailure {
                    index,
                    schema_id,
                    source,
                });
            }
        }
    }
    if failures.is_empty() {
        Ok(schemas)
    } else {
        Err(ParseError::Records(failures))
    }
}

/// Parses one YAML document containing a sequence of schemas.
///
/// # Errors
///
/// See [`load_records`] and [`from_records`].
pub fn parse_schemas(yaml: &str) -> Result<Vec<AuthoredSchema>, ParseError> {
    from_records(&load_records(yaml)?)
}
