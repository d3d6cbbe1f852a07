//! Raw-versus-typed round-trip check.
//!
//! Every typed [`AuthoredSchema`] is converted back into a YAML value and
//! compared with the raw record it was parsed from. Mapping comparison is
//! order-insensitive; absent optionals are omitted on both sides. A mismatch
//! means the typed model dropped or rewrote something the author wrote.

use kairos_sdf::AuthoredSchema;
use serde_yaml::Value;
use thiserror::Error;

/// One record whose typed form differs from its raw form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    /// 0-based index of the record in the concatenated input.
    pub index: usize,
    /// `schema_id` of the typed record.
    pub schema_id: String,
}

/// Round-trip failures.
#[derive(Debug, Error)]
pub enum RoundTripError {
    /// The number of typed records differs from the number of raw records.
    #[error("parsed {parsed} schema(s) from {raw} raw record(s)")]
    CountMismatch {
        /// Raw record count.
        raw: usize,
        /// Typed record count.
        parsed: usize,
    },
    /// A typed record could not be converted back to YAML.
    #[error("schema #{index} could not be re-serialized: {source}")]
    Serialize {
        /// Record index.
        index: usize,
        /// Underlying error.
        source: serde_yaml::Error,
    },
    /// Records whose typed form differs from the raw input.
    #[error(
        "the parsed and raw schemas do not match ({}); the input might contain misordered or \
         mistyped fields",
        render(.0)
    )]
    Mismatched(Vec<Mismatch>),
}

fn render(mismatches: &[Mismatch]) -> String {
    mismatches
        .iter()
        .map(|m| format!("#{} {}", m.index, m.schema_id))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Compares every raw record with its typed counterpart.
///
/// # Errors
///
/// Returns [`RoundTripError::Mismatched`] naming every record that differs,
/// [`RoundTripError::CountMismatch`] if the slices have different lengths, or
/// [`RoundTripError::Serialize`] if a typed record cannot be converted back.
pub fn check_round_trip(raw: &[Value], parsed: &[AuthoredSchema]) -> Result<(), RoundTripError> {
    if raw.len() != parsed.len() {
        return Err(RoundTripError::CountMismatch {
            raw: raw.len(),
            parsed: parsed.len(),
        });
    }
    let mut mismatches = Vec::new();
    for (index, (record, schema)) in raw.iter().zip(parsed).enumerate() {
        let typed = schema
            .to_record()
            .map_err(|source| RoundTripError::Serialize { index, source })?;
        if &typed != record {
            tracing::error!(index, schema = %schema.schema_id, "parsed record differs from raw input");
            mismatches.push(Mismatch {
                index,
                schema_id: schema.schema_id.clone(),
            });
        }
    }
    if mismatches.is_empty() {
        tracing::debug!(records = raw.len(), "round-trip check passed");
        Ok(())
    } else {
        Err(RoundTripError::Mismatched(mismatches))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kairos_sdf::authored::{from_records, load_records};

    const SCHEMAS: &str = r#"
- schema_id: cmu:A
  schema_name: A
  schema_dscpt: first
  schema_version: "1"
  slots: []
  steps:
    - id: go
      primitive: Movement
      slots:
        - role: Transporter
          refvar: p
          constraints: [PER]
  order:
    - overlaps: [go]
      comment: alone
- schema_id: cmu:B
  schema_name: B
  schema_dscpt: second
  schema_version: "1"
  slots: []
  steps: []
  order: []
"#;

    #[test]
    fn faithful_records_pass() {
        let raw = load_records(SCHEMAS).unwrap();
        let parsed = from_records(&raw).unwrap();
        check_round_trip(&raw, &parsed).unwrap();
    }

    #[test]
    fn key_order_is_irrelevant() {
        let yaml = r#"
- order: []
  steps: []
  slots: []
  schema_version: "1"
  schema_dscpt: reordered
  schema_name: R
  schema_id: cmu:R
"#;
        let raw = load_records(yaml).unwrap();
        let parsed = from_records(&raw).unwrap();
        check_round_trip(&raw, &parsed).unwrap();
    }

    #[test]
    fn rewritten_records_are_named() {
        let raw = load_records(SCHEMAS).unwrap();
        let mut parsed = from_records(&raw).unwrap();
        parsed[1].schema_dscpt = "changed".into();
        let err = check_round_trip(&raw, &parsed).unwrap_err();
        match &err {
            RoundTripError::Mismatched(mismatches) => assert_eq!(
                mismatches,
                &vec![Mismatch {
                    index: 1,
                    schema_id: "cmu:B".into()
                }]
            ),
            other => unreachable!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains("#1 cmu:B"));
    }

    #[test]
    fn explicit_nulls_do_not_survive() {
        let yaml = r#"
- schema_id: cmu:N
  schema_name: N
  schema_dscpt: null comment
  schema_version: "1"
  comment: null
  slots: []
  steps: []
  order: []
"#;
        let raw = load_records(yaml).unwrap();
        let parsed = from_records(&raw).unwrap();
        assert!(matches!(
            check_round_trip(&raw, &parsed),
            Err(RoundTripError::Mismatched(_))
        ));
    }

    #[test]
    fn counts_must_agree() {
        let raw = load_records(SCHEMAS).unwrap();
        let parsed = from_records(&raw).unwrap();
        assert!(matches!(
            check_round_trip(&raw, &parsed[..1]),
            Err(RoundTripError::CountMismatch { raw: 2, parsed: 1 })
        ));
    }
}
