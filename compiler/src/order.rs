//! Temporal order compilation.
//!
//! Runs in two phases. Validation collects every step id referenced by any
//! relation and rejects the schema if one is not declared, naming all missing
//! ids at once. Resolution then rewrites each relation's endpoints to
//! canonical step IRIs and summarizes it with 1-based step positions.

use std::collections::{BTreeSet, HashMap};

use kairos_sdf::authored::{Containment, Overlap, Precedence};
use kairos_sdf::{CanonicalOrder, OrderRelation};

use crate::error::{CompileError, Violation};

/// Canonical IRI and 1-based position of a compiled step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRef {
    /// Step IRI.
    pub iri: String,
    /// 1-based position in declaration order.
    pub position: usize,
}

/// Lookup from authored step id to its compiled reference.
#[derive(Debug, Clone, Default)]
pub struct StepIndex {
    steps: HashMap<String, StepRef>,
}

impl StepIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a compiled step.
    pub fn insert(&mut self, step_id: impl Into<String>, iri: impl Into<String>, position: usize) {
        self.steps.insert(
            step_id.into(),
            StepRef {
                iri: iri.into(),
                position,
            },
        );
    }

    /// Looks up a step by authored id.
    #[must_use]
    pub fn get(&self, step_id: &str) -> Option<&StepRef> {
        self.steps.get(step_id)
    }

    /// Returns true if `step_id` is registered.
    #[must_use]
    pub fn contains(&self, step_id: &str) -> bool {
        self.steps.contains_key(step_id)
    }
}

/// Step ids referenced by `order` but not declared, sorted and deduplicated.
#[must_use]
pub fn missing_step_refs<'o>(
    order: &'o [OrderRelation],
    declared: impl Fn(&str) -> bool,
) -> Vec<&'o str> {
    order
        .iter()
        .flat_map(OrderRelation::step_refs)
        .filter(|id| !declared(*id))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Validates and resolves every relation of one schema.
///
/// # Errors
///
/// Returns [`CompileError::Rejected`] listing every referenced step id that
/// is absent from `index`. No relation is emitted in that case.
pub fn compile_order(
    schema_id: &str,
    order: &[OrderRelation],
    index: &StepIndex,
) -> Result<Vec<CanonicalOrder>, CompileError> {
    let missing = missing_step_refs(order, |id| index.contains(id));
    if !missing.is_empty() {
        for id in &missing {
            tracing::error!(schema = schema_id, step = id, "The ID '{id}' in `order` is not in `steps`");
        }
        return Err(CompileError::Rejected {
            schema_id: schema_id.to_owned(),
            violations: missing
                .into_iter()
                .map(|id| Violation::MissingOrderStep(id.to_owned()))
                .collect(),
        });
    }

    let base = format!("{schema_id}/Order/");
    order
        .iter()
        .map(|relation| resolve(schema_id, &base, relation, index))
        .collect()
}

/// Resolves one relation. Fails with the first endpoint absent from `index`.
fn resolve(
    schema_id: &str,
    base: &str,
    relation: &OrderRelation,
    index: &StepIndex,
) -> Result<CanonicalOrder, CompileError> {
    let step = |id: &str| lookup(schema_id, index, id);
    let order = match relation {
        OrderRelation::Precedence(Precedence { before, after, .. }) => {
            let (before, after) = (step(before)?, step(after)?);
            CanonicalOrder::Precedence {
                id: order_iri(base, "precede", &[before.position, after.position]),
                comment: format!("{} precedes {}", before.position, after.position),
                before: before.iri.clone(),
                after: after.iri.clone(),
            }
        }
        OrderRelation::Containment(Containment {
            container,
            contained,
            ..
        }) => {
            let (container, contained) = (step(container)?, step(contained)?);
            CanonicalOrder::Containment {
                id: order_iri(base, "contain", &[container.position, contained.position]),
                comment: format!("{} contains {}", container.position, contained.position),
                container: container.iri.clone(),
                contained: contained.iri.clone(),
            }
        }
        OrderRelation::Overlap(Overlap { overlaps, .. }) => {
            let refs = overlaps
                .iter()
                .map(|id| step(id))
                .collect::<Result<Vec<_>, _>>()?;
            let positions: Vec<usize> = refs.iter().map(|r| r.position).collect();
            let listed = positions
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            let comment = if listed.is_empty() {
                "overlaps".to_owned()
            } else {
                format!("{listed} overlaps")
            };
            CanonicalOrder::Overlap {
                id: order_iri(base, "overlap", &positions),
                comment,
                overlaps: refs.into_iter().map(|r| r.iri.clone()).collect(),
            }
        }
    };
    Ok(order)
}

fn lookup<'i>(
    schema_id: &str,
    index: &'i StepIndex,
    id: &str,
) -> Result<&'i StepRef, CompileError> {
    index.get(id).ok_or_else(|| CompileError::Rejected {
        schema_id: schema_id.to_owned(),
        violations: vec![Violation::MissingOrderStep(id.to_owned())],
    })
}

fn order_iri(base: &str, kind: &str, positions: &[usize]) -> String {
    let mut parts = vec![kind.to_owned()];
    parts.extend(positions.iter().map(ToString::to_string));
    format!("{base}{}", parts.join("-"))
}
