//! Step compilation.

use kairos_sdf::{vocab, CanonicalStep, Step};

use crate::context::SchemaContext;
use crate::error::CompileError;
use crate::identifier::{is_shared, step_iri, SlotIds};
use crate::report::SOURCE_EVENT;
use crate::slot::{compile_slot, DraftSlot, SlotOwner};

/// Pads a dotted primitive with `Unspecified` segments up to `Type.Subtype.Sub-subtype`.
///
/// Primitives that already have three or more segments pass through unchanged.
#[must_use]
pub fn qualify_primitive(primitive: &str) -> String {
    let mut segments: Vec<&str> = primitive.split('.').collect();
    while segments.len() < vocab::QUALIFIED_TYPE_SEGMENTS {
        segments.push(vocab::UNSPECIFIED);
    }
    segments.join(".")
}

/// Positional comment of a step: `"{position}. {id with dashes as spaces}"`.
#[must_use]
pub fn positional_comment(position: usize, step_id: &str) -> String {
    format!("{position}. {}", step_id.replace('-', " "))
}

/// A compiled step whose participant ids are not final yet.
#[derive(Debug, Clone)]
pub struct DraftStep {
    id: String,
    name: String,
    type_iri: String,
    comment: String,
    participants: Vec<DraftSlot>,
}

impl DraftStep {
    /// Step IRI.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Assigns final participant ids.
    #[must_use]
    pub fn finalize(self, ids: &SlotIds) -> CanonicalStep {
        CanonicalStep {
            id: self.id,
            name: self.name,
            type_: self.type_iri,
            comment: self.comment,
            participants: self
                .participants
                .into_iter()
                .map(|slot| slot.finalize(ids))
                .collect(),
        }
    }
}

/// Compiles the step at 1-based `position`.
///
/// `positional` is the step's line from the schema comment; the author's own
/// comment is appended below it.
///
/// # Errors
///
/// Returns [`CompileError::Rejected`] if one of the step's slots has an empty role.
pub fn compile_step(
    ctx: &mut SchemaContext<'_>,
    step: &Step,
    position: usize,
    positional: &str,
) -> Result<DraftStep, CompileError> {
    let qualified = qualify_primitive(&step.primitive);
    if ctx.ontology().lookup_event(&qualified).is_none() {
        let message = format!(
            "Primitive '{}' in step '{}' not in ontology",
            step.primitive, step.id
        );
        ctx.warn(SOURCE_EVENT, message);
    }
    let type_iri = vocab::event_iri(&qualified);
    tracing::debug!(schema = ctx.schema_id(), step = %step.id, %type_iri, position, "compiling step");

    let owner = SlotOwner::Step {
        step_id: &step.id,
        type_iri: &type_iri,
    };
    let participants = step
        .slots
        .iter()
        .enumerate()
        .map(|(index, slot)| {
            let shared = is_shared(&slot.role, &step.slots);
            compile_slot(ctx, slot, owner, index, shared)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let comment = match &step.comment {
        Some(own) => format!("{positional}\n{own}"),
        None => positional.to_owned(),
    };

    Ok(DraftStep {
        id: step_iri(ctx.schema_id(), &step.id),
        name: step.id.clone(),
        type_iri,
        comment,
        participants,
    })
}
