//! Slot compilation.

use kairos_sdf::{vocab, CanonicalSlot, Slot, SlotRole};

use crate::context::SchemaContext;
use crate::error::{CompileError, Violation};
use crate::identifier::{slot_name, SlotIds, SlotTicket};
use crate::report::{SOURCE_ENTITY, SOURCE_REFVAR, SOURCE_ROLE};

/// The container a slot belongs to.
#[derive(Debug, Clone, Copy)]
pub enum SlotOwner<'a> {
    /// A step; roles resolve below the step's event type IRI.
    Step {
        /// Authored step id.
        step_id: &'a str,
        /// Resolved event type IRI of the step.
        type_iri: &'a str,
    },
    /// The schema itself; roles resolve below the schema id.
    Schema,
}

impl SlotOwner<'_> {
    fn describe(&self) -> String {
        match self {
            SlotOwner::Step { step_id, .. } => format!("step '{step_id}'"),
            SlotOwner::Schema => "schema slots".to_owned(),
        }
    }
}

/// A compiled slot whose id is not final yet.
#[derive(Debug, Clone)]
pub struct DraftSlot {
    ticket: SlotTicket,
    role: SlotRole,
    entity_types: Option<Vec<String>>,
    reference: Option<String>,
    refvar: Option<String>,
    comment: Option<String>,
}

impl DraftSlot {
    /// Reserved name of this slot.
    #[must_use]
    pub fn ticket(&self) -> &SlotTicket {
        &self.ticket
    }

    /// Assigns the final id.
    #[must_use]
    pub fn finalize(self, ids: &SlotIds) -> CanonicalSlot {
        CanonicalSlot {
            name: self.ticket.name().to_owned(),
            id: ids.resolve(&self.ticket),
            role: self.role,
            entity_types: self.entity_types,
            reference: self.reference,
            refvar: self.refvar,
            comment: self.comment,
        }
    }
}

/// Compiles the `index`-th slot of its container.
///
/// `shared` tells whether another slot of the same container has the same
/// role. Ontology misses are recorded as warnings on `ctx`.
///
/// # Errors
///
/// Returns [`CompileError::Rejected`] if the role is empty.
pub fn compile_slot(
    ctx: &mut SchemaContext<'_>,
    slot: &Slot,
    owner: SlotOwner<'_>,
    index: usize,
    shared: bool,
) -> Result<DraftSlot, CompileError> {
    let schema_id = ctx.schema_id();
    let name = slot_name(&slot.role, slot.refvar.as_deref(), shared).ok_or_else(|| {
        let step = match owner {
            SlotOwner::Step { step_id, .. } => Some(step_id.to_owned()),
            SlotOwner::Schema => None,
        };
        CompileError::Rejected {
            schema_id: schema_id.to_owned(),
            violations: vec![Violation::EmptyRole { step, index }],
        }
    })?;
    let ticket = ctx.ids.reserve(&name);

    let owner_type = match owner {
        SlotOwner::Step { type_iri, .. } => type_iri,
        SlotOwner::Schema => schema_id,
    };
    if let Some(event) = ctx.ontology().lookup_event(vocab::qualified_type(owner_type)) {
        if !event.has_role(&slot.role) {
            let message = format!(
                "Role '{}' in {} is not valid for event '{}'",
                slot.role,
                owner.describe(),
                event.type_
            );
            ctx.warn(SOURCE_ROLE, message);
        }
    }
    let role_iri = vocab::role_iri(owner_type, &slot.role);
    let role = match owner {
        SlotOwner::Step { .. } => SlotRole::Participant(role_iri),
        SlotOwner::Schema => SlotRole::Schema(role_iri),
    };

    let constraints = slot.constraints.as_deref().unwrap_or_default();
    for entity in constraints {
        if !ctx.ontology().lookup_entity(entity) {
            let message = format!(
                "Entity '{entity}' on role '{}' in {} not in ontology",
                slot.role,
                owner.describe()
            );
            ctx.warn(SOURCE_ENTITY, message);
        }
    }
    let entity_types = (!constraints.is_empty())
        .then(|| constraints.iter().map(|e| vocab::entity_iri(e)).collect());

    if slot.refvar.is_none() {
        let message = format!("Slot '{}' in {} misses refvar", slot.role, owner.describe());
        ctx.warn(SOURCE_REFVAR, message);
    }

    Ok(DraftSlot {
        ticket,
        role,
        entity_types,
        reference: slot.reference.clone(),
        refvar: slot.refvar.clone(),
        comment: slot.comment.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Severity;
    use kairos_sdf::{OntologyDocument, OntologyStore};

    const STEP_TYPE: &str = "kairos:Primitives/Events/Transaction.ExchangeBuySell.Unspecified";

    fn ontology() -> OntologyStore {
        let doc: OntologyDocument = serde_json::from_value(serde_json::json!({
            "events": {
                "Transaction.ExchangeBuySell.Unspecified": {
                    "id": "LDC_ev_140",
                    "type": "Transaction.ExchangeBuySell.Unspecified",
                    "args": {
                        "Giver": {"position": "arg1", "label": "Giver", "constraints": ["PER"]}
                    }
                }
            },
            "entities": {"PER": {"id": "LDC_ent_1", "type": "PER"}}
        }))
        .unwrap();
        OntologyStore::from_document(doc)
    }

    fn slot(role: &str, refvar: Option<&str>, constraints: &[&str]) -> Slot {
        Slot {
            role: role.into(),
            refvar: refvar.map(Into::into),
            constraints: (!constraints.is_empty())
                .then(|| constraints.iter().map(|c| c.to_string()).collect()),
            reference: Some("wiki:Q1".into()),
            comment: None,
        }
    }

    fn step_owner() -> SlotOwner<'static> {
        SlotOwner::Step {
            step_id: "buy",
            type_iri: STEP_TYPE,
        }
    }

    #[test]
    fn resolves_role_below_step_type() {
        let store = ontology();
        let mut ctx = SchemaContext::new("cmu:X", &store);
        let draft = compile_slot(&mut ctx, &slot("Giver", Some("x1"), &["PER"]), step_owner(), 0, false)
            .unwrap();
        let (ids, diagnostics) = ctx.finish();
        let canonical = draft.finalize(&ids);
        assert_eq!(canonical.name, "giver");
        assert_eq!(canonical.id, "cmu:X/Slots/giver");
        assert_eq!(canonical.role, SlotRole::Participant(format!("{STEP_TYPE}/Slots/Giver")));
        assert_eq!(
            canonical.entity_types,
            Some(vec!["kairos:Primitives/Entities/PER".to_owned()])
        );
        assert_eq!(canonical.reference.as_deref(), Some("wiki:Q1"));
        assert_eq!(canonical.refvar.as_deref(), Some("x1"));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn warns_on_unknown_role_and_entity_but_still_emits() {
        let store = ontology();
        let mut ctx = SchemaContext::new("cmu:X", &store);
        let draft = compile_slot(&mut ctx, &slot("Thief", Some("t"), &["WEA"]), step_owner(), 0, false)
            .unwrap();
        assert_eq!(ctx.diagnostics().from_source(SOURCE_ROLE).count(), 1);
        assert_eq!(ctx.diagnostics().from_source(SOURCE_ENTITY).count(), 1);
        let (ids, _) = ctx.finish();
        let canonical = draft.finalize(&ids);
        assert_eq!(
            canonical.entity_types,
            Some(vec!["kairos:Primitives/Entities/WEA".to_owned()])
        );
    }

    #[test]
    fn missing_refvar_is_a_warning() {
        let store = ontology();
        let mut ctx = SchemaContext::new("cmu:X", &store);
        let draft = compile_slot(&mut ctx, &slot("Giver", None, &[]), step_owner(), 0, false).unwrap();
        let warnings: Vec<_> = ctx.diagnostics().from_source(SOURCE_REFVAR).collect();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].severity, Severity::Warning);
        let (ids, _) = ctx.finish();
        let canonical = draft.finalize(&ids);
        assert_eq!(canonical.refvar, None);
        assert_eq!(canonical.entity_types, None);
    }

    #[test]
    fn schema_slots_use_role_name_below_schema_id() {
        let store = ontology();
        let mut ctx = SchemaContext::new("cmu:X", &store);
        let draft = compile_slot(&mut ctx, &slot("Buyer", Some("b"), &[]), SlotOwner::Schema, 0, false)
            .unwrap();
        let (ids, diagnostics) = ctx.finish();
        assert_eq!(
            draft.finalize(&ids).role,
            SlotRole::Schema("cmu:X/Slots/Buyer".to_owned())
        );
        assert_eq!(diagnostics.from_source(SOURCE_ROLE).count(), 0);
    }

    #[test]
    fn shared_role_name_carries_refvar() {
        let store = ontology();
        let mut ctx = SchemaContext::new("cmu:X", &store);
        let draft = compile_slot(&mut ctx, &slot("Giver", Some("x2"), &[]), step_owner(), 1, true)
            .unwrap();
        assert_eq!(draft.ticket().name(), "giver-x2");
    }

    #[test]
    fn empty_role_is_rejected() {
        let store = ontology();
        let mut ctx = SchemaContext::new("cmu:X", &store);
        let err = compile_slot(&mut ctx, &slot(" ", Some("x"), &[]), step_owner(), 3, false)
            .unwrap_err();
        assert_eq!(
            err.violations()[0].1,
            &Violation::EmptyRole {
                step: Some("buy".into()),
                index: 3
            }
        );
    }
}
