//! Schema assembly.
//!
//! [`SchemaCompiler::compile`] drives one authored schema through the whole
//! pipeline:
//!
//! 1. structural checks (duplicate step ids, empty roles, dangling order
//!    references), all collected before rejecting;
//! 2. steps in declaration order, then schema-level slots;
//! 3. identifier cleanup across every slot of the schema;
//! 4. order resolution;
//! 5. coreference resolution according to [`CorefMode`](crate::CorefMode).

use std::collections::HashSet;

use kairos_sdf::{vocab, AuthoredSchema, CanonicalSchema, CanonicalSlot, OntologyStore};

use crate::context::SchemaContext;
use crate::coref::{entity_relations, EntityMap};
use crate::error::{CompileError, Violation};
use crate::identifier::{base_name, is_shared};
use crate::options::CompileOptions;
use crate::order::{compile_order, missing_step_refs, StepIndex};
use crate::report::Diagnostics;
use crate::slot::{compile_slot, SlotOwner};
use crate::step::{compile_step, positional_comment};

/// Header line of every schema comment.
pub const STEPS_HEADER: &str = "Steps:";

/// A compiled schema with everything learned while compiling it.
#[derive(Debug, Clone)]
pub struct CompiledSchema {
    /// The canonical record.
    pub schema: CanonicalSchema,
    /// Warnings raised for this schema.
    pub diagnostics: Diagnostics,
    /// Final slot id to entity tag, steps' slots first.
    pub entity_map: EntityMap,
}

/// Every structural violation of `schema`, in a stable order: duplicate step
/// ids, then empty roles, then undeclared order references.
#[must_use]
pub fn check_structure(schema: &AuthoredSchema) -> Vec<Violation> {
    let mut violations = Vec::new();

    let mut seen = HashSet::new();
    let mut duplicated = HashSet::new();
    for step in &schema.steps {
        if !seen.insert(step.id.as_str()) && duplicated.insert(step.id.as_str()) {
            violations.push(Violation::DuplicateStepId(step.id.clone()));
        }
    }

    for step in &schema.steps {
        for (index, slot) in step.slots.iter().enumerate() {
            if base_name(&slot.role).is_none() {
                violations.push(Violation::EmptyRole {
                    step: Some(step.id.clone()),
                    index,
                });
            }
        }
    }
    for (index, slot) in schema.slots.iter().enumerate() {
        if base_name(&slot.role).is_none() {
            violations.push(Violation::EmptyRole { step: None, index });
        }
    }

    violations.extend(
        missing_step_refs(&schema.order, |id| seen.contains(id))
            .into_iter()
            .map(|id| Violation::MissingOrderStep(id.to_owned())),
    );
    violations
}

/// Compiles authored schemas against one ontology.
#[derive(Debug, Clone, Copy)]
pub struct SchemaCompiler<'a> {
    ontology: &'a OntologyStore,
    options: &'a CompileOptions,
}

impl<'a> SchemaCompiler<'a> {
    /// Creates a compiler.
    #[must_use]
    pub fn new(ontology: &'a OntologyStore, options: &'a CompileOptions) -> Self {
        Self { ontology, options }
    }

    /// Options in effect.
    #[must_use]
    pub fn options(&self) -> &'a CompileOptions {
        self.options
    }

    /// Compiles one schema.
    ///
    /// Ontology misses and missing reference variables become warnings in the
    /// returned [`CompiledSchema::diagnostics`].
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::Rejected`] listing every structural violation
    /// found by [`check_structure`]. Nothing is emitted for a rejected schema.
    pub fn compile(&self, authored: &AuthoredSchema) -> Result<CompiledSchema, CompileError> {
        let schema_id = authored.schema_id.as_str();
        let violations = check_structure(authored);
        if !violations.is_empty() {
            for violation in &violations {
                tracing::error!(schema = schema_id, "{violation}");
            }
            return Err(CompileError::Rejected {
                schema_id: schema_id.to_owned(),
                violations,
            });
        }
        tracing::info!(
            schema = schema_id,
            steps = authored.steps.len(),
            slots = authored.slots.len(),
            "compiling schema"
        );

        let mut ctx = SchemaContext::new(schema_id, self.ontology);
        let mut comment = Vec::with_capacity(authored.steps.len() + 1);
        comment.push(STEPS_HEADER.to_owned());
        let mut index = StepIndex::new();
        let mut draft_steps = Vec::with_capacity(authored.steps.len());
        for (offset, step) in authored.steps.iter().enumerate() {
            let position = offset + 1;
            let positional = positional_comment(position, &step.id);
            let draft = compile_step(&mut ctx, step, position, &positional)?;
            index.insert(step.id.as_str(), draft.id(), position);
            comment.push(positional);
            draft_steps.push(draft);
        }

        let draft_slots = authored
            .slots
            .iter()
            .enumerate()
            .map(|(i, slot)| {
                let shared = is_shared(&slot.role, &authored.slots);
                compile_slot(&mut ctx, slot, SlotOwner::Schema, i, shared)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let (ids, diagnostics) = ctx.finish();
        let mut steps: Vec<_> = draft_steps.into_iter().map(|s| s.finalize(&ids)).collect();
        let mut slots: Vec<_> = draft_slots.into_iter().map(|s| s.finalize(&ids)).collect();

        let order = compile_order(schema_id, &authored.order, &index)?;

        let mut entity_map = EntityMap::new();
        for slot in steps.iter().flat_map(|s| s.participants.iter()).chain(slots.iter()) {
            entity_map.record(slot.id.as_str(), slot.refvar.as_deref());
        }
        let coref = self.options.coref_mode;
        let relations = if coref.emits_relations() {
            entity_relations(&entity_map)
        } else {
            Vec::new()
        };
        if !coref.emits_refvar() {
            steps
                .iter_mut()
                .flat_map(|s| s.participants.iter_mut())
                .chain(slots.iter_mut())
                .for_each(strip_refvar);
        }

        Ok(CompiledSchema {
            schema: CanonicalSchema {
                id: authored.schema_id.clone(),
                comment,
                super_: vocab::SUPER_EVENT.to_owned(),
                name: authored.schema_name.clone(),
                description: authored.schema_dscpt.clone(),
                version: authored.schema_version.clone(),
                slots,
                steps,
                order,
                entity_relations: relations,
            },
            diagnostics,
            entity_map,
        })
    }
}

fn strip_refvar(slot: &mut CanonicalSlot) {
    slot.refvar = None;
}
