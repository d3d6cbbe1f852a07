//! Property-based tests for slot identifier synthesis.
//!
//! Schemas are generated from a small pool of roles and reference variables
//! so that shared roles and cross-step name collisions are common.

use std::collections::{BTreeMap, HashSet};

use kairos_sdf::serializer::jsonld::to_json_ld;
use kairos_sdf::{AuthoredSchema, OntologyStore, Slot, Step};
use kairos_sdf_compiler::identifier::{disambiguator, is_shared, slot_name};
use kairos_sdf_compiler::{compile_library, CompileOptions, CorefMode, SchemaCompiler};
use proptest::prelude::*;

const ROLES: &[&str] = &["Giver", "Recipient", "Place", "AttackerGroup", "Attacker"];
const REFVARS: &[&str] = &["x1", "x2", "x3"];

fn arb_slot() -> impl Strategy<Value = Slot> {
    (
        prop::sample::select(ROLES),
        prop::option::of(prop::sample::select(REFVARS)),
    )
        .prop_map(|(role, refvar)| Slot {
            role: role.to_owned(),
            refvar: refvar.map(str::to_owned),
            constraints: None,
            reference: None,
            comment: None,
        })
}

fn arb_schema() -> impl Strategy<Value = AuthoredSchema> {
    (
        prop::collection::vec(prop::collection::vec(arb_slot(), 0..6), 0..5),
        prop::collection::vec(arb_slot(), 0..4),
    )
        .prop_map(|(steps, slots)| AuthoredSchema {
            schema_id: "cmu:Generated".to_owned(),
            schema_name: "Generated".to_owned(),
            schema_dscpt: String::new(),
            schema_version: "1".to_owned(),
            slots,
            steps: steps
                .into_iter()
                .enumerate()
                .map(|(i, slots)| Step {
                    id: format!("step-{i}"),
                    primitive: "Transaction.ExchangeBuySell".to_owned(),
                    comment: None,
                    slots,
                })
                .collect(),
            order: Vec::new(),
            comment: None,
        })
}

/// Expected slot names, steps' slots first, then schema slots.
fn expected_names(schema: &AuthoredSchema) -> Vec<String> {
    let containers = schema
        .steps
        .iter()
        .map(|step| step.slots.as_slice())
        .chain(std::iter::once(schema.slots.as_slice()));
    let mut names = Vec::new();
    for container in containers {
        for slot in container {
            let shared = is_shared(&slot.role, container);
            if let Some(name) = slot_name(&slot.role, slot.refvar.as_deref(), shared) {
                names.push(name);
            }
        }
    }
    names
}

proptest! {
    /// Compiling the same schema twice yields byte-identical output.
    #[test]
    fn prop_compilation_is_deterministic(schema in arb_schema()) {
        let ontology = OntologyStore::default();
        let options = CompileOptions { coref_mode: CorefMode::Both, ..CompileOptions::default() };
        let batch = [schema];
        let first = compile_library(&ontology, &options, "lib", &batch).unwrap();
        let second = compile_library(&ontology, &options, "lib", &batch).unwrap();
        prop_assert_eq!(
            to_json_ld(&first.document).unwrap(),
            to_json_ld(&second.document).unwrap()
        );
    }

    /// No two slots of a schema share an id.
    #[test]
    fn prop_slot_ids_are_unique(schema in arb_schema()) {
        let ontology = OntologyStore::default();
        let options = CompileOptions::default();
        let compiled = SchemaCompiler::new(&ontology, &options).compile(&schema).unwrap();
        let ids: Vec<&str> = compiled.schema.all_slots().map(|s| s.id.as_str()).collect();
        let unique: HashSet<&str> = ids.iter().copied().collect();
        prop_assert_eq!(unique.len(), ids.len());
    }

    /// Names used once are bare; repeated names get `a`, `b`, … in declaration order.
    #[test]
    fn prop_disambiguators_are_minimal(schema in arb_schema()) {
        let ontology = OntologyStore::default();
        let options = CompileOptions::default();
        let compiled = SchemaCompiler::new(&ontology, &options).compile(&schema).unwrap();

        let names = expected_names(&schema);
        let mut totals: BTreeMap<&str, usize> = BTreeMap::new();
        for name in &names {
            *totals.entry(name.as_str()).or_insert(0) += 1;
        }
        let mut seen: BTreeMap<&str, usize> = BTreeMap::new();
        let ids: Vec<&str> = compiled.schema.all_slots().map(|s| s.id.as_str()).collect();
        prop_assert_eq!(ids.len(), names.len());
        for (name, id) in names.iter().zip(ids) {
            let ordinal = seen.entry(name.as_str()).or_insert(0);
            let expected = if totals[name.as_str()] == 1 {
                format!("cmu:Generated/Slots/{name}")
            } else {
                format!("cmu:Generated/Slots/{name}-{}", disambiguator(*ordinal))
            };
            *ordinal += 1;
            prop_assert_eq!(id, expected.as_str());
        }
    }
}
