//! Full YAML to library compilation.

use kairos_sdf::authored::parse_schemas;
use kairos_sdf::serializer::jsonld::to_json_ld;
use kairos_sdf::{OntologyDocument, OntologyStore};
use kairos_sdf_compiler::report::{SOURCE_ENTITY, SOURCE_EVENT, SOURCE_ROLE};
use kairos_sdf_compiler::{compile_library, CompileError, CompileOptions, CorefMode, Violation};

const PURCHASE: &str = r#"
- schema_id: cmu:Purchase
  schema_name: Purchase
  schema_dscpt: One party buys goods from another
  schema_version: "1.0"
  slots: []
  steps:
    - id: s1
      primitive: Transaction.ExchangeBuySell
      slots:
        - role: Giver
          refvar: x1
        - role: Recipient
          refvar: x2
    - id: s2
      primitive: Transaction.ExchangeBuySell
      slots:
        - role: Giver
          refvar: x2
  order:
    - before: s1
      after: s2
"#;

fn ontology() -> OntologyStore {
    let doc: OntologyDocument = serde_json::from_value(serde_json::json!({
        "events": {
            "Transaction.ExchangeBuySell.Unspecified": {
                "id": "LDC_ev_140",
                "type": "Transaction.ExchangeBuySell.Unspecified",
                "definition": "A buying and selling transaction",
                "args": {
                    "Giver": {"position": "arg1", "label": "Giver", "constraints": ["PER", "ORG"]},
                    "Recipient": {"position": "arg2", "label": "Recipient", "constraints": ["PER", "ORG"]},
                    "AcquiredEntity": {"position": "arg3", "label": "AcquiredEntity", "constraints": ["COM"]}
                }
            }
        },
        "entities": {
            "PER": {"id": 1, "type": "PER"},
            "ORG": {"id": 2, "type": "ORG"},
            "COM": {"id": 3, "type": "COM"}
        }
    }))
    .unwrap();
    OntologyStore::from_document(doc)
}

#[test]
fn purchase_scenario_carries_coreference_through() {
    let schemas = parse_schemas(PURCHASE).unwrap();
    let library = compile_library(&ontology(), &CompileOptions::default(), "purchases", &schemas)
        .unwrap();
    assert!(library.diagnostics.is_empty(), "{:?}", library.diagnostics);

    let schema = &library.document.schemas[0];
    assert_eq!(schema.steps.len(), 2);
    for step in &schema.steps {
        assert_eq!(
            step.type_,
            "kairos:Primitives/Events/Transaction.ExchangeBuySell.Unspecified"
        );
    }
    assert_eq!(schema.order.len(), 1);
    assert_eq!(schema.order[0].comment(), "1 precedes 2");
    assert_eq!(
        schema.order[0].endpoints(),
        vec!["cmu:Purchase/Steps/s1", "cmu:Purchase/Steps/s2"]
    );

    let recipient = &schema.steps[0].participants[1];
    let giver = &schema.steps[1].participants[0];
    assert_eq!(recipient.refvar.as_deref(), Some("x2"));
    assert_eq!(giver.refvar.as_deref(), Some("x2"));
    assert_eq!(recipient.id, "cmu:Purchase/Slots/recipient");
    assert_eq!(giver.id, "cmu:Purchase/Slots/giver-b");
    assert!(schema.entity_relations.is_empty());
}

#[test]
fn serialized_library_keeps_field_order() {
    let schemas = parse_schemas(PURCHASE).unwrap();
    let library = compile_library(&ontology(), &CompileOptions::default(), "purchases", &schemas)
        .unwrap();
    let json = to_json_ld(&library.document).unwrap();

    let keys = ["\"@context\"", "\"sdfVersion\"", "\"@id\": \"purchases\"", "\"schemas\""];
    let positions: Vec<usize> = keys.iter().map(|k| json.find(k).unwrap()).collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "{json}");

    let schema_keys = [
        "\"@id\": \"cmu:Purchase\"",
        "\"comment\"",
        "\"super\": \"kairos:Event\"",
        "\"name\": \"Purchase\"",
        "\"description\"",
        "\"version\"",
        "\"slots\"",
        "\"steps\"",
        "\"order\"",
        "\"entityRelations\"",
    ];
    let positions: Vec<usize> = schema_keys.iter().map(|k| json.find(k).unwrap()).collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "{json}");
    assert!(json.contains("\"role\": \"kairos:Primitives/Events/Transaction.ExchangeBuySell.Unspecified/Slots/Giver\""));

    let again = compile_library(&ontology(), &CompileOptions::default(), "purchases", &schemas)
        .unwrap();
    assert_eq!(to_json_ld(&again.document).unwrap(), json);
}

#[test]
fn missing_order_step_aborts_and_is_named() {
    let yaml = PURCHASE.replace("after: s2", "after: missing-step");
    let schemas = parse_schemas(&yaml).unwrap();
    let err = compile_library(&ontology(), &CompileOptions::default(), "purchases", &schemas)
        .unwrap_err();
    assert!(matches!(err, CompileError::Rejected { .. }));
    assert!(err.to_string().contains("missing-step"));
    assert_eq!(
        err.violations(),
        vec![("cmu:Purchase", &Violation::MissingOrderStep("missing-step".into()))]
    );
}

#[test]
fn primitives_are_padded_to_three_segments() {
    let yaml = r#"
- schema_id: cmu:Padding
  schema_name: Padding
  schema_dscpt: Type padding
  schema_version: "1"
  slots: []
  steps:
    - id: one
      primitive: Life
      slots: []
    - id: two
      primitive: Life.Die
      slots: []
    - id: three
      primitive: Life.Die.DeathCausedByViolentEvents
      slots: []
  order: []
"#;
    let schemas = parse_schemas(yaml).unwrap();
    let library = compile_library(&ontology(), &CompileOptions::default(), "lib", &schemas)
        .unwrap();
    let types: Vec<&str> = library.document.schemas[0]
        .steps
        .iter()
        .map(|s| s.type_.as_str())
        .collect();
    assert_eq!(
        types,
        vec![
            "kairos:Primitives/Events/Life.Unspecified.Unspecified",
            "kairos:Primitives/Events/Life.Die.Unspecified",
            "kairos:Primitives/Events/Life.Die.DeathCausedByViolentEvents",
        ]
    );
    assert_eq!(library.diagnostics.from_source(SOURCE_EVENT).count(), 3);
}

#[test]
fn ontology_misses_are_warnings_only() {
    let yaml = r#"
- schema_id: cmu:Misses
  schema_name: Misses
  schema_dscpt: Unknown role and entity
  schema_version: "1"
  slots: []
  steps:
    - id: buy
      primitive: Transaction.ExchangeBuySell
      slots:
        - role: Thief
          refvar: t
          constraints: [WEA]
          reference: wiki:Q1
  order: []
"#;
    let schemas = parse_schemas(yaml).unwrap();
    let library = compile_library(&ontology(), &CompileOptions::default(), "lib", &schemas)
        .unwrap();
    assert_eq!(library.diagnostics.from_source(SOURCE_ROLE).count(), 1);
    assert_eq!(library.diagnostics.from_source(SOURCE_ENTITY).count(), 1);
    let slot = &library.document.schemas[0].steps[0].participants[0];
    assert_eq!(
        slot.entity_types.as_deref(),
        Some(&["kairos:Primitives/Entities/WEA".to_owned()][..])
    );
    assert_eq!(slot.reference.as_deref(), Some("wiki:Q1"));
}

#[test]
fn order_endpoints_always_name_compiled_steps() {
    let yaml = r#"
- schema_id: cmu:Heist
  schema_name: Heist
  schema_dscpt: Break in and escape
  schema_version: "2"
  slots:
    - role: Thief
      refvar: t
  steps:
    - id: break-in
      primitive: Conflict.Attack
      slots: [{role: Attacker, refvar: t}]
    - id: grab-loot
      primitive: Transaction.ExchangeBuySell
      slots: [{role: Recipient, refvar: t}]
    - id: escape
      primitive: Movement.Transportation
      slots: [{role: Transporter, refvar: t}]
  order:
    - before: break-in
      after: grab-loot
    - container: escape
      contained: grab-loot
      comment: loot is carried out
    - overlaps: [grab-loot, escape]
"#;
    let schemas = parse_schemas(yaml).unwrap();
    let options = CompileOptions {
        coref_mode: CorefMode::Both,
        ..CompileOptions::default()
    };
    let library = compile_library(&ontology(), &options, "heists", &schemas).unwrap();
    let schema = &library.document.schemas[0];
    for relation in &schema.order {
        for endpoint in relation.endpoints() {
            assert!(schema.step(endpoint).is_some(), "dangling endpoint {endpoint}");
        }
    }
    assert_eq!(schema.order[1].comment(), "3 contains 2");
    assert_eq!(schema.order[2].comment(), "2, 3 overlaps");

    assert_eq!(schema.entity_relations.len(), 1);
    let relation = &schema.entity_relations[0];
    assert_eq!(relation.subject, "cmu:Heist/Slots/attacker");
    assert_eq!(relation.relations.len(), 3);
    assert_eq!(relation.relations[2].object, "cmu:Heist/Slots/thief");
}
