//! KAIROS schema data model.
//!
//! The `kairos-sdf` crate holds the three document shapes the schema
//! toolchain moves between:
//!
//! - [`authored`]: the compact YAML format schema authors write by hand
//! - [`model`]: the canonical SDF (Schema Data Format) JSON-LD records
//! - [`ontology`]: the event/entity ontology that authored types are checked against
//!
//! along with the [`serializer`] that writes a finished library to disk.
//!
//! # Entry Point
//!
//! ```
//! let yaml = r#"
//! - schema_id: cmu:Purchase
//!   schema_name: Purchase
//!   schema_dscpt: Buying something
//!   schema_version: "1.0"
//!   slots: []
//!   steps: []
//!   order: []
//! "#;
//! let schemas = kairos_sdf::authored::parse_schemas(yaml).unwrap();
//! assert_eq!(schemas[0].schema_id, "cmu:Purchase");
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod authored;
pub mod model;
pub mod ontology;
pub mod serializer;
pub mod vocab;

pub use authored::{AuthoredSchema, OrderRelation, ParseError, Slot, Step};
pub use model::{
    CanonicalOrder, CanonicalSchema, CanonicalSlot, CanonicalStep, EntityRelation,
    LibraryDocument, Relation, SlotRole,
};
pub use ontology::{ArgDef, EntityDef, EventDef, OntologyDocument, OntologyError, OntologyStore};
