//! KAIROS schema compiler.
//!
//! Turns authored YAML schemas ([`kairos_sdf::AuthoredSchema`]) into canonical
//! SDF records ([`kairos_sdf::CanonicalSchema`]) and wraps them into a
//! [`kairos_sdf::LibraryDocument`].
//!
//! | Stage | Module |
//! |-------|--------|
//! | Slot and step identifiers | [`identifier`] |
//! | Slots | [`slot`] |
//! | Steps and type qualification | [`step`] |
//! | Coreference | [`coref`] |
//! | Temporal order | [`order`] |
//! | One schema | [`schema`] |
//! | A batch of schemas | [`library`] |
//!
//! Ontology misses never stop compilation; they are returned as
//! [`Diagnostics`]. Structural defects reject the schema with a
//! [`CompileError`] that lists every violation found.
//!
//! # Entry Point
//!
//! ```
//! use kairos_sdf::{authored::parse_schemas, OntologyStore};
//! use kairos_sdf_compiler::{compile_library, CompileOptions};
//!
//! let yaml = r#"
//! - schema_id: cmu:Purchase
//!   schema_name: Purchase
//!   schema_dscpt: Buying something
//!   schema_version: "1.0"
//!   slots: []
//!   steps:
//!     - id: pay
//!       primitive: Transaction.ExchangeBuySell
//!       slots:
//!         - role: Giver
//!           refvar: buyer
//!   order: []
//! "#;
//! let schemas = parse_schemas(yaml).unwrap();
//! let ontology = OntologyStore::default();
//! let library =
//!     compile_library(&ontology, &CompileOptions::default(), "purchases", &schemas).unwrap();
//! assert_eq!(library.document.schemas[0].steps[0].participants[0].id, "cmu:Purchase/Slots/giver");
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod context;
pub mod coref;
pub mod error;
pub mod identifier;
pub mod library;
pub mod options;
pub mod order;
pub mod report;
pub mod schema;
pub mod slot;
pub mod step;

pub use coref::{entity_relations, EntityMap, EntityTag};
pub use error::{CompileError, Violation};
pub use identifier::{IdentifierSynthesizer, SlotIds, SlotTicket};
pub use library::{assemble_library, compile_library, CompiledLibrary};
pub use options::{BatchPolicy, CompileOptions, CorefMode, UnknownOption};
pub use report::{Diagnostic, Diagnostics, Severity};
pub use schema::{check_structure, CompiledSchema, SchemaCompiler};
