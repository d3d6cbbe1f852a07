//! Serializers for compiled SDF libraries.
//!
//! - **JSON-LD** ([`jsonld`]): the interchange format consumed by KAIROS tooling

pub mod jsonld;
