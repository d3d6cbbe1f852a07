//! Per-schema compilation state.

use kairos_sdf::OntologyStore;

use crate::identifier::{IdentifierSynthesizer, SlotIds};
use crate::report::Diagnostics;

/// Mutable state scoped to the compilation of one schema: the slot-name
/// counters and the diagnostics raised so far. Nothing here outlives the
/// schema it was created for.
#[derive(Debug)]
pub struct SchemaContext<'a> {
    schema_id: &'a str,
    ontology: &'a OntologyStore,
    pub(crate) ids: IdentifierSynthesizer,
    pub(crate) diagnostics: Diagnostics,
}

impl<'a> SchemaContext<'a> {
    /// Creates the context for `schema_id`.
    #[must_use]
    pub fn new(schema_id: &'a str, ontology: &'a OntologyStore) -> Self {
        Self {
            schema_id,
            ontology,
            ids: IdentifierSynthesizer::new(schema_id),
            diagnostics: Diagnostics::new(),
        }
    }

    /// Id of the schema being compiled.
    #[must_use]
    pub fn schema_id(&self) -> &'a str {
        self.schema_id
    }

    /// Ontology used for type and role checks.
    #[must_use]
    pub fn ontology(&self) -> &'a OntologyStore {
        self.ontology
    }

    /// Diagnostics raised so far.
    #[must_use]
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Records a warning against this schema.
    pub fn warn(&mut self, source: &'static str, message: impl Into<String>) {
        self.diagnostics.warn(source, self.schema_id, message);
    }

    /// Ends the first identifier pass, returning final ids and diagnostics.
    #[must_use]
    pub fn finish(self) -> (SlotIds, Diagnostics) {
        (self.ids.finish(), self.diagnostics)
    }
}
