//! Event/entity ontology store.
//!
//! The ontology document is produced from the KAIROS ontology spreadsheet by
//! an external extractor. It maps qualified event types
//! (`Type.Subtype.Sub-subtype`) to their permitted argument roles, and lists
//! the valid entity type names. The store is loaded once at startup and is
//! read-only afterwards; compiler components receive it by reference.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Spreadsheet annotation index; integer or string depending on the source sheet.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum AnnotationId {
    /// Textual index, e.g. `LDC_ev_001`.
    Text(String),
    /// Numeric index.
    Number(i64),
}

/// One argument of an event type.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ArgDef {
    /// Argument position, e.g. `arg1`.
    pub position: String,
    /// Role label, e.g. `Giver`.
    pub label: String,
    /// Permitted entity types for this argument.
    #[serde(default)]
    pub constraints: BTreeSet<String>,
}

/// An event (or relation) type definition.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EventDef {
    /// Spreadsheet annotation index.
    pub id: AnnotationId,
    /// Qualified type name.
    #[serde(rename = "type")]
    pub type_: String,
    /// Definition text.
    #[serde(default)]
    pub definition: Option<String>,
    /// Annotation template.
    #[serde(default)]
    pub template: Option<String>,
    /// Arguments keyed by role label.
    #[serde(default)]
    pub args: BTreeMap<String, ArgDef>,
}

impl EventDef {
    /// Returns true if `role` is one of this type's argument labels.
    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.args.contains_key(role)
    }
}

/// An entity type definition.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EntityDef {
    /// Spreadsheet annotation index.
    pub id: AnnotationId,
    /// Entity type name, e.g. `PER`.
    #[serde(rename = "type")]
    pub type_: String,
    /// Definition text.
    #[serde(default)]
    pub definition: Option<String>,
}

/// The ontology document as written by the spreadsheet extractor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OntologyDocument {
    /// Name of the spreadsheet the document was extracted from.
    #[serde(default)]
    pub source_file: Option<String>,
    /// Event types keyed by qualified name.
    pub events: BTreeMap<String, EventDef>,
    /// Entity types keyed by name.
    pub entities: BTreeMap<String, EntityDef>,
    /// Relation types keyed by qualified name.
    #[serde(default)]
    pub relations: BTreeMap<String, EventDef>,
}

/// Errors raised while loading the ontology. Always fatal.
#[derive(Debug, Error)]
pub enum OntologyError {
    /// The ontology file could not be read.
    #[error("failed to read ontology {}: {source}", path.display())]
    Read {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The ontology file is not a valid ontology document.
    #[error("failed to parse ontology {}: {source}", path.display())]
    Parse {
        /// Path that was parsed.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

/// Read-only lookup over a loaded ontology document.
#[derive(Debug, Clone, Default)]
pub struct OntologyStore {
    document: OntologyDocument,
}

impl OntologyStore {
    /// Default location of the ontology document.
    pub const DEFAULT_PATH: &'static str = "ontology.json";

    /// Loads the ontology document at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`OntologyError::Read`] if the file cannot be read and
    /// [`OntologyError::Parse`] if it is not a valid ontology document.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, OntologyError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| OntologyError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let document: OntologyDocument =
            serde_json::from_str(&content).map_err(|source| OntologyError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        let store = Self::from_document(document);
        tracing::info!(
            path = %path.display(),
            events = store.event_count(),
            entities = store.entity_count(),
            "loaded ontology"
        );
        Ok(store)
    }

    /// Wraps an already-parsed document.
    #[must_use]
    pub fn from_document(document: OntologyDocument) -> Self {
        Self { document }
    }

    /// The underlying document.
    #[must_use]
    pub fn document(&self) -> &OntologyDocument {
        &self.document
    }

    /// Looks up an event type by qualified name.
    #[must_use]
    pub fn lookup_event(&self, qualified_type: &str) -> Option<&EventDef> {
        self.document.events.get(qualified_type)
    }

    /// Looks up a relation type by qualified name.
    #[must_use]
    pub fn lookup_relation(&self, qualified_type: &str) -> Option<&EventDef> {
        self.document.relations.get(qualified_type)
    }

    /// Returns true if `name` is a known entity type.
    #[must_use]
    pub fn lookup_entity(&self, name: &str) -> bool {
        self.document.entities.contains_key(name)
    }

    /// Number of event types.
    #[must_use]
    pub fn event_count(&self) -> usize {
        self.document.events.len()
    }

    /// Number of entity types.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.document.entities.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const DOC: &str = r#"{
        "source_file": "LDC_AIDA_Annotation_Ontology.xlsx",
        "events": {
            "Transaction.ExchangeBuySell.Unspecified": {
                "id": "LDC_ev_140",
                "type": "Transaction.ExchangeBuySell.Unspecified",
                "definition": "Buying and selling",
                "template": "<arg1> bought <arg3> from <arg2>",
                "args": {
                    "Giver": {"position": "arg1", "label": "Giver", "constraints": ["PER", "ORG"]},
                    "Recipient": {"position": "arg2", "label": "Recipient", "constraints": ["PER"]}
                }
            }
        },
        "entities": {
            "PER": {"id": 7, "type": "PER", "definition": "Person"},
            "ORG": {"id": "LDC_ent_2", "type": "ORG"}
        },
        "relations": {}
    }"#;

    fn store() -> OntologyStore {
        OntologyStore::from_document(serde_json::from_str(DOC).unwrap())
    }

    #[test]
    fn looks_up_events_and_roles() {
        let store = store();
        let event = store
            .lookup_event("Transaction.ExchangeBuySell.Unspecified")
            .unwrap();
        assert!(event.has_role("Giver"));
        assert!(!event.has_role("Thief"));
        assert!(event.args["Giver"].constraints.contains("ORG"));
        assert!(store.lookup_event("Transaction.ExchangeBuySell").is_none());
    }

    #[test]
    fn looks_up_entities() {
        let store = store();
        assert!(store.lookup_entity("PER"));
        assert!(!store.lookup_entity("WEA"));
        assert_eq!(store.entity_count(), 2);
        assert_eq!(
            store.document().entities["PER"].id,
            AnnotationId::Number(7)
        );
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(DOC.as_bytes()).unwrap();
        let store = OntologyStore::load(file.path()).unwrap();
        assert_eq!(store.event_count(), 1);
        assert!(store.lookup_relation("Anything").is_none());
    }

    #[test]
    fn missing_file_is_fatal() {
        let err = OntologyStore::load("/nonexistent/ontology.json").unwrap_err();
        assert!(matches!(err, OntologyError::Read { .. }));
    }

    #[test]
    fn malformed_file_is_fatal() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{\"events\": []}").unwrap();
        let err = OntologyStore::load(file.path()).unwrap_err();
        assert!(matches!(err, OntologyError::Parse { .. }));
    }
}
