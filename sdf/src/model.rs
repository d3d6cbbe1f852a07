//! Canonical SDF records.
//!
//! These types mirror the KAIROS SDF JSON-LD layout. Field declaration order
//! is the serialized key order, so compiled libraries diff cleanly between
//! runs. All records are built once by the compiler and never mutated.

use serde::{Deserialize, Serialize};

use crate::vocab;

/// Role of a canonical slot.
///
/// Step participants carry `role`; schema-level slots carry `roleName`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotRole {
    /// Role of a step participant.
    #[serde(rename = "role")]
    Participant(String),
    /// Role of a schema-level slot.
    #[serde(rename = "roleName")]
    Schema(String),
}

impl SlotRole {
    /// The role IRI.
    #[must_use]
    pub fn iri(&self) -> &str {
        match self {
            SlotRole::Participant(iri) | SlotRole::Schema(iri) => iri,
        }
    }
}

/// A compiled slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalSlot {
    /// Derived slot name, e.g. `giver` or `giver-x1`.
    pub name: String,
    /// Schema-unique slot IRI.
    #[serde(rename = "@id")]
    pub id: String,
    /// Role IRI.
    #[serde(flatten)]
    pub role: SlotRole,
    /// Entity type IRIs.
    #[serde(rename = "entityTypes", default, skip_serializing_if = "Option::is_none")]
    pub entity_types: Option<Vec<String>>,
    /// External fine-grained entity type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Coreference tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refvar: Option<String>,
    /// Author comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// A compiled step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalStep {
    /// Step IRI, `{schemaId}/Steps/{id}`.
    #[serde(rename = "@id")]
    pub id: String,
    /// Authored step id.
    pub name: String,
    /// Event type IRI.
    #[serde(rename = "@type")]
    pub type_: String,
    /// Positional comment plus the author's comment.
    pub comment: String,
    /// Compiled arguments.
    pub participants: Vec<CanonicalSlot>,
}

/// A compiled temporal relation with endpoints resolved to step IRIs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CanonicalOrder {
    /// `before` precedes `after`.
    Precedence {
        /// Relation IRI.
        #[serde(rename = "@id")]
        id: String,
        /// Summary using 1-based step positions.
        comment: String,
        /// Earlier step IRI.
        before: String,
        /// Later step IRI.
        after: String,
    },
    /// `container` contains `contained`.
    Containment {
        /// Relation IRI.
        #[serde(rename = "@id")]
        id: String,
        /// Summary using 1-based step positions.
        comment: String,
        /// Containing step IRI.
        container: String,
        /// Contained step IRI.
        contained: String,
    },
    /// All listed steps overlap.
    Overlap {
        /// Relation IRI.
        #[serde(rename = "@id")]
        id: String,
        /// Summary using 1-based step positions.
        comment: String,
        /// Overlapping step IRIs.
        overlaps: Vec<String>,
    },
}

impl CanonicalOrder {
    /// Relation IRI.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            CanonicalOrder::Precedence { id, .. }
            | CanonicalOrder::Containment { id, .. }
            | CanonicalOrder::Overlap { id, .. } => id,
        }
    }

    /// Generated comment.
    #[must_use]
    pub fn comment(&self) -> &str {
        match self {
            CanonicalOrder::Precedence { comment, .. }
            | CanonicalOrder::Containment { comment, .. }
            | CanonicalOrder::Overlap { comment, .. } => comment,
        }
    }

    /// Step IRIs referenced by this relation.
    #[must_use]
    pub fn endpoints(&self) -> Vec<&str> {
        match self {
            CanonicalOrder::Precedence { before, after, .. } => vec![before, after],
            CanonicalOrder::Containment {
                container,
                contained,
                ..
            } => vec![container, contained],
            CanonicalOrder::Overlap { overlaps, .. } => {
                overlaps.iter().map(String::as_str).collect()
            }
        }
    }
}

/// One predicate/object pair of an entity relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    /// Predicate IRI, e.g. [`vocab::SAME_AS`].
    #[serde(rename = "relationPredicate")]
    pub predicate: String,
    /// Object slot IRI.
    #[serde(rename = "relationObject")]
    pub object: String,
}

/// Explicit coreference between slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRelation {
    /// Subject slot IRI.
    #[serde(rename = "relationSubject")]
    pub subject: String,
    /// Relations from the subject.
    pub relations: Vec<Relation>,
}

/// A compiled complex event schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalSchema {
    /// Schema IRI.
    #[serde(rename = "@id")]
    pub id: String,
    /// `Steps:` header followed by one numbered line per step.
    pub comment: Vec<String>,
    /// Always [`vocab::SUPER_EVENT`].
    #[serde(rename = "super")]
    pub super_: String,
    /// Human-readable label.
    pub name: String,
    /// Description.
    pub description: String,
    /// Version string.
    pub version: String,
    /// Schema-level slots.
    pub slots: Vec<CanonicalSlot>,
    /// Steps in declaration order.
    pub steps: Vec<CanonicalStep>,
    /// Temporal relations.
    pub order: Vec<CanonicalOrder>,
    /// Explicit coreference relations.
    #[serde(rename = "entityRelations")]
    pub entity_relations: Vec<EntityRelation>,
}

impl CanonicalSchema {
    /// Iterates over every slot of the schema: step participants first, then schema slots.
    pub fn all_slots(&self) -> impl Iterator<Item = &CanonicalSlot> {
        self.steps
            .iter()
            .flat_map(|step| step.participants.iter())
            .chain(self.slots.iter())
    }

    /// Looks up a step by its IRI.
    #[must_use]
    pub fn step(&self, id: &str) -> Option<&CanonicalStep> {
        self.steps.iter().find(|step| step.id == id)
    }
}

/// A library of compiled schemas: the final output document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryDocument {
    /// JSON-LD context references.
    #[serde(rename = "@context")]
    pub context: Vec<String>,
    /// SDF version tag.
    #[serde(rename = "sdfVersion")]
    pub sdf_version: String,
    /// Library IRI.
    #[serde(rename = "@id")]
    pub id: String,
    /// Compiled schemas in input order.
    pub schemas: Vec<CanonicalSchema>,
}

impl LibraryDocument {
    /// Wraps compiled schemas with the fixed KAIROS context and version.
    #[must_use]
    pub fn new(id: impl Into<String>, schemas: Vec<CanonicalSchema>) -> Self {
        Self {
            context: vec![vocab::SDF_CONTEXT.to_owned()],
            sdf_version: vocab::SDF_VERSION.to_owned(),
            id: id.into(),
            schemas,
        }
    }
}
